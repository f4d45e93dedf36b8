//! Focus Flux CLI - Command-line interface for Focus Flux
//!
//! Commands:
//! - extract: Compute features for a single session
//! - batch: Compute features for many sessions (NDJSON or JSON array)
//! - validate: Check a session for missing fields and unparseable timestamps
//! - schema: Print input/output schema information

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use focus_flux::pipeline::{parse_session, FeatureProcessor, SessionOutcome};
use focus_flux::selector::{session_bounds, switch_events, tab_switch_events};
use focus_flux::{ComputeError, FeatureConfig, Session, FOCUS_FLUX_VERSION};

/// Focus Flux - attention-fragmentation features from browsing sessions
#[derive(Parser)]
#[command(name = "focusflux")]
#[command(author = "Synheart AI Inc")]
#[command(version = FOCUS_FLUX_VERSION)]
#[command(about = "Compute attention-fragmentation features from session logs", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute features for a single session
    Extract {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print the output (default when stdout is a terminal)
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Compute features for many sessions, one record per line
    Batch {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Check a session for missing fields and unparseable timestamps
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Args)]
struct ThresholdArgs {
    /// Load thresholds from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Burst window in seconds
    #[arg(long)]
    burst_window_s: Option<f64>,

    /// Minimum switches per burst
    #[arg(long)]
    burst_min_switches: Option<usize>,

    /// Maximum seconds for an A→B→A return
    #[arg(long)]
    return_window_s: Option<f64>,
}

impl ThresholdArgs {
    fn resolve(&self) -> Result<FeatureConfig, CliFailure> {
        let mut config = match &self.config {
            Some(path) => FeatureConfig::from_json(&fs::read_to_string(path)?)?,
            None => FeatureConfig::default(),
        };

        if let Some(v) = self.burst_window_s {
            config.burst_window_s = v;
        }
        if let Some(v) = self.burst_min_switches {
            config.burst_min_switches = v;
        }
        if let Some(v) = self.return_window_s {
            config.return_window_s = v;
        }

        config.validate()?;
        tracing::debug!(?config, "resolved feature configuration");
        Ok(config)
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one session per line)
    Ndjson,
    /// JSON array of sessions
    Json,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Session log input
    Input,
    /// Feature record output
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliFailure> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            pretty,
            thresholds,
        } => cmd_extract(&input, &output, pretty, &thresholds),

        Commands::Batch {
            input,
            output,
            input_format,
            thresholds,
        } => cmd_batch(&input, &output, input_format, &thresholds),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    pretty: bool,
    thresholds: &ThresholdArgs,
) -> Result<(), CliFailure> {
    let processor = FeatureProcessor::with_config(thresholds.resolve()?)?;
    let session = parse_session(&read_input(input)?)?;
    let record = processor.extract(&session)?;

    let pretty = pretty || (is_stdio(output) && atty::is(atty::Stream::Stdout));
    let mut data = if pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    data.push('\n');

    write_output(output, &data)
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    thresholds: &ThresholdArgs,
) -> Result<(), CliFailure> {
    let processor = FeatureProcessor::with_config(thresholds.resolve()?)?;
    let input_data = read_input(input)?;

    let outcomes = match input_format {
        InputFormat::Ndjson => processor.process_ndjson(&input_data),
        InputFormat::Json => processor.process_array(&input_data)?,
    };

    if outcomes.is_empty() {
        return Err(CliFailure::NoSessions);
    }

    let mut data = String::new();
    let mut failed = 0;
    for SessionOutcome {
        index,
        session_id,
        result,
    } in &outcomes
    {
        match result {
            Ok(record) => {
                data.push_str(&serde_json::to_string(record)?);
                data.push('\n');
            }
            Err(e) => {
                failed += 1;
                tracing::error!(
                    index,
                    session_id = session_id.as_deref(),
                    error = %e,
                    "skipping session"
                );
            }
        }
    }

    write_output(output, &data)?;

    tracing::info!(total = outcomes.len(), failed, "batch complete");

    if failed > 0 {
        Err(CliFailure::BatchFailed {
            failed,
            total: outcomes.len(),
        })
    } else {
        Ok(())
    }
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;

    let report = match parse_session(&input_data) {
        Ok(session) => {
            match count_switches(&session) {
                Ok((switches, tab_switches)) => ValidationReport {
                    valid: true,
                    session_id: session.session_id.clone(),
                    total_events: session.events.len(),
                    switch_events: Some(switches),
                    tab_switch_events: Some(tab_switches),
                    error: None,
                },
                Err(e) => ValidationReport {
                    valid: false,
                    session_id: session.session_id.clone(),
                    total_events: session.events.len(),
                    switch_events: None,
                    tab_switch_events: None,
                    error: Some(e.to_string()),
                },
            }
        }
        Err(e) => ValidationReport {
            valid: false,
            session_id: None,
            total_events: 0,
            switch_events: None,
            tab_switch_events: None,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!(
            "Session:           {}",
            report.session_id.as_deref().unwrap_or("(none)")
        );
        println!("Total events:      {}", report.total_events);
        if let Some(n) = report.switch_events {
            println!("Switch events:     {}", n);
        }
        if let Some(n) = report.tab_switch_events {
            println!("Tab-switch events: {}", n);
        }
        if let Some(err) = &report.error {
            println!("\nError: {}", err);
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(CliFailure::ValidationFailed)
    }
}

/// Runs every fallible step of extraction and returns the switch and tab-switch counts
fn count_switches(session: &Session) -> Result<(usize, usize), ComputeError> {
    session_bounds(session)?;
    let switches = switch_events(session)?;
    let tab_switches = tab_switch_events(session)?;
    Ok((switches.len(), tab_switches.len()))
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), CliFailure> {
    let schema = match schema_type {
        SchemaType::Input => input_json_schema(),
        SchemaType::Output => output_json_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

// Helper functions

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_input(input: &Path) -> Result<String, CliFailure> {
    if is_stdio(input) {
        if atty::is(atty::Stream::Stdin) {
            tracing::warn!("reading session from an interactive terminal; end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), CliFailure> {
    if is_stdio(output) {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn input_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "focus.session.v1",
        "description": "Closed browsing session with interaction events",
        "type": "object",
        "required": ["start_time", "end_time"],
        "properties": {
            "session_id": { "type": ["string", "null"] },
            "start_time": { "type": "string", "format": "date-time" },
            "end_time": { "type": "string", "format": "date-time" },
            "events": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["event_type", "timestamp"],
                    "properties": {
                        "event_type": {
                            "type": "string",
                            "description": "TAB_SWITCH and WINDOW_FOCUS are interpreted; others are ignored",
                            "examples": ["TAB_SWITCH", "WINDOW_FOCUS", "TAB_CREATED", "TAB_REMOVED"]
                        },
                        "timestamp": { "type": "string", "format": "date-time" },
                        "tab_id": {
                            "type": ["string", "null"],
                            "description": "Required for TAB_SWITCH"
                        },
                        "window_id": { "type": ["string", "null"] },
                        "domain": { "type": ["string", "null"] }
                    }
                }
            }
        }
    })
}

fn output_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "focus.features.v1",
        "description": "Attention-fragmentation features for one session",
        "type": "object",
        "required": ["session_id", "features", "derived"],
        "properties": {
            "session_id": { "type": ["string", "null"] },
            "features": {
                "type": "object",
                "properties": {
                    "session_duration_s": { "type": "number" },
                    "ttfs_s": { "type": "number" },
                    "switch_rate_per_min": { "type": "number" },
                    "avg_focus_block_s": { "type": ["number", "null"] },
                    "median_focus_block_s": { "type": ["number", "null"] },
                    "burst_count": { "type": "integer", "minimum": 0 },
                    "return_ratio": { "type": "number", "minimum": 0, "maximum": 1 }
                }
            },
            "derived": {
                "type": "object",
                "properties": {
                    "focus_blocks_s": { "type": "array", "items": { "type": "number" } }
                }
            }
        }
    })
}

// Error types

#[derive(Debug)]
enum CliFailure {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoSessions,
    BatchFailed { failed: usize, total: usize },
    ValidationFailed,
}

impl From<io::Error> for CliFailure {
    fn from(e: io::Error) -> Self {
        CliFailure::Io(e)
    }
}

impl From<ComputeError> for CliFailure {
    fn from(e: ComputeError) -> Self {
        CliFailure::Compute(e)
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(e: serde_json::Error) -> Self {
        CliFailure::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliFailure> for CliError {
    fn from(e: CliFailure) -> Self {
        match e {
            CliFailure::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliFailure::Compute(e) => {
                let hint = match &e {
                    ComputeError::InvalidConfig(_) => "Check the threshold flags or config file",
                    _ => "Run 'focusflux validate' for details",
                };
                CliError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            CliFailure::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliFailure::NoSessions => CliError {
                code: "NO_SESSIONS".to_string(),
                message: "No sessions found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CliFailure::BatchFailed { failed, total } => CliError {
                code: "BATCH_FAILED".to_string(),
                message: format!("{} of {} sessions failed", failed, total),
                hint: Some("Successful records were still written; see log for details".to_string()),
            },
            CliFailure::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Session failed validation".to_string(),
                hint: Some("Fix the reported field and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    session_id: Option<String>,
    total_events: usize,
    switch_events: Option<usize>,
    tab_switch_events: Option<usize>,
    error: Option<String>,
}
