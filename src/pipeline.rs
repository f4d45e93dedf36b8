//! JSON pipeline orchestration
//!
//! Public entry points that take session JSON and return feature JSON. Batches isolate
//! failures per session: one malformed session never hides the results of the others.

use crate::config::FeatureConfig;
use crate::error::ComputeError;
use crate::features::FeatureExtractor;
use crate::types::{FeatureRecord, Session};

/// Parse a session JSON document
pub fn parse_session(json: &str) -> Result<Session, ComputeError> {
    Ok(serde_json::from_str(json)?)
}

/// Convert session JSON to feature-record JSON (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let record_json = session_to_features(session_json)?;
/// ```
pub fn session_to_features(session_json: String) -> Result<String, ComputeError> {
    FeatureProcessor::new().process(&session_json)
}

/// Outcome of one session within a batch
#[derive(Debug)]
pub struct SessionOutcome {
    /// Position of the session in the batch input
    pub index: usize,
    /// Session identifier, when the session parsed far enough to have one
    pub session_id: Option<String>,
    pub result: Result<FeatureRecord, ComputeError>,
}

/// Processor that applies one configuration across many sessions
#[derive(Debug, Clone, Default)]
pub struct FeatureProcessor {
    extractor: FeatureExtractor,
}

impl FeatureProcessor {
    /// Create a processor with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom thresholds
    pub fn with_config(config: FeatureConfig) -> Result<Self, ComputeError> {
        Ok(Self {
            extractor: FeatureExtractor::with_config(config)?,
        })
    }

    pub fn config(&self) -> &FeatureConfig {
        self.extractor.config()
    }

    /// Extract features from a parsed session
    pub fn extract(&self, session: &Session) -> Result<FeatureRecord, ComputeError> {
        self.extractor.extract(session)
    }

    /// Process a session JSON document and return the feature record as JSON
    pub fn process(&self, session_json: &str) -> Result<String, ComputeError> {
        let session = parse_session(session_json)?;
        let record = self.extract(&session)?;
        serde_json::to_string(&record).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Process newline-delimited session documents; blank lines are skipped
    pub fn process_ndjson(&self, input: &str) -> Vec<SessionOutcome> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| self.outcome(index, parse_session(line)))
            .collect()
    }

    /// Process a JSON array of session documents.
    ///
    /// Fails only when the input is not an array; malformed elements become failed
    /// outcomes.
    pub fn process_array(&self, input: &str) -> Result<Vec<SessionOutcome>, ComputeError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(input)?;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let session = serde_json::from_value(value).map_err(ComputeError::from);
                self.outcome(index, session)
            })
            .collect())
    }

    fn outcome(&self, index: usize, session: Result<Session, ComputeError>) -> SessionOutcome {
        match session {
            Ok(session) => {
                let result = self.extract(&session);
                if let Err(e) = &result {
                    tracing::warn!(index, error = %e, "session extraction failed");
                }
                SessionOutcome {
                    index,
                    session_id: session.session_id,
                    result,
                }
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "session could not be parsed");
                SessionOutcome {
                    index,
                    session_id: None,
                    result: Err(e),
                }
            }
        }
    }
}
