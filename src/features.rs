//! Feature aggregation
//!
//! Runs the selectors and detectors over one session and assembles the feature record.
//! Extraction is all-or-nothing: any parse or missing-field error aborts the session.

use chrono::{DateTime, Utc};

use crate::burst::burst_count;
use crate::config::FeatureConfig;
use crate::error::ComputeError;
use crate::focus::focus_blocks;
use crate::returns::return_ratio;
use crate::selector::{session_bounds, switch_events, tab_switch_events, TimedEvent};
use crate::time::seconds_between;
use crate::types::{DerivedFeatures, FeatureRecord, Session, SessionFeatures};

/// Extracts attention-fragmentation features with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    /// Create an extractor with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom thresholds
    pub fn with_config(config: FeatureConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute the feature record for one session
    pub fn extract(&self, session: &Session) -> Result<FeatureRecord, ComputeError> {
        let (start, end) = session_bounds(session)?;
        let switches = switch_events(session)?;
        let tab_switches = tab_switch_events(session)?;

        let blocks = focus_blocks(start, end, &switches);
        let session_duration_s = seconds_between(start, end);
        if session_duration_s < 0.0 {
            tracing::warn!(
                session_id = session.session_id.as_deref(),
                session_duration_s,
                "session ends before it starts"
            );
        }

        let times: Vec<DateTime<Utc>> = switches.iter().map(|e| e.at).collect();

        let features = SessionFeatures {
            session_duration_s,
            ttfs_s: time_to_first_switch(start, &switches, session_duration_s),
            switch_rate_per_min: switch_rate_per_min(switches.len(), session_duration_s),
            avg_focus_block_s: mean(&blocks),
            median_focus_block_s: median(&blocks),
            burst_count: burst_count(&times, &self.config),
            return_ratio: return_ratio(&tab_switches, &self.config),
        };

        tracing::debug!(
            session_id = session.session_id.as_deref(),
            switches = switches.len(),
            tab_switches = tab_switches.len(),
            focus_blocks = blocks.len(),
            burst_count = features.burst_count,
            "extracted session features"
        );

        Ok(FeatureRecord {
            session_id: session.session_id.clone(),
            features,
            derived: DerivedFeatures {
                focus_blocks_s: blocks,
            },
        })
    }
}

/// Extract features with the default thresholds
pub fn extract_features(session: &Session) -> Result<FeatureRecord, ComputeError> {
    FeatureExtractor::new().extract(session)
}

/// Seconds until the first switch, or the whole session when nothing was switched
fn time_to_first_switch(
    start: DateTime<Utc>,
    switches: &[TimedEvent<'_>],
    session_duration_s: f64,
) -> f64 {
    switches
        .first()
        .map(|first| seconds_between(start, first.at))
        .unwrap_or(session_duration_s)
}

/// Switches per minute; 0 for empty or reversed sessions
fn switch_rate_per_min(switch_count: usize, session_duration_s: f64) -> f64 {
    if session_duration_s <= 0.0 {
        return 0.0;
    }
    switch_count as f64 / (session_duration_s / 60.0)
}

/// Arithmetic mean, `None` for an empty slice
///
/// Summation is compensated (Neumaier) so long or widely ranged block lists keep
/// the rounding of an exact sum.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &value in values {
        let total = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - total) + value;
        } else {
            compensation += (value - total) + sum;
        }
        sum = total;
    }

    Some((sum + compensation) / values.len() as f64)
}

/// Median (average of the middle pair for even lengths), `None` for an empty slice
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
