//! Feature extraction parameters

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Width of the burst window in seconds
pub const BURST_WINDOW_S: f64 = 30.0;

/// Minimum switches inside the window to count as a burst
pub const BURST_MIN_SWITCHES: usize = 3;

/// Maximum seconds between leaving a tab and returning to it
pub const RETURN_WINDOW_S: f64 = 120.0;

/// Tunable thresholds for burst and return detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub burst_window_s: f64,
    pub burst_min_switches: usize,
    pub return_window_s: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            burst_window_s: BURST_WINDOW_S,
            burst_min_switches: BURST_MIN_SWITCHES,
            return_window_s: RETURN_WINDOW_S,
        }
    }
}

impl FeatureConfig {
    /// Load a config document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: FeatureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make detection meaningless
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !self.burst_window_s.is_finite() || self.burst_window_s < 0.0 {
            return Err(ComputeError::InvalidConfig(format!(
                "burst_window_s must be a non-negative number, got {}",
                self.burst_window_s
            )));
        }
        if self.burst_min_switches == 0 {
            return Err(ComputeError::InvalidConfig(
                "burst_min_switches must be at least 1".to_string(),
            ));
        }
        if !self.return_window_s.is_finite() || self.return_window_s < 0.0 {
            return Err(ComputeError::InvalidConfig(format!(
                "return_window_s must be a non-negative number, got {}",
                self.return_window_s
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeatureConfig::default();
        assert_eq!(config.burst_window_s, 30.0);
        assert_eq!(config.burst_min_switches, 3);
        assert_eq!(config.return_window_s, 120.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FeatureConfig::from_json(r#"{ "burst_window_s": 60 }"#).unwrap();
        assert_eq!(config.burst_window_s, 60.0);
        assert_eq!(config.burst_min_switches, BURST_MIN_SWITCHES);
        assert_eq!(config.return_window_s, RETURN_WINDOW_S);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(FeatureConfig::from_json(r#"{ "burst_min_switches": 0 }"#).is_err());
        assert!(FeatureConfig::from_json(r#"{ "return_window_s": -1 }"#).is_err());

        let config = FeatureConfig {
            burst_window_s: f64::NAN,
            ..FeatureConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ComputeError::InvalidConfig(_))
        ));
    }
}
