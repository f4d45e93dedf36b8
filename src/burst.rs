//! Burst detection
//!
//! A burst is a run of at least `burst_min_switches` switch events whose timestamps all
//! fall within `burst_window_s` of the run's first event.
//!
//! The scan is greedy and left-to-right: once a qualifying window is found it is
//! consumed whole and scanning resumes after it, so windows never overlap. This is not
//! an optimal clustering. Two dense regions closer than the window width may be counted
//! as one burst or two depending on where the first qualifying window closes, and that
//! tie-break is part of the feature's definition. Keep it when changing this code.

use chrono::{DateTime, Utc};

use crate::config::FeatureConfig;
use crate::time::seconds_between;

/// Count disjoint bursts in ascending switch timestamps
pub fn burst_count(times: &[DateTime<Utc>], config: &FeatureConfig) -> u32 {
    let mut bursts = 0;
    let mut i = 0;

    while i < times.len() {
        let mut j = i;
        while j < times.len() && seconds_between(times[i], times[j]) <= config.burst_window_s {
            j += 1;
        }

        if j - i >= config.burst_min_switches {
            bursts += 1;
            i = j;
        } else {
            i += 1;
        }
    }

    bursts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn times(offsets: &[i64]) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        offsets.iter().map(|&s| base + Duration::seconds(s)).collect()
    }

    #[test]
    fn test_empty_and_sparse() {
        let config = FeatureConfig::default();
        assert_eq!(burst_count(&[], &config), 0);
        assert_eq!(burst_count(&times(&[0, 100, 200, 300]), &config), 0);
    }

    #[test]
    fn test_three_switches_in_window() {
        let config = FeatureConfig::default();
        assert_eq!(burst_count(&times(&[0, 10, 20]), &config), 1);
    }

    #[test]
    fn test_window_bound_is_inclusive() {
        let config = FeatureConfig::default();
        assert_eq!(burst_count(&times(&[0, 15, 30]), &config), 1);
        assert_eq!(burst_count(&times(&[0, 15, 31]), &config), 0);
    }

    #[test]
    fn test_window_is_consumed() {
        let config = FeatureConfig::default();
        // 0..30 consumes six events; 40,45 are only two, 100..110 is a second burst
        let ts = times(&[0, 5, 10, 15, 20, 25, 40, 45, 100, 105, 110]);
        assert_eq!(burst_count(&ts, &config), 2);
    }

    #[test]
    fn test_greedy_boundary_tie_break() {
        let config = FeatureConfig::default();
        // First window [0,30] takes 0,10,30; 35,40 are left with 70 out of reach.
        assert_eq!(burst_count(&times(&[0, 10, 30, 35, 40, 70]), &config), 1);
        // Moving the first event earlier lets the scan restart at 10 and take 10..40.
        assert_eq!(burst_count(&times(&[-25, 10, 30, 35, 40, 70]), &config), 1);
        // Two tight groups separated by less than the window still split in two.
        assert_eq!(burst_count(&times(&[0, 1, 2, 20, 21, 45, 46, 47]), &config), 2);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = FeatureConfig {
            burst_window_s: 5.0,
            burst_min_switches: 2,
            ..FeatureConfig::default()
        };
        assert_eq!(burst_count(&times(&[0, 4, 10, 14, 30]), &config), 2);
    }

    #[test]
    fn test_adding_switches_never_lowers_count() {
        let config = FeatureConfig::default();
        let base = times(&[0, 10, 20, 200]);
        let before = burst_count(&base, &config);

        let more = times(&[0, 10, 20, 200, 205, 210]);
        assert!(burst_count(&more, &config) >= before);
        assert_eq!(burst_count(&more, &config), 2);
    }
}
