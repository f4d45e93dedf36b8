//! Return-pattern detection
//!
//! Looks for A→B→A rebounds: three consecutive tab switches where the third goes back
//! to the tab the first one opened, the middle one went somewhere else, and the whole
//! pattern spans at most `return_window_s`.

use crate::config::FeatureConfig;
use crate::selector::TimedEvent;
use crate::time::seconds_between;

/// Fewest tab switches that can form a return pattern
const MIN_TAB_SWITCHES: usize = 3;

/// Number of A→B→A patterns in ascending tab switches
pub fn return_count(tab_switches: &[TimedEvent<'_>], config: &FeatureConfig) -> usize {
    tab_switches
        .windows(3)
        .filter(|w| {
            let (a, b, c) = (w[0].tab_id(), w[1].tab_id(), w[2].tab_id());
            a == c && a != b && seconds_between(w[0].at, w[2].at) <= config.return_window_s
        })
        .count()
}

/// Returns divided by the total tab-switch count.
///
/// The denominator is every tab switch in the session rather than the number of
/// triples examined, so long sessions dilute the ratio.
pub fn return_ratio(tab_switches: &[TimedEvent<'_>], config: &FeatureConfig) -> f64 {
    if tab_switches.len() < MIN_TAB_SWITCHES {
        return 0.0;
    }

    return_count(tab_switches, config) as f64 / tab_switches.len() as f64
}
