//! Focus-block derivation

use chrono::{DateTime, Utc};

use crate::selector::TimedEvent;
use crate::time::seconds_between;

/// Durations of the intervals between consecutive context boundaries.
///
/// Boundaries are the session start, every switch event, and the session end. A pair
/// whose delta is negative (a switch outside the session or a reversed session) is
/// dropped rather than reported.
pub fn focus_blocks(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    switches: &[TimedEvent<'_>],
) -> Vec<f64> {
    let boundaries: Vec<DateTime<Utc>> = std::iter::once(start)
        .chain(switches.iter().map(|e| e.at))
        .chain(std::iter::once(end))
        .collect();

    let blocks: Vec<f64> = boundaries
        .windows(2)
        .map(|pair| seconds_between(pair[0], pair[1]))
        .filter(|&delta| delta >= 0.0)
        .collect();

    let dropped = boundaries.len() - 1 - blocks.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped negative focus-block deltas");
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Event, EventType};
    use chrono::TimeZone;

    fn at(min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, min, sec).unwrap()
    }

    fn focus_event() -> Event {
        Event {
            event_type: EventType::WindowFocus,
            timestamp: None,
            tab_id: None,
            window_id: None,
            domain: None,
        }
    }

    #[test]
    fn test_no_switches_is_whole_session() {
        assert_eq!(focus_blocks(at(0, 0), at(5, 0), &[]), vec![300.0]);
    }

    #[test]
    fn test_blocks_between_switches() {
        let e = focus_event();
        let switches = [
            TimedEvent { at: at(1, 0), event: &e },
            TimedEvent { at: at(1, 30), event: &e },
        ];

        let blocks = focus_blocks(at(0, 0), at(5, 0), &switches);
        assert_eq!(blocks, vec![60.0, 30.0, 210.0]);
        assert_eq!(blocks.iter().sum::<f64>(), 300.0);
    }

    #[test]
    fn test_switch_before_start_is_dropped() {
        let e = focus_event();
        let switches = [TimedEvent { at: at(0, 0), event: &e }];

        // start at 00:10, switch at 00:00 → first delta negative
        let blocks = focus_blocks(at(0, 10), at(1, 0), &switches);
        assert_eq!(blocks, vec![60.0]);
    }

    #[test]
    fn test_reversed_session_without_switches_is_empty() {
        assert!(focus_blocks(at(5, 0), at(0, 0), &[]).is_empty());
    }

    #[test]
    fn test_zero_length_blocks_are_kept() {
        let e = focus_event();
        let switches = [TimedEvent { at: at(0, 0), event: &e }];
        assert_eq!(focus_blocks(at(0, 0), at(0, 20), &switches), vec![0.0, 20.0]);
    }
}
