//! Event selection
//!
//! Filters a session's events down to the ones that mark attention-context boundaries
//! and orders them by parsed timestamp. Sorting is stable, so events sharing a
//! timestamp keep their recorded order.

use chrono::{DateTime, Utc};

use crate::error::ComputeError;
use crate::time::parse_timestamp;
use crate::types::{Event, EventType, Session};

/// An event paired with its parsed timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent<'a> {
    pub at: DateTime<Utc>,
    pub event: &'a Event,
}

impl<'a> TimedEvent<'a> {
    /// Destination tab of a TAB_SWITCH event
    pub fn tab_id(&self) -> Option<&'a str> {
        self.event.tab_id.as_deref()
    }
}

/// Parse the session start and end instants
pub fn session_bounds(session: &Session) -> Result<(DateTime<Utc>, DateTime<Utc>), ComputeError> {
    let start = session
        .start_time
        .as_deref()
        .ok_or_else(|| ComputeError::MissingField("start_time".to_string()))?;
    let end = session
        .end_time
        .as_deref()
        .ok_or_else(|| ComputeError::MissingField("end_time".to_string()))?;

    Ok((
        parse_timestamp("start_time", start)?,
        parse_timestamp("end_time", end)?,
    ))
}

/// TAB_SWITCH and WINDOW_FOCUS events in ascending time order
pub fn switch_events(session: &Session) -> Result<Vec<TimedEvent<'_>>, ComputeError> {
    select(session, EventType::is_switch)
}

/// TAB_SWITCH events in ascending time order
///
/// Every selected event must carry a `tab_id`.
pub fn tab_switch_events(session: &Session) -> Result<Vec<TimedEvent<'_>>, ComputeError> {
    let selected = select(session, |t| *t == EventType::TabSwitch)?;

    if let Some(pos) = session
        .events
        .iter()
        .position(|e| e.event_type == EventType::TabSwitch && e.tab_id.is_none())
    {
        return Err(ComputeError::MissingField(format!("events[{pos}].tab_id")));
    }

    Ok(selected)
}

fn select(
    session: &Session,
    keep: impl Fn(&EventType) -> bool,
) -> Result<Vec<TimedEvent<'_>>, ComputeError> {
    let mut selected = Vec::new();

    for (index, event) in session.events.iter().enumerate() {
        if !keep(&event.event_type) {
            continue;
        }

        let field = format!("events[{index}].timestamp");
        let raw = event
            .timestamp
            .as_deref()
            .ok_or_else(|| ComputeError::MissingField(field.clone()))?;

        selected.push(TimedEvent {
            at: parse_timestamp(&field, raw)?,
            event,
        });
    }

    selected.sort_by_key(|e| e.at);
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: EventType, timestamp: &str, tab_id: Option<&str>) -> Event {
        Event {
            event_type,
            timestamp: Some(timestamp.to_string()),
            tab_id: tab_id.map(str::to_string),
            window_id: None,
            domain: None,
        }
    }

    fn session(events: Vec<Event>) -> Session {
        Session {
            session_id: Some("sel".to_string()),
            start_time: Some("2024-01-01T00:00:00Z".to_string()),
            end_time: Some("2024-01-01T00:10:00Z".to_string()),
            events,
        }
    }

    #[test]
    fn test_switch_events_filters_and_sorts() {
        let s = session(vec![
            event(EventType::TabSwitch, "2024-01-01T00:03:00Z", Some("b")),
            event(EventType::TabCreated, "2024-01-01T00:00:30Z", Some("c")),
            event(EventType::WindowFocus, "2024-01-01T00:01:00Z", None),
            event(EventType::TabSwitch, "2024-01-01T00:02:00Z", Some("a")),
        ]);

        let switches = switch_events(&s).unwrap();
        let types: Vec<_> = switches.iter().map(|e| e.event.event_type.clone()).collect();
        assert_eq!(
            types,
            vec![
                EventType::WindowFocus,
                EventType::TabSwitch,
                EventType::TabSwitch
            ]
        );
        assert!(switches.windows(2).all(|w| w[0].at <= w[1].at));

        let tabs = tab_switch_events(&s).unwrap();
        let ids: Vec<_> = tabs.iter().map(|e| e.tab_id()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let s = session(vec![
            event(EventType::TabSwitch, "2024-01-01T00:01:00Z", Some("first")),
            event(EventType::TabSwitch, "2024-01-01T00:01:00+00:00", Some("second")),
            event(EventType::TabSwitch, "2024-01-01T00:00:30Z", Some("early")),
        ]);

        let ids: Vec<_> = tab_switch_events(&s)
            .unwrap()
            .iter()
            .map(|e| e.tab_id())
            .collect();
        assert_eq!(ids, vec![Some("early"), Some("first"), Some("second")]);
    }

    #[test]
    fn test_ignored_events_are_not_parsed() {
        let s = session(vec![event(EventType::Other, "garbage", None)]);
        assert!(switch_events(&s).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_switch_timestamp_fails() {
        let s = session(vec![event(EventType::WindowFocus, "not-a-date", None)]);
        assert!(matches!(
            switch_events(&s),
            Err(ComputeError::ParseError { .. })
        ));
    }

    #[test]
    fn test_missing_tab_id_fails() {
        let s = session(vec![
            event(EventType::WindowFocus, "2024-01-01T00:01:00Z", None),
            event(EventType::TabSwitch, "2024-01-01T00:02:00Z", None),
        ]);

        match tab_switch_events(&s) {
            Err(ComputeError::MissingField(field)) => assert_eq!(field, "events[1].tab_id"),
            other => panic!("unexpected result: {other:?}"),
        }
        // The combined view does not need tab ids.
        assert_eq!(switch_events(&s).unwrap().len(), 2);
    }

    #[test]
    fn test_session_bounds_missing_start() {
        let mut s = session(vec![]);
        s.start_time = None;
        match session_bounds(&s) {
            Err(ComputeError::MissingField(field)) => assert_eq!(field, "start_time"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_session_bounds_missing_end() {
        let mut s = session(vec![]);
        s.end_time = None;
        match session_bounds(&s) {
            Err(ComputeError::MissingField(field)) => assert_eq!(field, "end_time"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_switch_timestamp_fails() {
        let mut untimed = event(EventType::TabSwitch, "", Some("a"));
        untimed.timestamp = None;
        let s = session(vec![
            event(EventType::WindowFocus, "2024-01-01T00:01:00Z", None),
            untimed,
        ]);

        for result in [switch_events(&s), tab_switch_events(&s)] {
            match result {
                Err(ComputeError::MissingField(field)) => {
                    assert_eq!(field, "events[1].timestamp")
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
