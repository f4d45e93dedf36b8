//! Session and feature types
//!
//! Input types mirror the session log produced by the browser extension. Output types
//! define the feature record handed back to callers.

use serde::{Deserialize, Serialize};

/// Interaction event types recorded during a browsing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// The active tab changed
    TabSwitch,
    /// A browser window gained focus
    WindowFocus,
    /// A tab was opened (recorded, not interpreted)
    TabCreated,
    /// A tab was closed (recorded, not interpreted)
    TabRemoved,
    /// Any event type this crate does not interpret
    #[serde(other)]
    Other,
}

impl EventType {
    /// Whether the event marks an attention-context boundary
    pub fn is_switch(&self) -> bool {
        matches!(self, EventType::TabSwitch | EventType::WindowFocus)
    }
}

/// A single interaction event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type
    pub event_type: EventType,
    /// ISO-8601 timestamp as recorded
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Tab switched to (required for TAB_SWITCH)
    #[serde(default)]
    pub tab_id: Option<String>,
    /// Window the event happened in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    /// Hostname of the active tab, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// A closed browsing session
///
/// Timestamps are kept as text; they are parsed during extraction so that a missing or
/// malformed value surfaces as a typed error instead of a generic JSON failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier
    #[serde(default)]
    pub session_id: Option<String>,
    /// Session start (ISO-8601)
    #[serde(default)]
    pub start_time: Option<String>,
    /// Session end (ISO-8601)
    #[serde(default)]
    pub end_time: Option<String>,
    /// Recorded events, in any order
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Attention-fragmentation features for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFeatures {
    /// `end_time - start_time` in seconds (negative for a malformed session)
    pub session_duration_s: f64,
    /// Seconds from session start to the first switch event
    pub ttfs_s: f64,
    /// Switch events per minute of session
    pub switch_rate_per_min: f64,
    /// Mean focus-block duration, null when there are no blocks
    pub avg_focus_block_s: Option<f64>,
    /// Median focus-block duration, null when there are no blocks
    pub median_focus_block_s: Option<f64>,
    /// Number of disjoint rapid-switching clusters
    pub burst_count: u32,
    /// A→B→A returns divided by the total tab-switch count
    pub return_ratio: f64,
}

/// Intermediate values exposed alongside the features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// Focus-block durations in seconds, in session order
    pub focus_blocks_s: Vec<f64>,
}

/// Result of extracting features from one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Passed through from the session (null when absent)
    pub session_id: Option<String>,
    pub features: SessionFeatures,
    pub derived: DerivedFeatures,
}
