//! Focus Flux - attention-fragmentation features from browsing session logs
//!
//! Flux turns a closed browsing session (tab switches and window focus changes between a
//! start and end time) into a fixed set of behavioral features through a deterministic
//! pipeline: event selection → focus-block derivation → burst detection → return-pattern
//! detection → feature aggregation.
//!
//! Extraction is a pure function of one session. It holds no global state, so
//! independent sessions can be processed concurrently.

pub mod burst;
pub mod config;
pub mod error;
pub mod features;
pub mod focus;
pub mod pipeline;
pub mod returns;
pub mod selector;
pub mod time;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{FeatureConfig, BURST_MIN_SWITCHES, BURST_WINDOW_S, RETURN_WINDOW_S};
pub use error::ComputeError;
pub use features::{extract_features, FeatureExtractor};
pub use pipeline::{session_to_features, FeatureProcessor, SessionOutcome};
pub use types::{DerivedFeatures, Event, EventType, FeatureRecord, Session, SessionFeatures};

/// Focus Flux version
pub const FOCUS_FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");
