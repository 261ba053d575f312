//! Core error types for multitimer-core.
//!
//! One top-level `CoreError` wraps the per-concern error enums so callers can
//! match on the broad category or drill into the specific failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::TimerState;

/// Core error type for multitimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected configuration values (bad ISO text, out-of-range offsets, ...)
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Operations attempted in a state that forbids them
    #[error("Precondition error: {0}")]
    Precondition(#[from] PreconditionError),

    /// Document load/save failures
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration value rejections.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Text is not a usable ISO-8601 duration
    #[error("invalid ISO-8601 duration '{text}': {message}")]
    InvalidIsoDuration { text: String, message: String },

    /// Syntactically valid ISO-8601, but carries date components
    #[error("date components are not supported in duration '{text}'")]
    DateComponentsUnsupported { text: String },

    /// Minute-of-hour offset outside 0-59
    #[error("minutes offset {value} out of range (expected 0-59)")]
    MinutesOffsetOutOfRange { value: u8 },

    /// Timer added to a group it already belongs to
    #[error("timer '{name}' is already a member of the group")]
    DuplicateMember { name: String },
}

/// Operations refused because of the current lifecycle state.
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// Timer configuration may only change while stopped or complete
    #[error("timer '{name}' is {state} and cannot be reconfigured")]
    TimerNotQuiescent { name: String, state: TimerState },

    /// Group configuration may only change while the group is idle
    #[error("group is {state} and cannot be reconfigured")]
    GroupNotQuiescent { state: TimerState },
}

/// Document persistence failures.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or parse a document
    #[error("failed to load timers from {}: {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to serialize or write a document
    #[error("failed to save timers to {}: {message}", path.display())]
    SaveFailed { path: PathBuf, message: String },

    /// Document was written by a newer release
    #[error("unsupported file version {found} (newest supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
