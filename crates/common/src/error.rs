//! Error type shared by every schedule crate.

use thiserror::Error;

/// Failures raised while loading a schedule configuration or building a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The configuration asks for something this schedule cannot do
    /// (e.g. a per-epoch list of learning rates).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A derived constant would be undefined or non-finite.
    #[error("domain error: {0}")]
    Domain(String),

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Format(#[from] serde_json::Error),
}

impl ScheduleError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
