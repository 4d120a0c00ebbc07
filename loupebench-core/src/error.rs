//! Core Errors

use thiserror::Error;

/// Precondition violations detected before any chain interaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed scenario or partition input (e.g. zero facets)
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// Malformed runner parameter (e.g. zero batch size)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
