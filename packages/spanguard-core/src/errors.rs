//! Error types for spanguard-core
//!
//! Provides unified error handling across the crate.
//!
//! Lifecycle violations are findings, not errors: only caller mistakes
//! (bad configuration, unreadable config files) surface here.

use thiserror::Error;

/// Main error type for spanguard-core operations
#[derive(Debug, Error)]
pub enum SpanguardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (config file syntax)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Analysis error (malformed input graph)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration error (bad signature pattern, conflicting entries)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpanguardError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        SpanguardError::Parse(msg.into())
    }

    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        SpanguardError::Analysis(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SpanguardError::Config(msg.into())
    }
}

/// Result type alias for spanguard operations
pub type Result<T> = std::result::Result<T, SpanguardError>;
