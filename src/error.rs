//! Error types for the integrity-analysis pipeline

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Single user-facing failure notice. Every non-input error collapses to
/// this at the presentation boundary; the typed kind stays in the logs.
pub const ANALYSIS_FAILED_NOTICE: &str = "Analysis failed. Please try again.";

#[derive(Error, Debug)]
pub enum AnalysisError {

    // =============================
    // Pipeline Errors
    // =============================

    /// Nothing usable to send: empty text, no file. Caught before any
    /// network call.
    #[error("Input error: {0}")]
    Input(String),

    /// A file or video frame could not be converted into a payload.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The external model call itself rejected or errored.
    #[error("Service error: {0}")]
    Service(String),

    /// Response text did not conform to the expected schema.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnalysisError {
    /// Whether this failure was caught before spending a network call.
    pub fn is_input(&self) -> bool {
        matches!(self, AnalysisError::Input(_))
    }

    /// The message shown to the user. Input errors surface as a no-op in
    /// the UI (disabled control / early return), everything else collapses
    /// into one retry notice.
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_NOTICE
    }
}
