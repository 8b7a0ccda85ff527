use thiserror::Error;

/// Main error type for the Video-Splicer library
#[derive(Error, Debug)]
pub enum SplicerError {
    #[error("Instruction error: {0}")]
    Instruction(#[from] InstructionError),

    #[error("Video error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Per-instruction rejection reasons
///
/// A rejection is not fatal: the engine records it, warns, and moves on to
/// the next token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstructionError {
    #[error("malformed time literal '{literal}'")]
    MalformedTime { literal: String },

    #[error("{seconds}s is past the end of the video ({duration:.1}s)")]
    PastEnd { seconds: u64, duration: f64 },

    #[error("range start {start}s is not before its end {end}s")]
    EmptyRange { start: u64, end: u64 },

    #[error("unrecognized instruction shape")]
    UnrecognizedShape,
}

/// Video probing and extraction errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("input file not found: {path}")]
    NotFound { path: String },

    #[error("failed to probe {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("no duration reported for {path}")]
    MissingDuration { path: String },

    #[error("frame capture failed: {reason}")]
    FrameCaptureFailed { reason: String },

    #[error("clip extraction failed: {reason}")]
    ClipExtractionFailed { reason: String },

    #[error("{tool} is not available on this system")]
    ToolUnavailable { tool: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SplicerError
pub type Result<T> = std::result::Result<T, SplicerError>;

impl SplicerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }
}
