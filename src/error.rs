//! Error types for the analysis engine

use thiserror::Error;

/// Errors that can occur while decoding audio or running an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed or unsupported container data (bad RIFF header, non-PCM
    /// format, unsupported bit depth or channel count)
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An external decode primitive rejected its input
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// A caller-supplied parameter is out of range or inconsistent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AnalysisError>;
