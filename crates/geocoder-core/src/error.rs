// crates/geocoder-core/src/error.rs
use thiserror::Error;

/// Errors produced while loading, building or persisting a geocoder.
///
/// Query processing never fails: an empty or unmatched query yields an empty
/// result list. Every variant here belongs to the load/save path.
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    /// The file does not start with the binary index magic.
    #[error("Not a geocoder binary index (bad magic)")]
    BadMagic,

    /// The binary index was written by a different format version.
    #[error("Binary index format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// A single hierarchy line could not be turned into an entry.
    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Init logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),
}

impl GeocoderError {
    /// True for failures that come from opening a binary index: unreadable
    /// file, foreign file or a format version this build does not speak.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::NotFound(_) | Self::BadMagic | Self::VersionMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GeocoderError>;
