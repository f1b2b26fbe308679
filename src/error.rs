use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the file-facing parts of the library.
///
/// Malformed datasets are not errors: they load as an empty collection and
/// are reported through `tracing` instead.
#[derive(Debug, Error)]
pub enum VizError {
    /// Merge was invoked without any input path.
    #[error("no input files provided")]
    NoInputFiles,

    /// Every candidate file was unreadable or did not parse as benchmark data.
    #[error("no valid benchmark files processed ({skipped} skipped)")]
    NoValidBenchmarks { skipped: usize },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A benchmark naming pattern failed validation.
    #[error("invalid naming pattern: {0}")]
    InvalidPattern(String),

    /// A `go test -json` stream held a line that is not a test event.
    #[error("invalid test event stream: {0}")]
    TestEvents(#[source] serde_json::Error),

    /// The preferences file exists but is not a JSON object of strings.
    #[error("corrupt preferences file: {0}")]
    Preferences(String),
}

pub type VizResult<T> = std::result::Result<T, VizError>;
