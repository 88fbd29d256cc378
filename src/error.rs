use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a harness run.
///
/// All variants are fatal at the top level: the library propagates them and
/// the binary reports and exits. Nothing is retried — the whole point of the
/// run is to detect exactly these conditions.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Unsupported shape or invariant violation in the run configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unreadable input or unwritable output.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The engine's output is out of order. Indicates a defect in the engine
    /// (or data corruption), not in the harness.
    #[error("result is not sorted: record {index} is greater than its successor")]
    NotSorted { index: usize },

    /// Full validation found a record that differs from the independently
    /// sorted reference.
    #[error("result differs from sorted reference at record {index}")]
    ValidationMismatch { index: usize },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}
