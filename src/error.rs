use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a parse before any line is looked at.
///
/// Malformed lines are never reported here; they are skipped.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read data")]
    Read {
        #[source]
        source: io::Error,
    },
}
