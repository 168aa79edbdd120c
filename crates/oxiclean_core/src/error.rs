use std::{io, path::PathBuf};
use thiserror::Error;

/// Why imports could not be extracted from a file.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl ExtractError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Read { path, .. } | ExtractError::Parse { path, .. } => path,
        }
    }
}
