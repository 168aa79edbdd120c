use std::{io, path::PathBuf};
use thiserror::Error;

/// Rejected rule options. Raised before any traversal starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rule options from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid rule options in {origin}: {source}")]
    Schema {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`entryPoints` must contain at least one path")]
    EmptyEntryPoints,

    #[error("duplicate value '{value}' in `{option}`")]
    Duplicate { option: &'static str, value: String },
}
