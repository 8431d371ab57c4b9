use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing framework files
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No plugins defined in {}", .0.display())]
    Empty(PathBuf),

    #[error("No valid plugins could be loaded")]
    NoPluginsLoaded,

    #[error("Invalid plugin: {0}")]
    InvalidPlugin(String),
}

impl ManifestError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
