use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Workbook I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Workbook {path} is locked by another writer")]
    Locked { path: PathBuf },
    #[error("Workbook {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize workbook: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Row in sheet '{sheet}' has no text key in its first column")]
    MissingKey { sheet: String },
    #[error("Sink task failed: {0}")]
    Task(String),
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SinkError::Io {
            path: path.into(),
            source,
        }
    }
}
