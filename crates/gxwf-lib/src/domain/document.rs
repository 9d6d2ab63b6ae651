use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading workflow, job or manifest documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in document: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<serde_saphyr::Error>,
    },

    #[error("invalid document {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}
