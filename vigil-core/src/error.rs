use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("fact store error: {0}")]
    Store(#[from] reqwest::Error),

    #[error("invalid policy {path}: {message}")]
    InvalidPolicy { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
