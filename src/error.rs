use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("store error: {0}")]
    Store(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("renewal pass already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, JobError>;
