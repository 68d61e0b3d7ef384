use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Empty Input: {0}")]
    EmptyPopulation(String),

    #[error("Population was already initialized")]
    AlreadyInitialized,

    #[error("Population has not been initialized")]
    NotInitialized,
}

pub type SegResult<T> = Result<T, SegError>;
