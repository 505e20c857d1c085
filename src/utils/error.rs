use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection acquisition failed: {0}")]
    ConnectionAcquisition(String),

    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    #[error("Pool introspection failed: {0}")]
    PoolIntrospection(String),
}

pub type Result<T> = std::result::Result<T, PoolsightError>;
