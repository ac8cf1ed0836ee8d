use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid dataset identifier: {0:?}")]
    InvalidDoi(String),
    #[error("no dataset segment in path: {0:?}")]
    MissingDatasetSegment(String),
    #[error("container name too short: {0:?}")]
    InvalidContainerName(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
