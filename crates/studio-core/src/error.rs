use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("not initialized: run 'studio init'")]
    NotInitialized,

    #[error("pillar not found: {0}")]
    PillarNotFound(String),

    #[error("content not found: {0}")]
    ContentNotFound(String),

    #[error("content already exists: {0}")]
    ContentExists(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("goal not found: {0}")]
    GoalNotFound(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("row not found: {0}")]
    RowNotFound(String),

    #[error("invalid id '{0}': must be 1-64 characters of letters, digits, '-' or '_'")]
    InvalidId(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid link: {0}")]
    InvalidLink(String),

    #[error("cannot pin more than {0} ideas")]
    PinLimit(usize),

    #[error("cannot delete the last standard column")]
    LastStandardColumn,

    #[error("cannot delete the last row")]
    LastRow,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
