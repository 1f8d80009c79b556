use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown transaction kind: {0}")]
    UnknownKind(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
