use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("repository access error: {0}")]
    RepositoryAccess(String),
    #[error("summarization error: {0}")]
    Summarization(String),
    #[error("spreadsheet access error: {0}")]
    SpreadsheetAccess(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
