use crate::model::BookId;
use crate::validation::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid book data: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    MalformedInput(String),

    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error("Unknown sort option: {0}")]
    InvalidSortKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
