use thiserror::Error;

use crate::domain::{EntryId, ValidationError};

/// Flat error taxonomy exposed to transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAmount,
    MissingField,
    InvalidDate,
    NotFound,
    StorageUnavailable,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            AppError::MissingField(_) => ErrorKind::MissingField,
            AppError::InvalidDate(_) => ErrorKind::InvalidDate,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Validation failures happen before anything touches the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidAmount | ErrorKind::MissingField | ErrorKind::InvalidDate
        )
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidAmount(msg) => AppError::InvalidAmount(msg),
            ValidationError::MissingField(field) => AppError::MissingField(field.to_string()),
            ValidationError::InvalidDate(msg) => AppError::InvalidDate(msg),
        }
    }
}
