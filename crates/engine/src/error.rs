//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an expense is not found.
//! - [`InvalidExpense`] thrown when a new expense fails validation.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidExpense`]: EngineError::InvalidExpense
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidExpense(a), Self::InvalidExpense(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
