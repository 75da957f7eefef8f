//! The module contains the errors the engine can return.
//!
//! The reducer, resolver and planner never fail: anomalies there contribute
//! nothing to the result. Errors only come from the boundary, i.e. when a
//! record is built from user input, when the [`Ledger`] store is mutated or
//! when data is encoded/decoded.
//!
//! - [`InvalidAmount`] thrown when an amount is not a positive decimal.
//! - [`KeyNotFound`] thrown when a transaction id or person does not exist.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Ledger`]: super::store::Ledger
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid person: {0}")]
    InvalidPerson(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTransaction(a), Self::InvalidTransaction(b)) => a == b,
            (Self::InvalidPerson(a), Self::InvalidPerson(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.to_string() == b.to_string(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
