//! The module contains the error the engine can throw.
//!
//! Moves never fail: a drag that cannot be resolved is a
//! [`NoOp`](crate::MoveKind::NoOp). The errors below come from the lifecycle
//! operations that add or remove whole nodes, from the board when the
//! forest it is handed is malformed, and from persistence collaborators.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a bucket, parent or child is not found.
//! - [`ExistingKey`] thrown when an id or bucket is already present.
//! - [`DuplicateId`] thrown when a forest breaks the unique id invariant.
//! - [`InvalidName`] thrown when a name is blank after normalization.
//! - [`Sink`] thrown when a [`ForestSink`] fails after a move was applied.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`DuplicateId`]: EngineError::DuplicateId
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`Sink`]: EngineError::Sink
//!  [`ForestSink`]: crate::ForestSink
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Sink failed: {0}")]
    Sink(String),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::DuplicateId(a), Self::DuplicateId(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Sink(a), Self::Sink(b)) => a == b,
            _ => false,
        }
    }
}
