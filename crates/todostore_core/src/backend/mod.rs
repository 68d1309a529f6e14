//! Durable backend contract and implementations.
//!
//! # Responsibility
//! - Define the key-value persistence boundary consumed by the store.
//! - Keep backends free of business invariants; uniqueness lives upstream.
//!
//! # Invariants
//! - Backends persist records verbatim, keyed by `TodoId`.
//! - Backend failures surface as `BackendError::Unavailable` and are never
//!   retried at this layer.

use crate::model::todo::{Todo, TodoId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub type BackendResult<T> = Result<T, BackendError>;

/// Transport-level error for backend persistence operations.
#[derive(Debug)]
pub enum BackendError {
    /// No record is stored under the given id.
    NotFound(TodoId),
    /// The backing storage failed; the message is backend-specific.
    Unavailable(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no stored record for id {id}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for BackendError {}

/// Key-value persistence contract consumed by the todo store.
///
/// Implementations store raw records only; identity and uniqueness
/// bookkeeping stays in the store.
pub trait StorageBackend: Send + Sync {
    /// Inserts or replaces the record stored under `todo.id`.
    fn put(&self, todo: &Todo) -> BackendResult<()>;

    /// Reads one record by id.
    fn get(&self, id: TodoId) -> BackendResult<Option<Todo>>;

    /// Removes the record stored under `id`.
    ///
    /// Returns `NotFound` when no record is stored under `id`.
    fn delete(&self, id: TodoId) -> BackendResult<()>;

    /// Returns every stored record.
    fn scan(&self) -> BackendResult<Vec<Todo>>;
}
