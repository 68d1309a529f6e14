//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the store and its backends.
//! - Own field-level validation for write paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `text` is non-empty after trimming.
//! - `done` always carries a concrete value, defaulting to `false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every todo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Validation failure for todo field contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `text` is empty or whitespace-only.
    EmptyText,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text must not be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical record for one todo item.
///
/// The store assigns `id` and enforces `text` uniqueness; the record itself
/// only knows its own field contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable global ID, assigned once at creation.
    pub id: TodoId,
    /// Human-entered text. Unique across live records; enforced by the store.
    pub text: String,
    /// Completion flag.
    pub done: bool,
}

impl Todo {
    /// Creates a new todo with a generated stable ID and `done = false`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text, false)
    }

    /// Creates a todo with a caller-provided ID and flag.
    ///
    /// Used by backend load paths where identity already exists on disk.
    pub fn with_id(id: TodoId, text: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            text: text.into(),
            done,
        }
    }

    /// Checks field contracts required before any persistence.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(())
    }
}
