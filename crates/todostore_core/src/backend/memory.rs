//! In-memory backend for tests and smoke probes.
//!
//! # Responsibility
//! - Provide a volatile `StorageBackend` double with no I/O.
//!
//! # Invariants
//! - Records are stored verbatim; nothing here inspects `text` or `done`.

use crate::backend::{BackendError, BackendResult, StorageBackend};
use crate::model::todo::{Todo, TodoId};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Volatile map-backed storage double.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<TodoId, Todo>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn put(&self, todo: &Todo) -> BackendResult<()> {
        self.records.lock().insert(todo.id, todo.clone());
        Ok(())
    }

    fn get(&self, id: TodoId) -> BackendResult<Option<Todo>> {
        Ok(self.records.lock().get(&id).cloned())
    }

    fn delete(&self, id: TodoId) -> BackendResult<()> {
        match self.records.lock().remove(&id) {
            Some(_) => Ok(()),
            None => Err(BackendError::NotFound(id)),
        }
    }

    fn scan(&self) -> BackendResult<Vec<Todo>> {
        Ok(self.records.lock().values().cloned().collect())
    }
}
