//! Todo store: invariant owner over a durable backend.
//!
//! # Responsibility
//! - Enforce id generation, text uniqueness and the done default.
//! - Delegate raw persistence to a `StorageBackend` implementation.
//!
//! # Invariants
//! - The id->record map and the text->id index mutate together or not at
//!   all; the uniqueness check and the mutation happen under one write
//!   scope.
//! - Backend failures surface unchanged; no partial state is ever applied.
//! - Generated ids are never reused, even after delete.

use crate::backend::{BackendError, StorageBackend};
use crate::model::todo::{Todo, TodoId, TodoValidationError};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for todo operations.
#[derive(Debug)]
pub enum StoreError {
    /// Caller input broke a field contract.
    InvalidInput(TodoValidationError),
    /// Another live record already holds the requested text.
    DuplicateText { text: String },
    /// No live record with that id.
    NotFound(TodoId),
    /// Persisted state loaded from the backend violates store invariants.
    InvalidData(String),
    /// Backend failure, propagated unchanged.
    Storage(BackendError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::DuplicateText { text } => write!(f, "todo text `{text}` already exists"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::DuplicateText { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<BackendError> for StoreError {
    fn from(value: BackendError) -> Self {
        Self::Storage(value)
    }
}

/// Query options for listing todos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    /// Optional completion-flag filter.
    pub done: Option<bool>,
    /// Maximum rows to return.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Field patch for `update`; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    /// Replacement text. Re-validated for uniqueness when it differs from
    /// the current value.
    pub text: Option<String>,
    /// Replacement completion flag.
    pub done: Option<bool>,
}

#[derive(Debug)]
struct IndexedTodo {
    todo: Todo,
    /// Position in creation order. Never persisted; rebuilt on `open`.
    seq: u64,
}

#[derive(Debug)]
struct Indexes {
    by_id: HashMap<TodoId, IndexedTodo>,
    by_text: HashMap<String, TodoId>,
    next_seq: u64,
}

/// In-process todo store enforcing identity and uniqueness invariants.
///
/// Safe to share across threads behind an `Arc`; writers serialize on one
/// lock covering both indexes, readers share it.
#[derive(Debug)]
pub struct TodoStore<B: StorageBackend> {
    backend: B,
    indexes: RwLock<Indexes>,
}

impl<B: StorageBackend> TodoStore<B> {
    /// Opens a store over `backend`, rebuilding both indexes from a full
    /// scan.
    ///
    /// # Errors
    /// - `InvalidData` when persisted records violate the non-empty-text or
    ///   unique-text invariants.
    /// - `Storage` when the scan itself fails.
    pub fn open(backend: B) -> StoreResult<Self> {
        let records = backend.scan()?;
        let mut indexes = Indexes {
            by_id: HashMap::new(),
            by_text: HashMap::new(),
            next_seq: 0,
        };

        for todo in records {
            todo.validate().map_err(|_| {
                StoreError::InvalidData(format!("empty text in stored record {}", todo.id))
            })?;
            if let Some(existing) = indexes.by_text.insert(todo.text.clone(), todo.id) {
                return Err(StoreError::InvalidData(format!(
                    "records {existing} and {} share the same text",
                    todo.id
                )));
            }
            let seq = indexes.next_seq;
            indexes.next_seq += 1;
            indexes.by_id.insert(todo.id, IndexedTodo { todo, seq });
        }

        info!(
            "event=store_open module=store status=ok records={}",
            indexes.by_id.len()
        );
        Ok(Self {
            backend,
            indexes: RwLock::new(indexes),
        })
    }

    /// Creates a new todo with a generated id.
    ///
    /// # Contract
    /// - `text` must be non-empty after trimming.
    /// - `done` defaults to `false` when omitted.
    /// - Rejects with `DuplicateText` when a live record already holds
    ///   `text`.
    pub fn create(&self, text: impl Into<String>, done: Option<bool>) -> StoreResult<Todo> {
        let todo = Todo::with_id(Uuid::new_v4(), text, done.unwrap_or(false));
        todo.validate()?;

        let mut indexes = self.indexes.write();
        if indexes.by_text.contains_key(&todo.text) {
            debug!(
                "event=todo_create module=store status=rejected reason=duplicate_text text_len={}",
                todo.text.len()
            );
            return Err(StoreError::DuplicateText { text: todo.text });
        }

        self.backend.put(&todo)?;

        let seq = indexes.next_seq;
        indexes.next_seq += 1;
        indexes.by_text.insert(todo.text.clone(), todo.id);
        indexes.by_id.insert(
            todo.id,
            IndexedTodo {
                todo: todo.clone(),
                seq,
            },
        );

        info!(
            "event=todo_create module=store status=ok id={} text_len={}",
            todo.id,
            todo.text.len()
        );
        Ok(todo)
    }

    /// Gets one live todo by id.
    ///
    /// Served from the in-memory index under a read lock; the backend is
    /// not consulted.
    pub fn get(&self, id: TodoId) -> StoreResult<Todo> {
        self.indexes
            .read()
            .by_id
            .get(&id)
            .map(|entry| entry.todo.clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Applies a field patch to one live todo.
    ///
    /// A changed `text` re-validates uniqueness against *other* live
    /// records before anything mutates; on conflict the record is left
    /// unchanged.
    pub fn update(&self, id: TodoId, patch: &TodoUpdate) -> StoreResult<Todo> {
        let mut indexes = self.indexes.write();

        let mut next = match indexes.by_id.get(&id) {
            Some(entry) => entry.todo.clone(),
            None => return Err(StoreError::NotFound(id)),
        };
        let previous_text = next.text.clone();
        if let Some(text) = &patch.text {
            next.text = text.clone();
        }
        if let Some(done) = patch.done {
            next.done = done;
        }
        next.validate()?;

        if next.text != previous_text {
            if let Some(owner) = indexes.by_text.get(&next.text) {
                if *owner != id {
                    debug!(
                        "event=todo_update module=store status=rejected reason=duplicate_text id={id}"
                    );
                    return Err(StoreError::DuplicateText { text: next.text });
                }
            }
        }

        self.backend.put(&next)?;

        if next.text != previous_text {
            indexes.by_text.remove(&previous_text);
            indexes.by_text.insert(next.text.clone(), id);
        }
        if let Some(entry) = indexes.by_id.get_mut(&id) {
            entry.todo = next.clone();
        }

        info!(
            "event=todo_update module=store status=ok id={id} text_changed={} done={}",
            next.text != previous_text,
            next.done
        );
        Ok(next)
    }

    /// Deletes one live todo, freeing its text for reuse by future records.
    ///
    /// Returns `NotFound` for a missing id; deletion is not a silent no-op.
    pub fn delete(&self, id: TodoId) -> StoreResult<()> {
        let mut indexes = self.indexes.write();
        if !indexes.by_id.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }

        self.backend.delete(id)?;

        if let Some(entry) = indexes.by_id.remove(&id) {
            indexes.by_text.remove(&entry.todo.text);
        }

        info!("event=todo_delete module=store status=ok id={id}");
        Ok(())
    }

    /// Lists live todos as a structural snapshot in creation order.
    ///
    /// The snapshot is taken under a read lock, so concurrent mutations
    /// never corrupt an iteration already handed out.
    pub fn list(&self, query: &TodoListQuery) -> StoreResult<Vec<Todo>> {
        let mut rows: Vec<(u64, Todo)> = {
            let indexes = self.indexes.read();
            indexes
                .by_id
                .values()
                .filter(|entry| query.done.map_or(true, |done| entry.todo.done == done))
                .map(|entry| (entry.seq, entry.todo.clone()))
                .collect()
        };
        rows.sort_by_key(|(seq, _)| *seq);

        let mut todos: Vec<Todo> = rows
            .into_iter()
            .skip(query.offset as usize)
            .map(|(_, todo)| todo)
            .collect();
        if let Some(limit) = query.limit {
            todos.truncate(limit as usize);
        }
        Ok(todos)
    }

    /// Returns the number of live records.
    pub fn len(&self) -> usize {
        self.indexes.read().by_id.len()
    }

    /// Returns whether the store holds no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
