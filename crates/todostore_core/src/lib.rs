//! Core domain logic for todostore.
//! This crate is the single source of truth for business invariants.

pub mod backend;
pub mod logging;
pub mod model;
pub mod store;

pub use backend::memory::MemoryBackend;
pub use backend::sqlite::{open_db, open_db_in_memory, SqliteBackend};
pub use backend::{BackendError, BackendResult, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId, TodoValidationError};
pub use store::todo_store::{
    StoreError, StoreResult, TodoListQuery, TodoStore, TodoUpdate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
