//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `todostore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use todostore_core::{MemoryBackend, TodoListQuery, TodoStore};

fn main() {
    println!("todostore_core version={}", todostore_core::core_version());

    let store = match TodoStore::open(MemoryBackend::new()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            std::process::exit(1);
        }
    };

    let todo = match store.create("smoke check", None) {
        Ok(todo) => todo,
        Err(err) => {
            eprintln!("create failed: {err}");
            std::process::exit(1);
        }
    };

    let listed = store
        .list(&TodoListQuery::default())
        .map(|todos| todos.len())
        .unwrap_or(0);
    println!("todostore_core created done={} listed={listed}", todo.done);
}
