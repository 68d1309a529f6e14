//! SQLite key-value backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections for todostore.
//! - Persist raw todo records in a single `todos` table.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - The table carries no uniqueness constraint on `text`; the store owns
//!   that invariant entirely.

use crate::backend::{BackendError, BackendResult, StorageBackend};
use crate::model::todo::{Todo, TodoId};
use log::{error, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;

const SCHEMA_VERSION: u32 = 1;
const SCHEMA_SQL: &str = "CREATE TABLE todos (
    id TEXT PRIMARY KEY NOT NULL,
    text TEXT NOT NULL,
    done INTEGER NOT NULL DEFAULT 0
);";

const TODO_SELECT_SQL: &str = "SELECT id, text, done FROM todos";

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// Opens a SQLite database file ready for backend use.
///
/// # Side effects
/// - Performs connection bootstrap and schema checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> BackendResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=backend status=start mode=file");

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=backend status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=backend status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=backend status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory SQLite database ready for backend use.
///
/// # Side effects
/// - Performs connection bootstrap and schema checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> BackendResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=backend status=start mode=memory");

    let mut conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=backend status=error mode=memory duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=backend status=ok mode=memory duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=backend status=error mode=memory duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> BackendResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let version = current_user_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(BackendError::Unavailable(format!(
            "database schema version {version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    if version < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        tx.commit()?;
    }

    Ok(())
}

fn current_user_version(conn: &Connection) -> BackendResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// SQLite-backed `StorageBackend` over a single `todos` table.
///
/// The connection is guarded by a mutex because SQLite connections are not
/// shareable across threads.
#[derive(Debug)]
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Wraps a bootstrapped connection after readiness checks.
    ///
    /// # Errors
    /// Returns `Unavailable` when the connection was not opened through
    /// `open_db`/`open_db_in_memory` or is missing the `todos` table.
    pub fn try_new(conn: Connection) -> BackendResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn ensure_connection_ready(conn: &Connection) -> BackendResult<()> {
    let version = current_user_version(conn)?;
    if version == 0 {
        return Err(BackendError::Unavailable(
            "connection is not bootstrapped; open it via open_db or open_db_in_memory".to_string(),
        ));
    }
    if version > SCHEMA_VERSION {
        return Err(BackendError::Unavailable(format!(
            "database schema version {version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    let tables = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'todos';",
        [],
        |row| row.get::<_, u32>(0),
    )?;
    if tables == 0 {
        return Err(BackendError::Unavailable(
            "todos table is missing".to_string(),
        ));
    }

    Ok(())
}

impl StorageBackend for SqliteBackend {
    fn put(&self, todo: &Todo) -> BackendResult<()> {
        self.conn.lock().execute(
            "INSERT INTO todos (id, text, done)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET text = excluded.text, done = excluded.done;",
            params![todo.id.to_string(), todo.text.as_str(), i64::from(todo.done)],
        )?;
        Ok(())
    }

    fn get(&self, id: TodoId) -> BackendResult<Option<Todo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn delete(&self, id: TodoId) -> BackendResult<()> {
        let changed = self
            .conn
            .lock()
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(BackendError::NotFound(id));
        }
        Ok(())
    }

    fn scan(&self) -> BackendResult<Vec<Todo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }
}

fn parse_todo_row(row: &Row<'_>) -> BackendResult<Todo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        BackendError::Unavailable(format!("invalid uuid value `{id_text}` in todos.id"))
    })?;

    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(BackendError::Unavailable(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    Ok(Todo::with_id(id, row.get::<_, String>("text")?, done))
}
