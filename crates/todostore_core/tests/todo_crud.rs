use todostore_core::{
    BackendError, BackendResult, MemoryBackend, StorageBackend, StoreError, Todo, TodoId,
    TodoListQuery, TodoStore, TodoUpdate,
};
use uuid::Uuid;

fn store() -> TodoStore<MemoryBackend> {
    TodoStore::open(MemoryBackend::new()).unwrap()
}

#[test]
fn create_applies_done_default() {
    let store = store();
    let todo = store.create("buy milk", None).unwrap();
    assert_eq!(todo.text, "buy milk");
    assert!(!todo.done);
}

#[test]
fn create_honors_explicit_done() {
    let store = store();
    let todo = store.create("already handled", Some(true)).unwrap();
    assert!(todo.done);
}

#[test]
fn create_rejects_empty_and_whitespace_text() {
    let store = store();
    let err = store.create("", None).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    let err = store.create("   ", None).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert!(store.is_empty());
}

#[test]
fn create_rejects_duplicate_text() {
    let store = store();
    store.create("pay rent", None).unwrap();
    let err = store.create("pay rent", Some(true)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateText { text } if text == "pay rent"));
    assert_eq!(store.len(), 1);
}

#[test]
fn get_unknown_id_is_not_found() {
    let store = store();
    let missing = Uuid::new_v4();
    let err = store.get(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn update_patches_fields_and_keeps_id() {
    let store = store();
    let created = store.create("draft", None).unwrap();

    let updated = store
        .update(
            created.id,
            &TodoUpdate {
                text: Some("final".to_string()),
                done: Some(true),
            },
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.text, "final");
    assert!(updated.done);

    let fetched = store.get(created.id).unwrap();
    assert_eq!(fetched, updated);
}

#[test]
fn update_with_conflicting_text_leaves_record_unchanged() {
    let store = store();
    store.create("first", None).unwrap();
    let second = store.create("second", None).unwrap();

    let err = store
        .update(
            second.id,
            &TodoUpdate {
                text: Some("first".to_string()),
                done: Some(true),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateText { text } if text == "first"));

    // All-or-nothing: neither field moved.
    let fetched = store.get(second.id).unwrap();
    assert_eq!(fetched.text, "second");
    assert!(!fetched.done);
}

#[test]
fn update_rejects_empty_text() {
    let store = store();
    let created = store.create("keep me", None).unwrap();
    let err = store
        .update(
            created.id,
            &TodoUpdate {
                text: Some(String::new()),
                ..TodoUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(store.get(created.id).unwrap().text, "keep me");
}

#[test]
fn update_unknown_id_is_not_found() {
    let store = store();
    let err = store
        .update(Uuid::new_v4(), &TodoUpdate::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_frees_text_for_reuse_but_not_the_id() {
    let store = store();
    let first = store.create("water plants", None).unwrap();
    store.delete(first.id).unwrap();

    let second = store.create("water plants", None).unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.text, "water plants");
}

#[test]
fn delete_unknown_id_is_an_explicit_error() {
    let store = store();
    let created = store.create("once", None).unwrap();
    store.delete(created.id).unwrap();

    let err = store.delete(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == created.id));
}

#[test]
fn list_filters_by_done_flag() {
    let store = store();
    store.create("open one", None).unwrap();
    let done = store.create("closed one", Some(true)).unwrap();
    store.create("open two", None).unwrap();

    let completed = store
        .list(&TodoListQuery {
            done: Some(true),
            ..TodoListQuery::default()
        })
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done.id);

    let pending = store
        .list(&TodoListQuery {
            done: Some(false),
            ..TodoListQuery::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 2);
}

#[test]
fn list_returns_creation_order_with_stable_pagination() {
    let store = store();
    let a = store.create("a", None).unwrap();
    let b = store.create("b", None).unwrap();
    let c = store.create("c", None).unwrap();

    let all = store.list(&TodoListQuery::default()).unwrap();
    let ids: Vec<TodoId> = all.into_iter().map(|todo| todo.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);

    let page = store
        .list(&TodoListQuery {
            limit: Some(1),
            offset: 1,
            ..TodoListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, b.id);
}

#[test]
fn list_snapshot_is_isolated_from_later_mutations() {
    let store = store();
    let doomed = store.create("soon gone", None).unwrap();
    let snapshot = store.list(&TodoListQuery::default()).unwrap();

    store.delete(doomed.id).unwrap();

    // The handed-out snapshot still iterates cleanly over the old state.
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, doomed.id);
    assert!(store.is_empty());
}

#[test]
fn create_update_duplicate_delete_flow() {
    let store = store();

    let created = store.create("wash car", None).unwrap();
    assert_eq!(created.text, "wash car");
    assert!(!created.done);

    let updated = store
        .update(
            created.id,
            &TodoUpdate {
                done: Some(true),
                ..TodoUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.text, "wash car");
    assert!(updated.done);

    let err = store.create("wash car", None).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateText { .. }));

    store.delete(created.id).unwrap();
    let err = store.get(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == created.id));
}

/// Backend double whose writes always fail, for propagation checks.
struct UnavailableBackend;

impl StorageBackend for UnavailableBackend {
    fn put(&self, _todo: &Todo) -> BackendResult<()> {
        Err(BackendError::Unavailable("disk on fire".to_string()))
    }

    fn get(&self, _id: TodoId) -> BackendResult<Option<Todo>> {
        Err(BackendError::Unavailable("disk on fire".to_string()))
    }

    fn delete(&self, _id: TodoId) -> BackendResult<()> {
        Err(BackendError::Unavailable("disk on fire".to_string()))
    }

    fn scan(&self) -> BackendResult<Vec<Todo>> {
        Ok(Vec::new())
    }
}

#[test]
fn backend_failure_is_propagated_and_applies_nothing() {
    let store = TodoStore::open(UnavailableBackend).unwrap();
    let err = store.create("never lands", None).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Storage(BackendError::Unavailable(_))
    ));

    // The failed create left no trace in the live set, so the text is free.
    assert!(store.is_empty());
    let err = store.create("never lands", None).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
}
