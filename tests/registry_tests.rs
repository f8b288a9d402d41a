//! Store registry lifecycle: caching, on-disk layout and close semantics.

use std::sync::{Arc, Barrier};
use std::thread;

use edgestore::domain::context::MutationContext;
use edgestore::error::Error;
use edgestore::store::handle::DATABASE_FILE;
use edgestore::store::registry::StoreRegistry;
use edgestore::store::settings::StoreSettings;
use edgestore::testkit::records::{payload, Task, TASKS};
use edgestore::testkit::store::TempRegistry;
use tempfile::TempDir;

#[test]
fn concurrent_get_or_create_yields_one_facade_and_one_store() {
    let registry = Arc::new(TempRegistry::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get_or_create("X").unwrap()
            })
        })
        .collect();
    let stores: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(stores.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(registry.names(), vec!["X"]);

    let dirs: Vec<_> = std::fs::read_dir(registry.root())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(dirs, vec!["X"]);
    assert!(registry.root().join("X").join(DATABASE_FILE).exists());
}

#[test]
fn data_survives_close_and_reopen() {
    let root = TempDir::new().unwrap();
    {
        let registry = StoreRegistry::new(StoreSettings::new(root.path()));
        let store = registry.get_or_create("tasks").unwrap();
        store
            .create(
                &TASKS,
                &payload(&Task::new("t-1", 1, "running")),
                &MutationContext::default(),
            )
            .unwrap();
        assert_eq!(registry.close_all(), 1);
    }

    let registry = StoreRegistry::new(StoreSettings::new(root.path()));
    let store = registry.get_or_create("tasks").unwrap();
    assert_eq!(
        store.get(&TASKS, "t-1").unwrap(),
        Some(Task::new("t-1", 1, "running"))
    );
    assert_eq!(store.change_count().unwrap(), 1);
}

#[test]
fn facade_fails_after_its_store_is_closed() {
    let registry = TempRegistry::new();
    let store = registry.get_or_create("tasks").unwrap();
    registry.close("tasks");

    let err = store
        .create(
            &TASKS,
            &payload(&Task::new("t-1", 1, "running")),
            &MutationContext::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::StoreClosed { ref store } if store == "tasks"));
    assert!(matches!(store.query(&TASKS, &[]), Err(Error::StoreClosed { .. })));
}

#[test]
fn close_all_invalidates_every_facade() {
    let registry = TempRegistry::new();
    let a = registry.get_or_create("a").unwrap();
    let b = registry.get_or_create("b").unwrap();

    assert_eq!(registry.close_all(), 2);
    assert!(!a.handle().is_open());
    assert!(!b.handle().is_open());
    assert!(registry.get("a").is_none());
}

#[test]
fn stores_are_isolated_from_each_other() {
    let registry = TempRegistry::new();
    let one = registry.get_or_create("one").unwrap();
    let two = registry.get_or_create("two").unwrap();

    one.create(
        &TASKS,
        &payload(&Task::new("t-1", 1, "running")),
        &MutationContext::default(),
    )
    .unwrap();

    assert!(two.query(&TASKS, &[]).unwrap().is_empty());
    assert_eq!(two.change_count().unwrap(), 0);
}

#[test]
fn store_name_maps_to_its_own_directory() {
    let registry = TempRegistry::new();
    registry.get_or_create("tasks.v2").unwrap();

    assert_eq!(
        registry.settings().store_dir("tasks.v2").unwrap(),
        registry.root().join("tasks.v2")
    );
    assert!(registry.root().join("tasks.v2").join(DATABASE_FILE).exists());
}
