//! Asset Storage Tests
//!
//! Tests for:
//! - AssetStorage: add, get, uuid deduplication, remove, replace
//! - UUID lookup: get_by_uuid, get_handle_by_uuid
//! - Thread safety: concurrent reads via RwLock
//! - AssetServer construction and storage sharing

use myth_serialize::assets::storage::{Asset, AssetStorage};
use myth_serialize::assets::AssetServer;
use myth_serialize::resources::Geometry;
use slotmap::new_key_type;
use uuid::Uuid;

new_key_type! { struct TestHandle; }

#[derive(Debug, PartialEq)]
struct Named {
    id: Uuid,
    label: &'static str,
}

impl Named {
    fn new(label: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
        }
    }
}

impl Asset for Named {
    fn uuid(&self) -> Uuid {
        self.id
    }
}

// ============================================================================
// AssetStorage Basic CRUD
// ============================================================================

#[test]
fn storage_add_and_get() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let handle = storage.add(Named::new("hello"));
    let value = storage.get(handle).unwrap();
    assert_eq!(value.label, "hello");
}

#[test]
fn storage_handle_from_other_storage_returns_none() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let handle = storage.add(Named::new("test"));
    let storage2 = AssetStorage::<TestHandle, Named>::new();
    assert!(storage2.get(handle).is_none());
}

#[test]
fn storage_multiple_assets() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let h1 = storage.add(Named::new("a"));
    let h2 = storage.add(Named::new("b"));

    assert_eq!(storage.get(h1).unwrap().label, "a");
    assert_eq!(storage.get(h2).unwrap().label, "b");
    assert_eq!(storage.len(), 2);
}

#[test]
fn storage_snapshot_lists_everything() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let h1 = storage.add(Named::new("a"));
    let h2 = storage.add(Named::new("b"));

    let handles: Vec<_> = storage.snapshot().into_iter().map(|(h, _)| h).collect();
    assert!(handles.contains(&h1));
    assert!(handles.contains(&h2));
}

// ============================================================================
// UUID-Based Storage
// ============================================================================

#[test]
fn storage_add_same_uuid_deduplicates() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let id = Uuid::new_v4();

    let h1 = storage.add(Named { id, label: "first" });
    let h2 = storage.add(Named { id, label: "second" });

    assert_eq!(h1, h2, "Same UUID should return same handle");
    assert_eq!(storage.get(h1).unwrap().label, "first");
}

#[test]
fn storage_get_by_uuid() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let asset = Named::new("hello");
    let id = asset.id;
    let handle = storage.add(asset);

    assert_eq!(storage.get_by_uuid(&id).unwrap().label, "hello");
    assert_eq!(storage.get_handle_by_uuid(&id), Some(handle));
    assert!(storage.get_by_uuid(&Uuid::new_v4()).is_none());
}

#[test]
fn storage_replace_keeps_handle() {
    let storage = AssetStorage::<TestHandle, Named>::new();
    let handle = storage.add(Named::new("old"));
    let replacement = Named::new("new");
    let new_id = replacement.id;

    let old = storage.replace(handle, replacement).unwrap();
    assert_eq!(old.label, "old");
    assert_eq!(storage.get(handle).unwrap().label, "new");
    assert_eq!(storage.get_handle_by_uuid(&new_id), Some(handle));
    assert!(storage.get_by_uuid(&old.id).is_none());
}

// ============================================================================
// Thread Safety
// ============================================================================

#[test]
fn storage_concurrent_reads() {
    use std::sync::Arc;
    use std::thread;

    let storage = Arc::new(AssetStorage::<TestHandle, Named>::new());
    let handle = storage.add(Named::new("shared"));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let s = Arc::clone(&storage);
        handles.push(thread::spawn(move || {
            assert_eq!(s.get(handle).unwrap().label, "shared");
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

// ============================================================================
// AssetServer Integration
// ============================================================================

#[test]
fn asset_server_stores_geometry() {
    let server = AssetServer::new();
    let handle = server.add_geometry(Geometry::new());
    assert!(server.geometries.get(handle).is_some());
}

#[test]
fn asset_server_clone_shares_storage() {
    let server = AssetServer::new();
    let handle = server.add_geometry(Geometry::new());

    let server2 = server.clone();
    assert!(
        server2.geometries.get(handle).is_some(),
        "Cloned server should share the same storage"
    );
}
