use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;
use uuid::Uuid;

/// Anything stored in an [`AssetStorage`] carries a stable document id.
pub trait Asset: Send + Sync + 'static {
    fn uuid(&self) -> Uuid;
}

// Internal data structure, protected by a lock.
pub struct StorageInner<H: Key, T> {
    pub map: SlotMap<H, Arc<T>>,
    pub lookup: FxHashMap<Uuid, H>,
}

impl<H: Key, T> Default for StorageInner<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::default(),
            lookup: FxHashMap::default(),
        }
    }
}

/// Handle-keyed, shareable asset table.
///
/// A single asset may be referenced from any number of owners through its
/// handle; the storage holds the only copy.
pub struct AssetStorage<H: Key, T> {
    inner: RwLock<StorageInner<H, T>>,
}

impl<H: Key, T: Asset> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T: Asset> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::default(),
        }
    }

    /// [Write] Adds an asset and returns its handle.
    ///
    /// Adding an asset whose uuid is already stored returns the existing
    /// handle and drops the new value.
    pub fn add(&self, asset: impl Into<T>) -> H {
        let asset = asset.into();
        let uuid = asset.uuid();
        let mut guard = self.inner.write();
        if let Some(&handle) = guard.lookup.get(&uuid) {
            return handle;
        }
        let handle = guard.map.insert(Arc::new(asset));
        guard.lookup.insert(uuid, handle);
        handle
    }

    /// [Write] Removes an asset. Handles to it become stale.
    pub fn remove(&self, handle: H) -> Option<Arc<T>> {
        let mut guard = self.inner.write();
        let asset = guard.map.remove(handle)?;
        guard.lookup.remove(&asset.uuid());
        Some(asset)
    }

    /// [Write] Replaces the asset behind `handle`, keeping the handle valid.
    pub fn replace(&self, handle: H, asset: impl Into<T>) -> Option<Arc<T>> {
        let asset = asset.into();
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let slot = inner.map.get_mut(handle)?;
        let old = std::mem::replace(slot, Arc::new(asset));
        inner.lookup.remove(&old.uuid());
        inner.lookup.insert(slot.uuid(), handle);
        Some(old)
    }

    /// [Read] Gets a single asset.
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.inner.read().map.contains_key(handle)
    }

    pub fn get_by_uuid(&self, uuid: &Uuid) -> Option<Arc<T>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(uuid)?;
        guard.map.get(*handle).cloned()
    }

    pub fn get_handle_by_uuid(&self, uuid: &Uuid) -> Option<H> {
        let guard = self.inner.read();
        guard.lookup.get(uuid).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [Read] Handles and assets in storage order, taken under one lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(H, Arc<T>)> {
        let guard = self.inner.read();
        guard
            .map
            .iter()
            .map(|(handle, asset)| (handle, Arc::clone(asset)))
            .collect()
    }

    /// [Read - Advanced] Acquires a read-lock guard for batch access.
    pub fn read_lock(&self) -> RwLockReadGuard<'_, StorageInner<H, T>> {
        self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::new_key_type;

    new_key_type! { struct TestHandle; }

    struct Named(Uuid);

    impl Asset for Named {
        fn uuid(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn add_dedups_by_uuid() {
        let storage: AssetStorage<TestHandle, Named> = AssetStorage::new();
        let id = Uuid::new_v4();
        let a = storage.add(Named(id));
        let b = storage.add(Named(id));
        assert_eq!(a, b);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn removed_handle_goes_stale() {
        let storage: AssetStorage<TestHandle, Named> = AssetStorage::new();
        let id = Uuid::new_v4();
        let h = storage.add(Named(id));
        assert!(storage.remove(h).is_some());
        assert!(storage.get(h).is_none());
        assert!(storage.get_by_uuid(&id).is_none());
    }
}
