//! Call-scoped record of shared resources already written to a document.

use rustc_hash::FxHashSet;

use crate::assets::GeometryHandle;

/// Tracks which geometries have been emitted during one top-level
/// serialization call.
///
/// A geometry shared by N meshes must appear once in `geometries.vertexData`.
/// Materials do not go through this cache; they are deduplicated by looking
/// for their id in the output section itself.
///
/// The cache is keyed on asset handles and lives exactly as long as one call:
/// every entry point creates a fresh instance (or [`reset`](Self::reset)s the
/// one it is given) and all nested work of that call shares it.
#[derive(Debug, Default)]
pub struct EntityCache {
    emitted_geometries: FxHashSet<GeometryHandle>,
}

impl EntityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn has_emitted(&self, geometry: GeometryHandle) -> bool {
        self.emitted_geometries.contains(&geometry)
    }

    #[inline]
    pub fn mark_emitted(&mut self, geometry: GeometryHandle) {
        self.emitted_geometries.insert(geometry);
    }

    pub fn reset(&mut self) {
        self.emitted_geometries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emitted_geometries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emitted_geometries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn reset_forgets_everything() {
        let mut keys = SlotMap::<GeometryHandle, ()>::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut cache = EntityCache::new();
        cache.mark_emitted(a);
        assert!(cache.has_emitted(a));
        assert!(!cache.has_emitted(b));

        cache.reset();
        assert!(cache.is_empty());
        assert!(!cache.has_emitted(a));
    }
}
