use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::assets::Asset;
use crate::serialize::Value;

/// CPU-side vertex data, possibly shared by several meshes.
///
/// A geometry that is still streaming its buffers reports `is_ready() ==
/// false`; a full-scene export leaves such geometries out.
#[derive(Debug)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: String,

    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,

    /// Buffers may be rewritten after upload.
    pub updatable: bool,
    pub do_not_serialize: bool,

    // Flipped by the streaming side while the asset is shared.
    ready: AtomicBool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: String::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            updatable: false,
            do_not_serialize: false,
            ready: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// A geometry whose buffers have not arrived yet.
    #[must_use]
    pub fn pending(mut self) -> Self {
        *self.ready.get_mut() = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// The `geometries.vertexData` record.
    ///
    /// Attribute arrays are written flat; empty optional attributes are
    /// omitted.
    #[must_use]
    pub fn serialize_vertex_data(&self) -> Value {
        let mut record = Value::object()
            .with("id", self.uuid)
            .with("updatable", self.updatable)
            .with("positions", flatten(&self.positions));

        if !self.normals.is_empty() {
            record.insert("normals", flatten(&self.normals));
        }
        if !self.uvs.is_empty() {
            record.insert("uvs", flatten(&self.uvs));
        }
        if !self.colors.is_empty() {
            record.insert("colors", flatten(&self.colors));
        }
        record.insert("indices", self.indices.as_slice());
        record
    }
}

impl Asset for Geometry {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

fn flatten<const N: usize>(items: &[[f32; N]]) -> Value {
    Value::Array(
        items
            .iter()
            .flat_map(|item| item.iter().copied().map(Value::from))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_data_omits_empty_attributes() {
        let mut geometry = Geometry::new();
        geometry.positions = vec![[0.0, 1.0, 2.0]];
        geometry.indices = vec![0];

        let record = geometry.serialize_vertex_data();
        assert_eq!(record.get("positions").and_then(Value::as_array).map(<[Value]>::len), Some(3));
        assert!(record.get("normals").is_none());
        assert!(record.get("uvs").is_none());
    }

    #[test]
    fn pending_geometry_becomes_ready() {
        let geometry = Geometry::new().pending();
        assert!(!geometry.is_ready());
        geometry.set_ready(true);
        assert!(geometry.is_ready());
    }
}
