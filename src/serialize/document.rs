//! The serialized scene document and its section keys.

use std::io;

use serde::{Serialize, Serializer};

use super::value::Value;
use crate::errors::{Error, Result};

/// Top-level section and scalar keys of a scene document.
pub mod keys {
    pub const MESHES: &str = "meshes";
    pub const TRANSFORM_NODES: &str = "transformNodes";
    pub const CAMERAS: &str = "cameras";
    pub const LIGHTS: &str = "lights";
    pub const MATERIALS: &str = "materials";
    pub const MULTI_MATERIALS: &str = "multiMaterials";
    pub const GEOMETRIES: &str = "geometries";
    pub const VERTEX_DATA: &str = "vertexData";
    pub const SKELETONS: &str = "skeletons";
    pub const MORPH_TARGET_MANAGERS: &str = "morphTargetManagers";
    pub const ANIMATIONS: &str = "animations";
    pub const ANIMATION_GROUPS: &str = "animationGroups";
    pub const REFLECTION_PROBES: &str = "reflectionProbes";
    pub const PARTICLE_SYSTEMS: &str = "particleSystems";
    pub const POST_PROCESSES: &str = "postProcesses";
    pub const SPRITE_MANAGERS: &str = "spriteManagers";
    pub const ACTIONS: &str = "actions";
    pub const ENVIRONMENT_TEXTURE: &str = "environmentTexture";
    pub const ENVIRONMENT_TEXTURE_ROTATION_Y: &str = "environmentTextureRotationY";
    pub const ENVIRONMENT_INTENSITY: &str = "environmentIntensity";
    pub const METADATA: &str = "metadata";
    pub const ACTIVE_CAMERA_ID: &str = "activeCameraID";

    pub const AUTO_CLEAR: &str = "autoClear";
    pub const USE_DELAYED_TEXTURE_LOADING: &str = "useDelayedTextureLoading";
    pub const CLEAR_COLOR: &str = "clearColor";
    pub const AMBIENT_COLOR: &str = "ambientColor";
    pub const GRAVITY: &str = "gravity";
    pub const COLLISIONS_ENABLED: &str = "collisionsEnabled";
    pub const USE_RIGHT_HANDED_SYSTEM: &str = "useRightHandedSystem";

    pub const FOG_MODE: &str = "fogMode";
    pub const FOG_COLOR: &str = "fogColor";
    pub const FOG_START: &str = "fogStart";
    pub const FOG_END: &str = "fogEnd";
    pub const FOG_DENSITY: &str = "fogDensity";

    pub const PHYSICS_ENABLED: &str = "physicsEnabled";
    pub const PHYSICS_GRAVITY: &str = "physicsGravity";
    pub const PHYSICS_ENGINE: &str = "physicsEngine";
}

/// A scene document under construction or finished.
///
/// The root is always an object. Builders append records through
/// [`push`](Self::push) / [`push_vertex_data`](Self::push_vertex_data) and
/// deduplicate through [`contains_id`](Self::contains_id).
#[derive(Debug)]
pub struct SerializedDocument {
    root: Value,
}

impl Default for SerializedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializedDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Value::object(),
        }
    }

    /// A document whose listed sections start out as empty arrays.
    #[must_use]
    pub fn with_sections(sections: &[&str]) -> Self {
        let mut doc = Self::new();
        for section in sections {
            doc.ensure_section(section);
        }
        doc
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    // ========================================================================
    // Accumulator API
    // ========================================================================

    /// Makes sure `key` holds an array (possibly empty).
    pub fn ensure_section(&mut self, key: &str) {
        let _ = self.root.array_entry(key);
    }

    /// Sets a scalar (or any) value at the top level.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.root.insert(key, value);
    }

    /// Appends a record to the array section `key`, creating it when absent.
    pub fn push(&mut self, key: &str, record: Value) {
        if let Some(items) = self.root.array_entry(key) {
            items.push(record);
        }
    }

    /// Appends to `geometries.vertexData`.
    pub fn push_vertex_data(&mut self, record: Value) {
        if let Some(items) = self
            .root
            .object_entry(keys::GEOMETRIES)
            .and_then(|g| g.array_entry(keys::VERTEX_DATA))
        {
            items.push(record);
        }
    }

    /// Makes sure `geometries.vertexData` exists.
    pub fn ensure_vertex_data(&mut self) {
        let _ = self
            .root
            .object_entry(keys::GEOMETRIES)
            .and_then(|g| g.array_entry(keys::VERTEX_DATA));
    }

    /// Whether section `key` already holds a record whose `"id"` equals `id`.
    #[must_use]
    pub fn contains_id(&self, key: &str, id: &str) -> bool {
        self.records(key)
            .iter()
            .any(|record| record.get("id").and_then(Value::as_str) == Some(id))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Records of an array section; empty when the section is absent.
    #[must_use]
    pub fn records(&self, key: &str) -> &[Value] {
        self.root.get(key).and_then(Value::as_array).unwrap_or(&[])
    }

    #[must_use]
    pub fn vertex_data(&self) -> &[Value] {
        self.root
            .get(keys::GEOMETRIES)
            .and_then(|g| g.get(keys::VERTEX_DATA))
            .and_then(Value::as_array)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn len_of(&self, key: &str) -> usize {
        self.records(key).len()
    }

    /// First record of section `key` whose `"name"` equals `name`.
    #[must_use]
    pub fn find_by_name(&self, key: &str, name: &str) -> Option<&Value> {
        self.records(key)
            .iter()
            .find(|record| record.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Number of deferred slots still waiting to settle.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.root.deferred_count()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.pending_count() == 0
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn into_json(self) -> Result<serde_json::Value> {
        self.root.into_json()
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.check_resolved()?;
        Ok(serde_json::to_string(&self.root)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        self.check_resolved()?;
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Streams the document as JSON into `writer`. A failing writer is
    /// reported as [`Error::Io`].
    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<()> {
        self.check_resolved()?;
        serde_json::to_writer(writer, &self.root).map_err(|err| {
            if err.io_error_kind().is_some() {
                Error::Io(err.into())
            } else {
                Error::Json(err)
            }
        })
    }

    fn check_resolved(&self) -> Result<()> {
        match self.root.first_deferred_path() {
            Some(path) => Err(Error::UnresolvedDeferred { path }),
            None => Ok(()),
        }
    }
}

impl Serialize for SerializedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
