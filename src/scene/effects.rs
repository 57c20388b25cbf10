//! Particle systems, post-processes, sprites and reflection probes.
//!
//! These are opaque to the serializer beyond their `serialize` output; each
//! one references nodes and textures by handle and resolves them against the
//! scene when written.

use glam::{Vec2, Vec3, Vec4};
use uuid::Uuid;

use crate::assets::{AssetServer, TextureHandle};
use crate::scene::NodeHandle;
use crate::scene::scene::Scene;
use crate::serialize::Value;

fn texture_record(assets: &AssetServer, texture: Option<TextureHandle>) -> Option<Value> {
    assets.textures.get(texture?)?.serialize()
}

// ============================================================================
// Particle systems
// ============================================================================

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub uuid: Uuid,
    pub name: String,
    pub capacity: u32,
    /// Node the particles are emitted from.
    pub emitter: Option<NodeHandle>,
    pub emit_rate: f32,
    pub min_life_time: f32,
    pub max_life_time: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub color1: Vec4,
    pub color2: Vec4,
    pub gravity: Vec3,
    pub texture: Option<TextureHandle>,
    pub do_not_serialize: bool,
}

impl ParticleSystem {
    #[must_use]
    pub fn new(name: &str, capacity: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            capacity,
            emitter: None,
            emit_rate: 10.0,
            min_life_time: 1.0,
            max_life_time: 1.0,
            min_size: 1.0,
            max_size: 1.0,
            color1: Vec4::ONE,
            color2: Vec4::ONE,
            gravity: Vec3::ZERO,
            texture: None,
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn serialize(&self, scene: &Scene) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("capacity", self.capacity)
            .with("emitRate", self.emit_rate)
            .with("minLifeTime", self.min_life_time)
            .with("maxLifeTime", self.max_life_time)
            .with("minSize", self.min_size)
            .with("maxSize", self.max_size)
            .with("color1", self.color1)
            .with("color2", self.color2)
            .with("gravity", self.gravity);

        if let Some(emitter) = self.emitter.and_then(|h| scene.get_node(h)) {
            record.insert("emitterId", emitter.uuid);
        }
        if let Some(texture) = texture_record(&scene.assets, self.texture) {
            record.insert("texture", texture);
        }
        record
    }
}

// ============================================================================
// Post-processes
// ============================================================================

#[derive(Debug, Clone)]
pub struct PostProcess {
    pub uuid: Uuid,
    pub name: String,
    /// Effect identifier, e.g. `"BlurPostProcess"`.
    pub class_name: String,
    pub camera: Option<NodeHandle>,
    pub ratio: f32,
    pub parameters: Vec<(String, f32)>,
    pub do_not_serialize: bool,
}

impl PostProcess {
    #[must_use]
    pub fn new(name: &str, class_name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            class_name: class_name.to_string(),
            camera: None,
            ratio: 1.0,
            parameters: Vec::new(),
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn serialize(&self, scene: &Scene) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("customType", self.class_name.as_str())
            .with("options", self.ratio);

        if let Some(camera) = self.camera.and_then(|h| scene.get_node(h)) {
            record.insert("cameraId", camera.uuid);
        }
        for (name, value) in &self.parameters {
            record.insert(name, *value);
        }
        record
    }
}

// ============================================================================
// Sprites
// ============================================================================

#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub position: Vec3,
    pub size: Vec2,
    pub angle: f32,
    pub cell_index: u32,
    pub invert_u: bool,
    pub invert_v: bool,
}

impl Sprite {
    #[must_use]
    pub fn new(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            size: Vec2::ONE,
            angle: 0.0,
            cell_index: 0,
            invert_u: false,
            invert_v: false,
        }
    }

    fn serialize(&self) -> Value {
        Value::object()
            .with("name", self.name.as_str())
            .with("position", self.position)
            .with("width", self.size.x)
            .with("height", self.size.y)
            .with("angle", self.angle)
            .with("cellIndex", self.cell_index)
            .with("invertU", self.invert_u)
            .with("invertV", self.invert_v)
    }
}

#[derive(Debug, Clone)]
pub struct SpriteManager {
    pub uuid: Uuid,
    pub name: String,
    pub capacity: u32,
    pub cell_size: Vec2,
    pub texture: Option<TextureHandle>,
    pub sprites: Vec<Sprite>,
    pub do_not_serialize: bool,
}

impl SpriteManager {
    #[must_use]
    pub fn new(name: &str, capacity: u32, cell_size: Vec2) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            capacity,
            cell_size,
            texture: None,
            sprites: Vec::new(),
            do_not_serialize: false,
        }
    }

    /// The sprite sheet is embedded in the record.
    #[must_use]
    pub fn serialize(&self, assets: &AssetServer) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("capacity", self.capacity)
            .with("cellWidth", self.cell_size.x)
            .with("cellHeight", self.cell_size.y)
            .with(
                "sprites",
                Value::Array(self.sprites.iter().map(Sprite::serialize).collect()),
            );

        if let Some(texture) = texture_record(assets, self.texture) {
            record.insert("texture", texture);
        }
        record
    }
}

// ============================================================================
// Reflection probes
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReflectionProbe {
    pub uuid: Uuid,
    pub name: String,
    pub size: u32,
    pub position: Vec3,
    /// Nodes rendered into the probe.
    pub render_list: Vec<NodeHandle>,
    pub attached_node: Option<NodeHandle>,
    pub do_not_serialize: bool,
}

impl ReflectionProbe {
    #[must_use]
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            size,
            position: Vec3::ZERO,
            render_list: Vec::new(),
            attached_node: None,
            do_not_serialize: false,
        }
    }

    /// Render-list entries that no longer exist are left out.
    #[must_use]
    pub fn serialize(&self, scene: &Scene) -> Value {
        let render_list = self
            .render_list
            .iter()
            .filter_map(|&h| scene.get_node(h))
            .map(|node| Value::from(node.uuid))
            .collect::<Vec<_>>();

        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("size", self.size)
            .with("position", self.position)
            .with("renderList", render_list);

        if let Some(node) = self.attached_node.and_then(|h| scene.get_node(h)) {
            record.insert("attachedMeshId", node.uuid);
        }
        record
    }
}
