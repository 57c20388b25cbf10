use slotmap::new_key_type;
use std::sync::Arc;

use crate::assets::storage::AssetStorage;
use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::resources::texture::Texture;

// Strongly-typed handles
new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
    pub struct TextureHandle;
}

/// Shared resources referenced by scene entities.
#[derive(Clone)] // AssetServer is lightweight and can be cloned freely
pub struct AssetServer {
    pub geometries: Arc<AssetStorage<GeometryHandle, Geometry>>,
    pub materials: Arc<AssetStorage<MaterialHandle, Material>>,
    pub textures: Arc<AssetStorage<TextureHandle, Texture>>,
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            geometries: Arc::new(AssetStorage::new()),
            materials: Arc::new(AssetStorage::new()),
            textures: Arc::new(AssetStorage::new()),
        }
    }

    pub fn add_geometry(&self, geometry: Geometry) -> GeometryHandle {
        self.geometries.add(geometry)
    }

    pub fn add_material(&self, material: impl Into<Material>) -> MaterialHandle {
        self.materials.add(material)
    }

    pub fn add_texture(&self, texture: Texture) -> TextureHandle {
        self.textures.add(texture)
    }
}
