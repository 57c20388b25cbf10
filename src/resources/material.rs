//! Material variants as seen by the exporter.
//!
//! Single materials embed their texture records inline. A [`MultiMaterial`]
//! only lists its sub-material ids; the sub-materials themselves are emitted
//! into the `materials` section by the dispatcher.

use glam::Vec3;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::assets::{Asset, AssetServer, MaterialHandle, TextureHandle};
use crate::serialize::Value;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Side {
    Front,
    Back,
    #[default]
    Double,
}

/// State shared by all single-material variants.
#[derive(Debug, Clone)]
pub struct MaterialSettings {
    pub alpha: f32,
    pub side: Side,
    pub wireframe: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            side: Side::Double,
            wireframe: false,
        }
    }
}

impl MaterialSettings {
    fn write_into(&self, record: &mut Value) {
        record.insert("alpha", self.alpha);
        record.insert("backFaceCulling", self.side != Side::Double);
        record.insert("sideOrientation", matches!(self.side, Side::Back) as u32);
        record.insert("wireframe", self.wireframe);
    }
}

// ============================================================================
// Concrete materials
// ============================================================================

#[derive(Debug, Clone)]
pub struct StandardMaterial {
    pub uuid: Uuid,
    pub name: String,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub emissive_color: Vec3,
    pub specular_power: f32,
    pub diffuse_texture: Option<TextureHandle>,
    pub bump_texture: Option<TextureHandle>,
    pub settings: MaterialSettings,
    pub do_not_serialize: bool,
}

impl StandardMaterial {
    #[must_use]
    pub fn new(name: &str, diffuse_color: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            diffuse_color,
            specular_color: Vec3::ONE,
            emissive_color: Vec3::ZERO,
            specular_power: 64.0,
            diffuse_texture: None,
            bump_texture: None,
            settings: MaterialSettings::default(),
            do_not_serialize: false,
        }
    }

    fn serialize(&self, assets: &AssetServer) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("customType", "StandardMaterial")
            .with("diffuse", self.diffuse_color)
            .with("specular", self.specular_color)
            .with("emissive", self.emissive_color)
            .with("specularPower", self.specular_power);
        self.settings.write_into(&mut record);
        write_texture(&mut record, "diffuseTexture", assets, self.diffuse_texture);
        write_texture(&mut record, "bumpTexture", assets, self.bump_texture);
        record
    }
}

#[derive(Debug, Clone)]
pub struct PhysicalMaterial {
    pub uuid: Uuid,
    pub name: String,
    pub albedo_color: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub emissive_color: Vec3,
    pub albedo_texture: Option<TextureHandle>,
    pub metallic_roughness_texture: Option<TextureHandle>,
    pub normal_texture: Option<TextureHandle>,
    pub settings: MaterialSettings,
    pub do_not_serialize: bool,
}

impl PhysicalMaterial {
    #[must_use]
    pub fn new(name: &str, albedo_color: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            albedo_color,
            metallic: 1.0,
            roughness: 1.0,
            emissive_color: Vec3::ZERO,
            albedo_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            settings: MaterialSettings::default(),
            do_not_serialize: false,
        }
    }

    fn serialize(&self, assets: &AssetServer) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("customType", "PBRMaterial")
            .with("albedo", self.albedo_color)
            .with("metallic", self.metallic)
            .with("roughness", self.roughness)
            .with("emissive", self.emissive_color);
        self.settings.write_into(&mut record);
        write_texture(&mut record, "albedoTexture", assets, self.albedo_texture);
        write_texture(
            &mut record,
            "metallicTexture",
            assets,
            self.metallic_roughness_texture,
        );
        write_texture(&mut record, "bumpTexture", assets, self.normal_texture);
        record
    }
}

/// Per-submesh material list.
#[derive(Debug, Clone)]
pub struct MultiMaterial {
    pub uuid: Uuid,
    pub name: String,
    /// Ordered by submesh index; `None` leaves a hole.
    pub sub_materials: SmallVec<[Option<MaterialHandle>; 4]>,
    pub do_not_serialize: bool,
}

impl MultiMaterial {
    #[must_use]
    pub fn new(name: &str, sub_materials: impl IntoIterator<Item = MaterialHandle>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            sub_materials: sub_materials.into_iter().map(Some).collect(),
            do_not_serialize: false,
        }
    }

    /// Missing or opted-out sub-materials are written as `null` so indices
    /// stay aligned with submeshes.
    fn serialize(&self, assets: &AssetServer) -> Value {
        let ids = self
            .sub_materials
            .iter()
            .map(|slot| {
                slot.and_then(|h| assets.materials.get(h))
                    .filter(|m| !m.do_not_serialize())
                    .map(|m| Value::from(m.uuid()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("materials", ids)
    }
}

// ============================================================================
// Material enum
// ============================================================================

#[derive(Debug, Clone)]
pub enum Material {
    Standard(StandardMaterial),
    Physical(PhysicalMaterial),
    Multi(MultiMaterial),
}

impl Material {
    #[must_use]
    pub fn new_standard(name: &str, diffuse_color: Vec3) -> Self {
        Self::Standard(StandardMaterial::new(name, diffuse_color))
    }

    #[must_use]
    pub fn new_physical(name: &str, albedo_color: Vec3) -> Self {
        Self::Physical(PhysicalMaterial::new(name, albedo_color))
    }

    #[must_use]
    pub fn new_multi(name: &str, sub_materials: impl IntoIterator<Item = MaterialHandle>) -> Self {
        Self::Multi(MultiMaterial::new(name, sub_materials))
    }

    #[must_use]
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Standard(m) => m.uuid,
            Self::Physical(m) => m.uuid,
            Self::Multi(m) => m.uuid,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Standard(m) => &m.name,
            Self::Physical(m) => &m.name,
            Self::Multi(m) => &m.name,
        }
    }

    #[must_use]
    pub fn do_not_serialize(&self) -> bool {
        match self {
            Self::Standard(m) => m.do_not_serialize,
            Self::Physical(m) => m.do_not_serialize,
            Self::Multi(m) => m.do_not_serialize,
        }
    }

    pub fn set_do_not_serialize(&mut self, value: bool) {
        match self {
            Self::Standard(m) => m.do_not_serialize = value,
            Self::Physical(m) => m.do_not_serialize = value,
            Self::Multi(m) => m.do_not_serialize = value,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_multi(&self) -> Option<&MultiMaterial> {
        match self {
            Self::Multi(m) => Some(m),
            _ => None,
        }
    }

    /// The record for `materials` or `multiMaterials`, depending on variant.
    #[must_use]
    pub fn serialize(&self, assets: &AssetServer) -> Value {
        match self {
            Self::Standard(m) => m.serialize(assets),
            Self::Physical(m) => m.serialize(assets),
            Self::Multi(m) => m.serialize(assets),
        }
    }
}

impl From<StandardMaterial> for Material {
    fn from(m: StandardMaterial) -> Self {
        Self::Standard(m)
    }
}

impl From<PhysicalMaterial> for Material {
    fn from(m: PhysicalMaterial) -> Self {
        Self::Physical(m)
    }
}

impl From<MultiMaterial> for Material {
    fn from(m: MultiMaterial) -> Self {
        Self::Multi(m)
    }
}

impl Asset for Material {
    fn uuid(&self) -> Uuid {
        Material::uuid(self)
    }
}

fn write_texture(
    record: &mut Value,
    key: &str,
    assets: &AssetServer,
    texture: Option<TextureHandle>,
) {
    if let Some(texture) = texture.and_then(|h| assets.textures.get(h))
        && let Some(texture_record) = texture.serialize()
    {
        record.insert(key, texture_record);
    }
}
