use uuid::Uuid;

use crate::assets::{GeometryHandle, MaterialHandle};
use crate::scene::{MorphTargetKey, SkeletonKey};
use crate::serialize::Value;

/// Streaming state of a mesh's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelayLoadState {
    /// Never streamed.
    #[default]
    None,
    Loaded,
    Loading,
    NotLoaded,
}

impl DelayLoadState {
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            DelayLoadState::None => 0,
            DelayLoadState::Loaded => 1,
            DelayLoadState::Loading => 2,
            DelayLoadState::NotLoaded => 4,
        }
    }

    /// A mesh still waiting for streamed data cannot be exported.
    #[inline]
    #[must_use]
    pub fn is_serializable(self) -> bool {
        matches!(self, DelayLoadState::None | DelayLoadState::Loaded)
    }
}

/// Mesh component attached to a node.
#[derive(Debug, Clone)]
pub struct Mesh {
    // === Resource references ===
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialHandle>,
    pub skeleton: Option<SkeletonKey>,
    pub morph_target_manager: Option<MorphTargetKey>,

    pub delay_load_state: DelayLoadState,

    // === Instance settings ===
    pub visible: bool,
    pub pickable: bool,
    pub receive_shadows: bool,
    pub check_collisions: bool,
}

/// Document ids of everything a mesh record points at, resolved by the
/// caller (absent or opted-out references are `None`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRefs {
    pub geometry_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub skeleton_id: Option<Uuid>,
    pub morph_target_manager_id: Option<Uuid>,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            geometry: Some(geometry),
            material: Some(material),
            ..Self::empty()
        }
    }

    /// A mesh with no geometry or material yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            geometry: None,
            material: None,
            skeleton: None,
            morph_target_manager: None,
            delay_load_state: DelayLoadState::None,
            visible: true,
            pickable: true,
            receive_shadows: false,
            check_collisions: false,
        }
    }

    /// Mesh-specific fields; node fields are merged in by the dispatcher.
    #[must_use]
    pub fn serialize(&self, refs: &MeshRefs) -> Value {
        let mut record = Value::object()
            .with("delayLoadState", self.delay_load_state.code())
            .with("isVisible", self.visible)
            .with("pickable", self.pickable)
            .with("receiveShadows", self.receive_shadows)
            .with("checkCollisions", self.check_collisions);

        if let Some(id) = refs.material_id {
            record.insert("materialId", id);
        }
        if let Some(id) = refs.geometry_id {
            record.insert("geometryId", id);
        }
        if let Some(id) = refs.skeleton_id {
            record.insert("skeletonId", id);
        }
        if let Some(id) = refs.morph_target_manager_id {
            record.insert("morphTargetManagerId", id);
        }
        record
    }
}
