//! Per-node serialization.
//!
//! [`NodeDispatcher`] turns one scene node into its document record and
//! performs the side work a mesh drags along: material (with multi-material
//! fan-out), geometry and skeleton emission. Every guard degrades to a
//! skip; nothing here returns an error.

use std::sync::Arc;

use uuid::Uuid;

use super::cache::EntityCache;
use super::document::{SerializedDocument, keys};
use super::options::SectionOptions;
use crate::assets::{GeometryHandle, MaterialHandle};
use crate::resources::material::Material;
use crate::resources::mesh::{Mesh, MeshRefs};
use crate::scene::node::{Node, NodeKind};
use crate::scene::scene::Scene;
use crate::scene::{NodeHandle, SkeletonKey};

/// Which shared resources a mesh pulls into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    pub materials: bool,
    pub geometries: bool,
    pub skeletons: bool,
}

impl FanOut {
    /// Everything a mesh references.
    #[must_use]
    pub fn all() -> Self {
        Self {
            materials: true,
            geometries: true,
            skeletons: true,
        }
    }

    /// Fan-out restricted to the sections enabled in `options`.
    #[must_use]
    pub fn from_options(options: &SectionOptions) -> Self {
        Self {
            materials: options.materials,
            geometries: options.geometries,
            skeletons: options.skeletons,
        }
    }
}

impl Default for FanOut {
    fn default() -> Self {
        Self::all()
    }
}

/// Serializes nodes into a document, sharing one [`EntityCache`].
pub struct NodeDispatcher<'a> {
    scene: &'a Scene,
    cache: &'a mut EntityCache,
    fan_out: FanOut,
}

impl<'a> NodeDispatcher<'a> {
    pub fn new(scene: &'a Scene, cache: &'a mut EntityCache, fan_out: FanOut) -> Self {
        Self {
            scene,
            cache,
            fan_out,
        }
    }

    /// Appends the record(s) for `handle` to `doc`.
    ///
    /// Stale handles are reported and skipped; opted-out nodes and kinds
    /// without a record format are skipped silently.
    pub fn serialize_node(&mut self, handle: NodeHandle, doc: &mut SerializedDocument) {
        let scene = self.scene;
        let Some(node) = scene.get_node(handle) else {
            log::warn!("serialize_node: stale node handle {handle:?}");
            return;
        };
        if node.do_not_serialize {
            log::trace!("Skipping opted-out node '{}'", node.name);
            return;
        }

        let parent_id = node
            .parent()
            .and_then(|p| scene.get_node(p))
            .map(|p| p.uuid);

        match &node.kind {
            NodeKind::Mesh(key) => {
                let Some(mesh) = scene.meshes.get(*key) else {
                    log::warn!("Mesh node '{}' has no mesh component", node.name);
                    return;
                };
                self.serialize_mesh(node, mesh, parent_id, doc);
            }
            NodeKind::TransformNode => {
                doc.push(keys::TRANSFORM_NODES, node.serialize(parent_id));
            }
            NodeKind::Camera(key) => match scene.cameras.get(*key) {
                Some(camera) if !camera.do_not_serialize => {
                    let record = node.serialize(parent_id).merged(camera.serialize());
                    doc.push(keys::CAMERAS, record);
                }
                Some(_) => log::trace!("Skipping opted-out camera '{}'", node.name),
                None => log::warn!("Camera node '{}' has no camera component", node.name),
            },
            NodeKind::Light(key) => match scene.lights.get(*key) {
                Some(light) if !light.do_not_serialize => {
                    let record = node.serialize(parent_id).merged(light.serialize());
                    doc.push(keys::LIGHTS, record);
                }
                Some(_) => log::trace!("Skipping opted-out light '{}'", node.name),
                None => log::warn!("Light node '{}' has no light component", node.name),
            },
            NodeKind::Other(kind) => {
                log::trace!("No record format for '{}' ({kind})", node.name);
            }
        }
    }

    fn serialize_mesh(
        &mut self,
        node: &Node,
        mesh: &Mesh,
        parent_id: Option<Uuid>,
        doc: &mut SerializedDocument,
    ) {
        if !mesh.delay_load_state.is_serializable() {
            log::trace!(
                "Skipping mesh '{}' still streaming ({:?})",
                node.name,
                mesh.delay_load_state
            );
            return;
        }

        let material = self.resolve_material(mesh.material);
        let material_id = material.uuid();
        if self.fan_out.materials {
            self.serialize_material(&material, doc);
        }

        let geometry_id = mesh
            .geometry
            .and_then(|handle| self.serialize_geometry(handle, doc));

        let skeleton_id = mesh
            .skeleton
            .and_then(|key| self.serialize_skeleton(key, doc));

        let morph_target_manager_id = mesh
            .morph_target_manager
            .and_then(|key| self.scene.morph_target_managers.get(key))
            .filter(|m| !m.do_not_serialize)
            .map(|m| m.uuid);

        let refs = MeshRefs {
            geometry_id,
            material_id: Some(material_id),
            skeleton_id,
            morph_target_manager_id,
        };
        let record = node.serialize(parent_id).merged(mesh.serialize(&refs));
        doc.push(keys::MESHES, record);
    }

    /// The material a mesh renders with: its own, or the scene default when
    /// it has none, the handle is stale, or the material opted out.
    pub fn resolve_material(&self, handle: Option<MaterialHandle>) -> Arc<Material> {
        handle
            .and_then(|h| self.scene.assets.materials.get(h))
            .filter(|m| !m.do_not_serialize())
            .unwrap_or_else(|| Arc::clone(&self.scene.default_material))
    }

    /// Writes `material` once. A multi-material goes to `multiMaterials` and
    /// each live sub-material to `materials`, all deduplicated by id.
    pub fn serialize_material(&self, material: &Material, doc: &mut SerializedDocument) {
        if material.do_not_serialize() {
            return;
        }
        let id = material.uuid().to_string();

        let Some(multi) = material.as_multi() else {
            if !doc.contains_id(keys::MATERIALS, &id) {
                doc.push(keys::MATERIALS, material.serialize(&self.scene.assets));
            }
            return;
        };

        if doc.contains_id(keys::MULTI_MATERIALS, &id) {
            return;
        }
        doc.push(keys::MULTI_MATERIALS, material.serialize(&self.scene.assets));

        for sub in multi.sub_materials.iter().flatten() {
            let Some(sub) = self.scene.assets.materials.get(*sub) else {
                continue;
            };
            // Nested multi-materials are not a supported layout.
            if sub.do_not_serialize() || sub.as_multi().is_some() {
                continue;
            }
            let sub_id = sub.uuid().to_string();
            if !doc.contains_id(keys::MATERIALS, &sub_id) {
                doc.push(keys::MATERIALS, sub.serialize(&self.scene.assets));
            }
        }
    }

    /// Writes the vertex data of `handle` unless it opted out or was already
    /// written during this call. Returns the id a mesh should reference.
    pub fn serialize_geometry(
        &mut self,
        handle: GeometryHandle,
        doc: &mut SerializedDocument,
    ) -> Option<Uuid> {
        let geometry = self.scene.assets.geometries.get(handle)?;
        if geometry.do_not_serialize {
            return None;
        }
        if self.fan_out.geometries && !self.cache.has_emitted(handle) {
            doc.push_vertex_data(geometry.serialize_vertex_data());
            self.cache.mark_emitted(handle);
        }
        Some(geometry.uuid)
    }

    /// Writes a skeleton once per document. Returns its id unless it opted out.
    pub fn serialize_skeleton(&self, key: SkeletonKey, doc: &mut SerializedDocument) -> Option<Uuid> {
        let skeleton = self.scene.skeletons.get(key)?;
        if skeleton.do_not_serialize {
            return None;
        }
        if self.fan_out.skeletons && !doc.contains_id(keys::SKELETONS, &skeleton.id.to_string()) {
            doc.push(keys::SKELETONS, skeleton.serialize());
        }
        Some(skeleton.id)
    }
}
