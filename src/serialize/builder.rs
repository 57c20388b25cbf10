//! Full-scene export.

use super::cache::EntityCache;
use super::dispatch::{FanOut, NodeDispatcher};
use super::document::{SerializedDocument, keys};
use super::options::SectionOptions;
use crate::scene::NodeHandle;
use crate::scene::animation::Animation;
use crate::scene::node::NodeKind;
use crate::scene::scene::Scene;
use crate::serialize::Value;

const SCENE_ACTION_MANAGER: &str = "SceneActionManager";

/// Walks a whole scene and writes one section per enabled option.
///
/// Mesh, material and geometry work goes through the same
/// [`NodeDispatcher`] as a selection export, so sharing and opt-out rules
/// are identical on both paths. Enabled array sections are always present
/// (possibly empty); scalar sections with no backing scene state are left
/// out. Registered [`SceneComponent`](crate::scene::SceneComponent)s run
/// last.
pub struct SceneDocumentBuilder<'a> {
    scene: &'a Scene,
    options: SectionOptions,
}

impl<'a> SceneDocumentBuilder<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene, options: SectionOptions) -> Self {
        Self { scene, options }
    }

    /// Builds the document. `cache` must be fresh for this call.
    #[must_use]
    pub fn build(&self, cache: &mut EntityCache) -> SerializedDocument {
        let scene = self.scene;
        let options = &self.options;
        let order = scene.nodes_in_order();
        let mut doc = SerializedDocument::new();
        let mut dispatcher = NodeDispatcher::new(scene, cache, FanOut::from_options(options));

        self.write_scalars(&mut doc);

        if options.fog && scene.fog.is_enabled() {
            let fog = &scene.fog;
            doc.set(keys::FOG_MODE, fog.mode.code());
            doc.set(keys::FOG_COLOR, fog.color);
            doc.set(keys::FOG_START, fog.start);
            doc.set(keys::FOG_END, fog.end);
            doc.set(keys::FOG_DENSITY, fog.density);
        }

        if options.physics
            && let Some(physics) = &scene.physics
        {
            doc.set(keys::PHYSICS_ENABLED, true);
            doc.set(keys::PHYSICS_GRAVITY, physics.gravity);
            doc.set(keys::PHYSICS_ENGINE, physics.plugin_name.as_str());
        }

        if let Some(metadata) = &scene.metadata {
            doc.set(keys::METADATA, metadata.clone());
        }

        if options.morph_target_managers {
            self.write_morph_target_managers(&order, &mut doc);
        }

        if options.lights {
            doc.ensure_section(keys::LIGHTS);
            for &handle in &order {
                if scene.get_node(handle).is_some_and(|n| matches!(n.kind, NodeKind::Light(_))) {
                    dispatcher.serialize_node(handle, &mut doc);
                }
            }
        }

        if options.cameras {
            doc.ensure_section(keys::CAMERAS);
            for &handle in &order {
                if scene.get_node(handle).is_some_and(|n| matches!(n.kind, NodeKind::Camera(_))) {
                    dispatcher.serialize_node(handle, &mut doc);
                }
            }
            if let Some(active) = scene.active_camera
                && let Some(node) = scene.get_node(active)
                && !node.do_not_serialize
                && scene.camera_of(active).is_some_and(|c| !c.do_not_serialize)
            {
                doc.set(keys::ACTIVE_CAMERA_ID, node.uuid);
            }
        }

        if options.animations {
            doc.set(
                keys::ANIMATIONS,
                Value::Array(scene.animations.iter().map(Animation::serialize).collect()),
            );
            doc.ensure_section(keys::ANIMATION_GROUPS);
            for group in scene.animation_groups.iter().filter(|g| !g.do_not_serialize) {
                doc.push(keys::ANIMATION_GROUPS, group.serialize(scene));
            }
        }

        if options.reflection_probes {
            doc.ensure_section(keys::REFLECTION_PROBES);
            for probe in scene.reflection_probes.iter().filter(|p| !p.do_not_serialize) {
                doc.push(keys::REFLECTION_PROBES, probe.serialize(scene));
            }
        }

        if options.materials {
            doc.ensure_section(keys::MATERIALS);
            doc.ensure_section(keys::MULTI_MATERIALS);
            for (_, material) in scene.assets.materials.snapshot() {
                dispatcher.serialize_material(&material, &mut doc);
            }
        }

        if options.environment_texture {
            self.write_environment(&mut doc);
        }

        if options.skeletons {
            doc.ensure_section(keys::SKELETONS);
            for key in scene.skeletons.keys() {
                let _ = dispatcher.serialize_skeleton(key, &mut doc);
            }
        }

        if options.transform_nodes {
            doc.ensure_section(keys::TRANSFORM_NODES);
            for &handle in &order {
                if scene.get_node(handle).is_some_and(|n| n.kind == NodeKind::TransformNode) {
                    dispatcher.serialize_node(handle, &mut doc);
                }
            }
        }

        if options.geometries {
            doc.ensure_vertex_data();
            for (handle, geometry) in scene.assets.geometries.snapshot() {
                if geometry.is_ready() {
                    let _ = dispatcher.serialize_geometry(handle, &mut doc);
                } else {
                    log::trace!("Skipping geometry {} (not ready)", geometry.uuid);
                }
            }
        }

        if options.meshes {
            doc.ensure_section(keys::MESHES);
            for &handle in &order {
                if scene.get_node(handle).is_some_and(|n| matches!(n.kind, NodeKind::Mesh(_))) {
                    dispatcher.serialize_node(handle, &mut doc);
                }
            }
        }

        if options.particle_systems {
            doc.ensure_section(keys::PARTICLE_SYSTEMS);
            for system in scene.particle_systems.iter().filter(|p| !p.do_not_serialize) {
                doc.push(keys::PARTICLE_SYSTEMS, system.serialize(scene));
            }
        }

        if options.post_processes {
            doc.ensure_section(keys::POST_PROCESSES);
            for post in scene.post_processes.iter().filter(|p| !p.do_not_serialize) {
                doc.push(keys::POST_PROCESSES, post.serialize(scene));
            }
        }

        if options.actions
            && let Some(manager) = scene.action_manager.as_ref().filter(|m| !m.is_empty())
        {
            doc.set(keys::ACTIONS, manager.serialize(SCENE_ACTION_MANAGER, scene));
        }

        if options.sprites {
            doc.ensure_section(keys::SPRITE_MANAGERS);
            for manager in scene.sprite_managers.iter().filter(|s| !s.do_not_serialize) {
                doc.push(keys::SPRITE_MANAGERS, manager.serialize(&scene.assets));
            }
        }

        if options.components {
            for component in scene.components() {
                if let Err(err) = component.serialize(scene, &mut doc) {
                    log::warn!("Scene component '{}' failed to serialize: {err}", component.name());
                }
            }
        }

        log::debug!(
            "Serialized scene {}: {} meshes, {} materials, {} geometries, {} pending value(s)",
            scene.id,
            doc.len_of(keys::MESHES),
            doc.len_of(keys::MATERIALS),
            doc.vertex_data().len(),
            doc.pending_count()
        );
        doc
    }

    fn write_scalars(&self, doc: &mut SerializedDocument) {
        let scene = self.scene;
        doc.set(keys::AUTO_CLEAR, scene.auto_clear);
        doc.set(keys::CLEAR_COLOR, scene.clear_color);
        doc.set(keys::AMBIENT_COLOR, scene.environment.ambient_color);
        doc.set(keys::GRAVITY, scene.gravity);
        doc.set(keys::COLLISIONS_ENABLED, scene.collisions_enabled);
        doc.set(keys::USE_RIGHT_HANDED_SYSTEM, scene.use_right_handed_system);
        doc.set(keys::USE_DELAYED_TEXTURE_LOADING, scene.use_delayed_texture_loading);
    }

    // Managers are reached through the meshes that would be exported.
    fn write_morph_target_managers(&self, order: &[NodeHandle], doc: &mut SerializedDocument) {
        let scene = self.scene;
        doc.ensure_section(keys::MORPH_TARGET_MANAGERS);
        for &handle in order {
            if scene.get_node(handle).is_none_or(|n| n.do_not_serialize) {
                continue;
            }
            let Some(manager) = scene
                .mesh_of(handle)
                .filter(|mesh| mesh.delay_load_state.is_serializable())
                .and_then(|mesh| mesh.morph_target_manager)
                .and_then(|key| scene.morph_target_managers.get(key))
            else {
                continue;
            };
            if !manager.do_not_serialize
                && !doc.contains_id(keys::MORPH_TARGET_MANAGERS, &manager.uuid.to_string())
            {
                doc.push(keys::MORPH_TARGET_MANAGERS, manager.serialize());
            }
        }
    }

    fn write_environment(&self, doc: &mut SerializedDocument) {
        let scene = self.scene;
        let Some(texture) = scene
            .environment
            .texture
            .and_then(|h| scene.assets.textures.get(h))
            .filter(|t| !t.do_not_serialize)
        else {
            return;
        };

        if texture.is_cube_from_files()
            && let Some(record) = texture.serialize()
        {
            doc.set(keys::ENVIRONMENT_TEXTURE, record);
        } else {
            doc.set(keys::ENVIRONMENT_TEXTURE, texture.name.as_str());
            doc.set(keys::ENVIRONMENT_TEXTURE_ROTATION_Y, texture.rotation_y);
        }
        doc.set(keys::ENVIRONMENT_INTENSITY, scene.environment.intensity);
    }
}
