use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Vec3, Vec4};
use slotmap::SlotMap;

use crate::assets::AssetServer;
use crate::resources::material::{Material, StandardMaterial};
use crate::resources::mesh::Mesh;
use crate::scene::actions::ActionManager;
use crate::scene::animation::{Animation, AnimationGroup};
use crate::scene::camera::Camera;
use crate::scene::component::SceneComponent;
use crate::scene::effects::{ParticleSystem, PostProcess, ReflectionProbe, SpriteManager};
use crate::scene::environment::{Environment, Fog, PhysicsSettings};
use crate::scene::light::Light;
use crate::scene::morph::MorphTargetManager;
use crate::scene::node::{Node, NodeKind};
use crate::scene::resolve::{ResolveGeometry, ResolveMaterial};
use crate::scene::skeleton::Skeleton;
use crate::scene::{CameraKey, LightKey, MeshKey, MorphTargetKey, NodeHandle, SkeletonKey};
use crate::serialize::SceneSerializer;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph.
///
/// Pure data: a node arena, component pools keyed by slotmap keys, the shared
/// asset tables and the scene-wide settings. Serialization only reads it.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub skeletons: SlotMap<SkeletonKey, Skeleton>,
    pub morph_target_managers: SlotMap<MorphTargetKey, MorphTargetManager>,

    pub assets: AssetServer,
    /// Stands in for a mesh material that is missing or opted out.
    pub default_material: Arc<Material>,

    // ==== Global settings ====
    pub clear_color: Vec4,
    pub gravity: Vec3,
    pub auto_clear: bool,
    pub use_delayed_texture_loading: bool,
    pub collisions_enabled: bool,
    pub use_right_handed_system: bool,
    pub fog: Fog,
    pub physics: Option<PhysicsSettings>,
    pub environment: Environment,
    pub metadata: Option<serde_json::Value>,
    pub active_camera: Option<NodeHandle>,

    // ==== Optional sections ====
    pub animations: Vec<Animation>,
    pub animation_groups: Vec<AnimationGroup>,
    pub particle_systems: Vec<ParticleSystem>,
    pub post_processes: Vec<PostProcess>,
    pub sprite_managers: Vec<SpriteManager>,
    pub reflection_probes: Vec<ReflectionProbe>,
    pub action_manager: Option<ActionManager>,

    components: Vec<Box<dyn SceneComponent>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("meshes", &self.meshes.len())
            .field("components", &self.components.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),

            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),

            meshes: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            skeletons: SlotMap::with_key(),
            morph_target_managers: SlotMap::with_key(),

            assets: AssetServer::new(),
            default_material: Arc::new(Material::Standard(StandardMaterial::new(
                "default material",
                Vec3::ONE,
            ))),

            clear_color: Vec4::new(0.2, 0.2, 0.3, 1.0),
            gravity: Vec3::new(0.0, -9.807, 0.0),
            auto_clear: true,
            use_delayed_texture_loading: false,
            collisions_enabled: true,
            use_right_handed_system: false,
            fog: Fog::default(),
            physics: None,
            environment: Environment::new(),
            metadata: None,
            active_camera: None,

            animations: Vec::new(),
            animation_groups: Vec::new(),
            particle_systems: Vec::new(),
            post_processes: Vec::new(),
            sprite_managers: Vec::new(),
            reflection_probes: Vec::new(),
            action_manager: None,

            components: Vec::new(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            if let Some(c) = self.nodes.get_mut(handle) {
                c.parent = Some(parent);
            }
        } else {
            log::warn!("Parent node not found, adding child at the root");
            self.root_nodes.push(handle);
        }

        handle
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::warn!("attach: stale node handle");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("attach: would create a cycle");
            return;
        }

        // 1. Detach from old
        self.detach_from_parent(child);

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Whether `ancestor` is on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    fn detach_from_parent(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }
    }

    /// Removes a node, its subtree and their components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_node(child);
        }

        self.detach_from_parent(handle);

        if let Some(node) = self.nodes.remove(handle) {
            match node.kind {
                NodeKind::Mesh(key) => {
                    self.meshes.remove(key);
                }
                NodeKind::Camera(key) => {
                    self.cameras.remove(key);
                }
                NodeKind::Light(key) => {
                    self.lights.remove(key);
                }
                NodeKind::TransformNode | NodeKind::Other(_) => {}
            }
        }
        if self.active_camera == Some(handle) {
            self.active_camera = None;
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// All descendants of `handle` in pre-order, excluding `handle` itself.
    /// Child handles whose node is gone from `nodes` are skipped.
    #[must_use]
    pub fn descendants(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let Some(node) = self.nodes.get(handle) else {
            return out;
        };
        let mut stack: Vec<NodeHandle> = node.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(n) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    /// Every node reachable from the roots, parents before children.
    #[must_use]
    pub fn nodes_in_order(&self) -> Vec<NodeHandle> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.root_nodes {
            if self.nodes.contains_key(root) {
                out.push(root);
                out.extend(self.descendants(root));
            }
        }
        out
    }

    // ========================================================================
    // Component API
    // ========================================================================

    pub fn add_transform_node(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    pub fn add_transform_node_to_parent(&mut self, name: &str, parent: NodeHandle) -> NodeHandle {
        self.add_to_parent(Node::new(name), parent)
    }

    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) -> NodeHandle {
        let key = self.meshes.insert(mesh);
        self.add_node(Node::with_kind(name, NodeKind::Mesh(key)))
    }

    pub fn add_mesh_to_parent(&mut self, name: &str, mesh: Mesh, parent: NodeHandle) -> NodeHandle {
        let key = self.meshes.insert(mesh);
        self.add_to_parent(Node::with_kind(name, NodeKind::Mesh(key)), parent)
    }

    /// Registers `geometry` and `material` when given by value and adds a
    /// mesh node using them.
    pub fn spawn(
        &mut self,
        name: &str,
        geometry: impl ResolveGeometry,
        material: impl ResolveMaterial,
    ) -> NodeHandle {
        let geometry = geometry.resolve(&self.assets);
        let material = material.resolve(&self.assets);
        self.add_mesh(name, Mesh::new(geometry, material))
    }

    pub fn add_camera(&mut self, name: &str, camera: Camera) -> NodeHandle {
        let key = self.cameras.insert(camera);
        self.add_node(Node::with_kind(name, NodeKind::Camera(key)))
    }

    pub fn add_camera_to_parent(&mut self, name: &str, camera: Camera, parent: NodeHandle) -> NodeHandle {
        let key = self.cameras.insert(camera);
        self.add_to_parent(Node::with_kind(name, NodeKind::Camera(key)), parent)
    }

    pub fn add_light(&mut self, name: &str, light: Light) -> NodeHandle {
        let key = self.lights.insert(light);
        self.add_node(Node::with_kind(name, NodeKind::Light(key)))
    }

    pub fn add_light_to_parent(&mut self, name: &str, light: Light, parent: NodeHandle) -> NodeHandle {
        let key = self.lights.insert(light);
        self.add_to_parent(Node::with_kind(name, NodeKind::Light(key)), parent)
    }

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonKey {
        self.skeletons.insert(skeleton)
    }

    pub fn add_morph_target_manager(&mut self, manager: MorphTargetManager) -> MorphTargetKey {
        self.morph_target_managers.insert(manager)
    }

    pub fn register_component(&mut self, component: impl SceneComponent + 'static) {
        self.components.push(Box::new(component));
    }

    #[must_use]
    pub fn components(&self) -> &[Box<dyn SceneComponent>] {
        &self.components
    }

    // ========================================================================
    // Component queries
    // ========================================================================

    #[must_use]
    pub fn mesh_of(&self, handle: NodeHandle) -> Option<&Mesh> {
        match self.nodes.get(handle)?.kind {
            NodeKind::Mesh(key) => self.meshes.get(key),
            _ => None,
        }
    }

    pub fn mesh_of_mut(&mut self, handle: NodeHandle) -> Option<&mut Mesh> {
        match self.nodes.get(handle)?.kind {
            NodeKind::Mesh(key) => self.meshes.get_mut(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn camera_of(&self, handle: NodeHandle) -> Option<&Camera> {
        match self.nodes.get(handle)?.kind {
            NodeKind::Camera(key) => self.cameras.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn light_of(&self, handle: NodeHandle) -> Option<&Light> {
        match self.nodes.get(handle)?.kind {
            NodeKind::Light(key) => self.lights.get(key),
            _ => None,
        }
    }

    pub fn set_active_camera(&mut self, camera: NodeHandle) {
        if self.camera_of(camera).is_some() {
            self.active_camera = Some(camera);
        } else {
            log::warn!("set_active_camera: node is not a camera");
        }
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Entry point for producing documents from this scene.
    #[must_use]
    pub fn serializer(&self) -> SceneSerializer<'_> {
        SceneSerializer::new(self)
    }
}
