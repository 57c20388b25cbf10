//! Scene graph module
//!
//! The engine-side model the serializer reads:
//! - Node: hierarchy entry with a kind fixed at insertion (mesh, transform node, camera, light)
//! - Transform: local position, rotation, scale
//! - Scene: node arena, component pools, assets and global settings
//! - Camera / Light / Skeleton: node components
//! - Environment, Fog, Physics: scene-level settings
//! - Animation, effects, actions, morph targets: optional scene sections
//! - SceneComponent: extension hook for engine-registered serializers

pub mod node;
pub mod transform;
pub mod scene;
pub mod camera;
pub mod light;
pub mod environment;
pub mod skeleton;
pub mod animation;
pub mod effects;
pub mod actions;
pub mod morph;
pub mod component;
pub mod resolve;

pub use node::{Node, NodeKind};
pub use transform::Transform;
pub use scene::Scene;
pub use camera::{Camera, ProjectionType};
pub use light::{Light, LightKind};
pub use environment::{Environment, Fog, FogMode, PhysicsSettings};
pub use skeleton::{Bone, Skeleton};
pub use component::SceneComponent;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct SkeletonKey;
    pub struct MorphTargetKey;
}
