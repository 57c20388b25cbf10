//! Shared resource definitions
//!
//! Data the serializer reads through asset handles:
//! - Geometry: vertex/index data, possibly shared by many meshes
//! - Material: standard, physical, or a per-submesh multi-material
//! - Texture: URL, cube files, or embedded (possibly still pending) pixels
//! - Mesh: node component tying geometry, material and skeleton together

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod texture;

pub use geometry::Geometry;
pub use material::{Material, MultiMaterial, PhysicalMaterial, Side, StandardMaterial};
pub use mesh::{DelayLoadState, Mesh};
pub use texture::{Texture, TextureSource};
