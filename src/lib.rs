#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::module_inception)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod serialize;

pub use assets::{AssetServer, GeometryHandle, MaterialHandle, TextureHandle};
pub use errors::{AssetError, Error, Result};
pub use resources::{Geometry, Material, Mesh, Texture};
pub use scene::{Camera, Light, Node, NodeHandle, NodeKind, Scene};
pub use serialize::{
    Deferred, SceneSerializer, SectionOptions, SerializedDocument, Value,
};
