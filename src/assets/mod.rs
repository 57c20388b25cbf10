pub mod server;
pub mod storage;

pub use server::{AssetServer, GeometryHandle, MaterialHandle, TextureHandle};
pub use storage::{Asset, AssetStorage};
