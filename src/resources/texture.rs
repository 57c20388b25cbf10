use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use glam::Vec2;
use uuid::Uuid;

use crate::assets::Asset;
use crate::errors::{AssetError, Error};
use crate::serialize::{Deferred, Value};

/// Pixel read-back that may still be in flight. Cloneable so several
/// exports can wait on the same read.
pub type PendingPixels = Shared<BoxFuture<'static, Result<Arc<Vec<u8>>, AssetError>>>;

const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

#[derive(Debug, Clone, Copy)]
pub struct TextureTransform {
    pub offset: Vec2,
    pub repeat: Vec2,
    pub rotation: f32,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            repeat: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

#[derive(Clone)]
pub enum PixelData {
    Ready(Arc<Vec<u8>>),
    Pending(PendingPixels),
}

impl std::fmt::Debug for PixelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelData::Ready(bytes) => f.debug_tuple("Ready").field(&bytes.len()).finish(),
            PixelData::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Where a texture's contents come from.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// Loaded from a single file or URL; serialized by reference.
    Url(String),
    /// A cube map assembled from six face files.
    CubeFiles(Vec<String>),
    /// Raw pixels owned by the engine, embedded as base64.
    Embedded(PixelData),
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,

    pub level: f32,
    pub has_alpha: bool,
    pub gamma_space: bool,
    pub coordinates_index: u32,
    /// Rotation applied when used as an environment map.
    pub rotation_y: f32,
    pub transform: TextureTransform,

    pub source: TextureSource,
    pub do_not_serialize: bool,
}

impl Texture {
    fn new(name: &str, width: u32, height: u32, source: TextureSource) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            level: 1.0,
            has_alpha: false,
            gamma_space: true,
            coordinates_index: 0,
            rotation_y: 0.0,
            transform: TextureTransform::default(),
            source,
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Self::new(url, 0, 0, TextureSource::Url(url.to_string()))
    }

    #[must_use]
    pub fn from_cube_files(name: &str, files: Vec<String>) -> Self {
        Self::new(name, 0, 0, TextureSource::CubeFiles(files))
    }

    #[must_use]
    pub fn from_pixels(name: &str, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new(
            name,
            width,
            height,
            TextureSource::Embedded(PixelData::Ready(Arc::new(pixels))),
        )
    }

    /// A texture whose pixels are produced by `read_back` (typically a GPU
    /// read). The future is shared, so it runs at most once.
    pub fn from_pending<F>(name: &str, width: u32, height: u32, read_back: F) -> Self
    where
        F: Future<Output = Result<Vec<u8>, AssetError>> + Send + 'static,
    {
        let pending = read_back.map(|r| r.map(Arc::new)).boxed().shared();
        Self::new(
            name,
            width,
            height,
            TextureSource::Embedded(PixelData::Pending(pending)),
        )
    }

    /// 1x1 texture of a single RGBA colour.
    #[must_use]
    pub fn create_solid_color(name: &str, color: [u8; 4]) -> Self {
        Self::from_pixels(name, 1, 1, color.to_vec())
    }

    #[must_use]
    pub fn create_checkerboard(name: &str, width: u32, height: u32, check_size: u32) -> Self {
        let check_size = check_size.max(1);
        let mut data = Vec::with_capacity((width * height * 4) as usize);

        for y in 0..height {
            for x in 0..width {
                let is_a = (x / check_size + y / check_size) % 2 == 0;
                data.extend_from_slice(if is_a {
                    &[255, 255, 255, 255]
                } else {
                    &[0, 0, 0, 255]
                });
            }
        }

        Self::from_pixels(name, width, height, data)
    }

    #[must_use]
    pub fn is_cube_from_files(&self) -> bool {
        matches!(self.source, TextureSource::CubeFiles(_))
    }

    /// The texture record, or `None` when the texture opted out.
    ///
    /// Embedded pixels whose read-back has not finished become a
    /// [`Deferred`] `base64String`.
    #[must_use]
    pub fn serialize(&self) -> Option<Value> {
        if self.do_not_serialize {
            return None;
        }

        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("level", self.level)
            .with("hasAlpha", self.has_alpha)
            .with("gammaSpace", self.gamma_space)
            .with("coordinatesIndex", self.coordinates_index)
            .with("uOffset", self.transform.offset.x)
            .with("vOffset", self.transform.offset.y)
            .with("uScale", self.transform.repeat.x)
            .with("vScale", self.transform.repeat.y)
            .with("wAng", self.transform.rotation);

        match &self.source {
            TextureSource::Url(url) => {
                record.insert("url", url.as_str());
            }
            TextureSource::CubeFiles(files) => {
                record.insert("isCube", true);
                record.insert("files", files.as_slice());
                record.insert("rotationY", self.rotation_y);
            }
            TextureSource::Embedded(PixelData::Ready(bytes)) => {
                record.insert("width", self.width);
                record.insert("height", self.height);
                record.insert("base64String", encode_data_uri(bytes));
            }
            TextureSource::Embedded(PixelData::Pending(pending)) => {
                record.insert("width", self.width);
                record.insert("height", self.height);
                let pending = pending.clone();
                let name = self.name.clone();
                record.insert(
                    "base64String",
                    Deferred::new(format!("texture '{name}'"), async move {
                        let bytes = pending.await.map_err(Error::from)?;
                        Ok(serde_json::Value::String(encode_data_uri(&bytes)))
                    }),
                );
            }
        }
        Some(record)
    }
}

impl Asset for Texture {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

fn encode_data_uri(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(DATA_URI_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    out.push_str(DATA_URI_PREFIX);
    BASE64.encode_string(bytes, &mut out);
    out
}
