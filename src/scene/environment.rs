//! Scene-level settings: image-based lighting, fog and physics.

use glam::Vec3;

use crate::assets::TextureHandle;

/// IBL environment configuration.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Environment {
    /// Environment texture (cube map or equirectangular)
    pub texture: Option<TextureHandle>,
    /// Environment lighting intensity
    pub intensity: f32,
    /// Ambient light color
    pub ambient_color: Vec3,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            texture: None,
            intensity: 1.0,
            ambient_color: Vec3::ZERO,
        }
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    #[must_use]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogMode {
    #[default]
    None,
    Exp,
    Exp2,
    Linear,
}

impl FogMode {
    /// Numeric code written as `"fogMode"`.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            FogMode::None => 0,
            FogMode::Exp => 1,
            FogMode::Exp2 => 2,
            FogMode::Linear => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fog {
    pub mode: FogMode,
    pub color: Vec3,
    pub start: f32,
    pub end: f32,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            mode: FogMode::None,
            color: Vec3::splat(0.2),
            start: 0.0,
            end: 1000.0,
            density: 0.1,
        }
    }
}

impl Fog {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.mode != FogMode::None
    }
}

/// Configuration of the physics engine attached to a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsSettings {
    /// Name of the physics plugin driving the simulation.
    pub plugin_name: String,
    pub gravity: Vec3,
}

impl PhysicsSettings {
    #[must_use]
    pub fn new(plugin_name: &str, gravity: Vec3) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            gravity,
        }
    }
}
