use glam::Vec3;

use crate::serialize::Value;

#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub bias: f32,
    pub normal_bias: f32,
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.005,
            normal_bias: 0.02,
            map_size: 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub direction: Vec3,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub range: f32,
}

#[derive(Debug, Clone)]
pub struct SpotLight {
    pub direction: Vec3,
    pub range: f32,
    pub inner_cone: f32,
    pub outer_cone: f32,
}

// High-level abstraction: light component in the scene
#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightKind {
    /// Numeric light type written as `"type"`.
    #[must_use]
    pub fn type_code(&self) -> u32 {
        match self {
            LightKind::Point(_) => 0,
            LightKind::Directional(_) => 1,
            LightKind::Spot(_) => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: Option<ShadowConfig>,
    pub do_not_serialize: bool,
}

impl Light {
    fn with_kind(color: Vec3, intensity: f32, kind: LightKind) -> Self {
        Self {
            color,
            intensity,
            kind,
            cast_shadows: false,
            shadow: Some(ShadowConfig::default()),
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(
            color,
            intensity,
            LightKind::Directional(DirectionalLight {
                direction: Vec3::NEG_Z,
            }),
        )
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(color, intensity, LightKind::Point(PointLight { range }))
    }

    #[must_use]
    pub fn new_spot(
        color: Vec3,
        intensity: f32,
        range: f32,
        inner_cone: f32,
        outer_cone: f32,
    ) -> Self {
        Self::with_kind(
            color,
            intensity,
            LightKind::Spot(SpotLight {
                direction: Vec3::NEG_Z,
                range,
                inner_cone,
                outer_cone,
            }),
        )
    }

    #[must_use]
    pub fn serialize(&self) -> Value {
        let mut record = Value::object()
            .with("type", self.kind.type_code())
            .with("diffuse", self.color)
            .with("intensity", self.intensity);

        match &self.kind {
            LightKind::Directional(dir) => {
                record.insert("direction", dir.direction);
            }
            LightKind::Point(point) => {
                record.insert("range", point.range);
            }
            LightKind::Spot(spot) => {
                record.insert("direction", spot.direction);
                record.insert("range", spot.range);
                record.insert("innerAngle", spot.inner_cone);
                record.insert("angle", spot.outer_cone);
            }
        }

        record.insert("castShadows", self.cast_shadows);
        if self.cast_shadows
            && let Some(shadow) = &self.shadow
        {
            record.insert(
                "shadowGenerator",
                Value::object()
                    .with("bias", shadow.bias)
                    .with("normalBias", shadow.normal_bias)
                    .with("mapSize", shadow.map_size),
            );
        }
        record
    }
}
