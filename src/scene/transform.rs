use glam::{EulerRot, Quat, Vec3};

use crate::serialize::Value;

/// Transform component
///
/// Local position, rotation and scale of a node. World matrices belong to the
/// renderer; the serializer only ever writes local TRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Sets rotation from XYZ Euler angles (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Writes `position`, `rotationQuaternion` and `scaling` into `record`.
    pub fn write_into(&self, record: &mut Value) {
        record.insert("position", self.position);
        record.insert("rotationQuaternion", self.rotation);
        record.insert("scaling", self.scale);
    }
}
