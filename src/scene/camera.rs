use crate::serialize::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl ProjectionType {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            ProjectionType::Perspective => "PerspectiveCamera",
            ProjectionType::Orthographic => "OrthographicCamera",
        }
    }
}

/// Camera component. Position and orientation come from the owning node.
#[derive(Debug, Clone)]
pub struct Camera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,
    pub inertia: f32,
    pub do_not_serialize: bool,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
            inertia: 0.9,
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn new_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Orthographic,
            ortho_size: size,
            ..Self::new_perspective(45.0, aspect, near, far)
        }
    }

    #[must_use]
    pub fn serialize(&self) -> Value {
        let record = Value::object()
            .with("type", self.projection_type.class_name())
            .with("minZ", self.near)
            .with("maxZ", self.far)
            .with("inertia", self.inertia);

        match self.projection_type {
            ProjectionType::Perspective => record.with("fov", self.fov),
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                record
                    .with("orthoLeft", -w)
                    .with("orthoRight", w)
                    .with("orthoBottom", -h)
                    .with("orthoTop", h)
            }
        }
    }
}
