use uuid::Uuid;

use crate::serialize::Value;

/// One blend shape, stored as per-vertex deltas.
#[derive(Debug, Clone)]
pub struct MorphTarget {
    pub name: String,
    pub influence: f32,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

impl MorphTarget {
    #[must_use]
    pub fn new(name: &str, positions: Vec<[f32; 3]>) -> Self {
        Self {
            name: name.to_string(),
            influence: 0.0,
            positions,
            normals: Vec::new(),
        }
    }

    fn serialize(&self) -> Value {
        let flat = |data: &[[f32; 3]]| {
            Value::Array(
                data.iter()
                    .flat_map(|v| v.iter().copied().map(Value::from))
                    .collect(),
            )
        };

        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("influence", self.influence)
            .with("positions", flat(&self.positions));
        if !self.normals.is_empty() {
            record.insert("normals", flat(&self.normals));
        }
        record
    }
}

/// Set of morph targets driven together; may be shared by several meshes.
#[derive(Debug, Clone)]
pub struct MorphTargetManager {
    pub uuid: Uuid,
    pub targets: Vec<MorphTarget>,
    pub do_not_serialize: bool,
}

impl Default for MorphTargetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphTargetManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            targets: Vec::new(),
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: MorphTarget) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn serialize(&self) -> Value {
        Value::object().with("id", self.uuid).with(
            "targets",
            Value::Array(self.targets.iter().map(MorphTarget::serialize).collect()),
        )
    }
}
