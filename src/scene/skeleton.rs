use glam::Mat4;
use uuid::Uuid;

use crate::serialize::Value;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone in [`Skeleton::bones`].
    pub parent: Option<usize>,
    /// Rest pose, relative to the parent bone.
    pub matrix: Mat4,
    pub inverse_bind_matrix: Mat4,
}

impl Bone {
    #[must_use]
    pub fn new(name: &str, parent: Option<usize>, matrix: Mat4) -> Self {
        Self {
            name: name.to_string(),
            parent,
            matrix,
            inverse_bind_matrix: Mat4::IDENTITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    // Bone list: ordered array, bones[i] corresponds to joint index i
    pub bones: Vec<Bone>,

    pub need_initial_skin_matrix: bool,
    pub do_not_serialize: bool,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<Bone>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bones,
            need_initial_skin_matrix: false,
            do_not_serialize: false,
        }
    }

    #[must_use]
    pub fn serialize(&self) -> Value {
        let bones = self
            .bones
            .iter()
            .enumerate()
            .map(|(index, bone)| {
                // -1 marks a root bone
                let parent_index = bone.parent.map_or(-1, |p| p as i64);
                Value::object()
                    .with("name", bone.name.as_str())
                    .with("index", index)
                    .with("parentBoneIndex", parent_index)
                    .with("matrix", bone.matrix)
                    .with("inverseBindMatrix", bone.inverse_bind_matrix)
            })
            .collect::<Vec<_>>();

        Value::object()
            .with("name", self.name.as_str())
            .with("id", self.id)
            .with("needInitialSkinMatrix", self.need_initial_skin_matrix)
            .with("bones", bones)
    }
}
