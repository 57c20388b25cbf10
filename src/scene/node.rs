use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};

use uuid::Uuid;

use crate::scene::animation::Animation;
use crate::scene::transform::Transform;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle};
use crate::serialize::Value;

static NEXT_UNIQUE_ID: AtomicU32 = AtomicU32::new(1);

/// What a node is, decided once when it enters the scene.
///
/// Serialization dispatches on this tag; nothing downstream inspects type
/// names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Mesh(MeshKey),
    /// A plain hierarchy node with only a transform.
    TransformNode,
    Camera(CameraKey),
    Light(LightKey),
    /// Anything the serializer has no record format for (audio emitters,
    /// editor gizmos, ...). Silently ignored by exports.
    Other(Cow<'static, str>),
}

/// A scene node.
///
/// # Hierarchy
///
/// - `parent`: optional handle to the parent node (None for root nodes)
/// - `children`: ordered child handles
///
/// Use [`Scene::attach`](crate::scene::Scene::attach) to keep both sides in sync.
///
/// # Identity
///
/// `uuid` is the document id written as `"id"` and referenced by `"parentId"`.
/// `unique_id` is a process-wide counter, written as `"uniqueId"`.
#[derive(Debug, Clone)]
pub struct Node {
    pub uuid: Uuid,
    pub unique_id: u32,
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub kind: NodeKind,

    pub enabled: bool,
    /// Excludes this node from every export.
    pub do_not_serialize: bool,

    pub metadata: Option<serde_json::Value>,
    pub animations: Vec<Animation>,
}

impl Node {
    /// Creates a transform node.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, NodeKind::TransformNode)
    }

    #[must_use]
    pub fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            unique_id: NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            kind,
            enabled: true,
            do_not_serialize: false,
            metadata: None,
            animations: Vec::new(),
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> String {
        self.uuid.to_string()
    }

    /// Fields shared by every node record.
    #[must_use]
    pub fn serialize(&self, parent_id: Option<Uuid>) -> Value {
        let mut record = Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("uniqueId", self.unique_id);

        if let Some(parent_id) = parent_id {
            record.insert("parentId", parent_id);
        }

        self.transform.write_into(&mut record);
        record.insert("isEnabled", self.enabled);

        if let Some(metadata) = &self.metadata {
            record.insert("metadata", metadata.clone());
        }
        if !self.animations.is_empty() {
            record.insert(
                "animations",
                Value::Array(self.animations.iter().map(Animation::serialize).collect()),
            );
        }
        record
    }
}
