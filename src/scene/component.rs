use crate::errors::Result;
use crate::scene::scene::Scene;
use crate::serialize::SerializedDocument;

/// An engine feature that contributes its own sections to a scene export.
///
/// Registered with [`Scene::register_component`]; every registered component
/// runs after the built-in sections and may add or extend any top-level key.
/// A component that returns an error is skipped (the document keeps whatever
/// the component wrote before failing).
pub trait SceneComponent: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    fn serialize(&self, scene: &Scene, document: &mut SerializedDocument) -> Result<()>;
}
