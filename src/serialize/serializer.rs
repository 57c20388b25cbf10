//! Public entry points.

use super::builder::SceneDocumentBuilder;
use super::cache::EntityCache;
use super::closure::ClosureCollector;
use super::dispatch::{FanOut, NodeDispatcher};
use super::document::{SerializedDocument, keys};
use super::flatten::flatten;
use super::options::SectionOptions;
use crate::errors::Result;
use crate::scene::NodeHandle;
use crate::scene::scene::Scene;

/// Sections a selection export always carries.
const SELECTION_SECTIONS: [&str; 4] = [
    keys::MESHES,
    keys::TRANSFORM_NODES,
    keys::CAMERAS,
    keys::LIGHTS,
];

/// Produces documents from a scene.
///
/// Every call owns a fresh [`EntityCache`]; nothing is remembered between
/// calls, so two exports of the same scene are independent and complete.
///
/// # Example
///
/// ```rust,ignore
/// let serializer = scene.serializer();
/// let doc = pollster::block_on(serializer.serialize_scene_async(&SectionOptions::default()))?;
/// std::fs::write("scene.json", doc.to_json_string()?)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SceneSerializer<'s> {
    scene: &'s Scene,
}

impl<'s> SceneSerializer<'s> {
    #[must_use]
    pub fn new(scene: &'s Scene) -> Self {
        Self { scene }
    }

    /// Exports a selection.
    ///
    /// `nodes` is expanded by ancestors (`with_parents`) and/or descendants
    /// (`with_children`) before serialization. The document carries
    /// `meshes`, `transformNodes`, `cameras` and `lights`, plus whatever
    /// materials, geometries and skeletons the selected meshes reference.
    ///
    /// Texture payloads still being produced appear as deferred values; use
    /// [`serialize_nodes_async`](Self::serialize_nodes_async) to resolve them.
    #[must_use]
    pub fn serialize_nodes(
        &self,
        nodes: &[NodeHandle],
        with_parents: bool,
        with_children: bool,
    ) -> SerializedDocument {
        let mut cache = EntityCache::new();
        let closure = ClosureCollector::new(with_parents, with_children).expand(self.scene, nodes);

        let mut doc = SerializedDocument::with_sections(&SELECTION_SECTIONS);
        let mut dispatcher = NodeDispatcher::new(self.scene, &mut cache, FanOut::all());
        for handle in closure {
            dispatcher.serialize_node(handle, &mut doc);
        }
        doc
    }

    /// Exports the whole scene, one section per enabled option.
    ///
    /// May contain deferred values; see
    /// [`serialize_scene_async`](Self::serialize_scene_async).
    #[must_use]
    pub fn serialize_scene(&self, options: &SectionOptions) -> SerializedDocument {
        let mut cache = EntityCache::new();
        SceneDocumentBuilder::new(self.scene, *options).build(&mut cache)
    }

    /// [`serialize_scene`](Self::serialize_scene) followed by resolution of
    /// every deferred value. Fails with the first payload error.
    pub async fn serialize_scene_async(&self, options: &SectionOptions) -> Result<SerializedDocument> {
        let mut doc = self.serialize_scene(options);
        flatten(doc.root_mut()).await?;
        Ok(doc)
    }

    /// [`serialize_nodes`](Self::serialize_nodes) followed by resolution of
    /// every deferred value.
    pub async fn serialize_nodes_async(
        &self,
        nodes: &[NodeHandle],
        with_parents: bool,
        with_children: bool,
    ) -> Result<SerializedDocument> {
        let mut doc = self.serialize_nodes(nodes, with_parents, with_children);
        flatten(doc.root_mut()).await?;
        Ok(doc)
    }
}
