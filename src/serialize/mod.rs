//! Scene serialization
//!
//! Turns a [`Scene`](crate::scene::Scene) into a JSON-shaped document:
//!
//! - [`Value`] / [`Deferred`]: document model with future-valued leaves
//! - [`SerializedDocument`]: the output, with section accumulators
//! - [`EntityCache`]: call-scoped "already emitted" set for shared geometry
//! - [`SectionOptions`]: which sections a full export writes
//! - [`NodeDispatcher`]: one node to one record, plus resource fan-out
//! - [`ClosureCollector`]: selection expansion by ancestors/descendants
//! - [`SceneDocumentBuilder`]: full-scene assembly
//! - [`flatten`]: in-place resolution of deferred leaves
//! - [`SceneSerializer`]: the public entry points

pub mod builder;
pub mod cache;
pub mod closure;
pub mod dispatch;
pub mod document;
pub mod flatten;
pub mod options;
pub mod serializer;
pub mod value;

pub use builder::SceneDocumentBuilder;
pub use cache::EntityCache;
pub use closure::ClosureCollector;
pub use dispatch::{FanOut, NodeDispatcher};
pub use document::{SerializedDocument, keys};
pub use flatten::flatten;
pub use options::SectionOptions;
pub use serializer::SceneSerializer;
pub use value::{Deferred, Value};
