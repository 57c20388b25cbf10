//! Error Types
//!
//! This module defines the error types used throughout the serializer.
//!
//! # Overview
//!
//! Most "failures" during an export are not errors at all: an entity that
//! opted out, is still streaming, or was already written is simply skipped.
//! What remains is covered by two enums:
//!
//! - [`AssetError`]: failures produced by asset payloads (for example a
//!   texture whose pixel read-back failed). It is `Clone` so that one
//!   failing payload can be observed by every record that embeds it.
//! - [`Error`]: everything a public API can return.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_serialize::errors::Result;
//!
//! async fn export(serializer: &SceneSerializer<'_>) -> Result<String> {
//!     let doc = serializer.serialize_scene_async(&SectionOptions::default()).await?;
//!     doc.to_json_string()
//! }
//! ```

use thiserror::Error;

/// Errors raised by asset payloads while they resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Reading back the pixels of a texture failed.
    #[error("Failed to read texture '{name}': {reason}")]
    TextureReadFailed {
        /// Texture name
        name: String,
        /// Underlying failure description
        reason: String,
    },

    /// The producer of a deferred payload went away before delivering it.
    #[error("Payload producer for '{name}' was dropped before completion")]
    PayloadDropped {
        /// Name of the asset whose payload never arrived
        name: String,
    },
}

/// The main error type for scene serialization.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// A deferred asset payload rejected.
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// The document still contains a deferred value where plain data was required.
    #[error("Unresolved deferred value at {path}")]
    UnresolvedDeferred {
        /// JSON-pointer style path to the pending slot
        path: String,
    },

    /// Section options could not be parsed.
    #[error("Invalid section options: {0}")]
    InvalidOptions(String),

    // ========================================================================
    // Format & I/O Errors
    // ========================================================================
    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writer error while persisting a document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
