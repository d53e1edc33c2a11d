// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene source contract for VTK panes.
//!
//! This crate defines the contract between panes, serializers and native
//! render windows. It contains NO archive logic (that lives in
//! pane-vtkjs-codec) and NO engine bindings (pane-vtk-export).
//!
//! # Design Principles
//!
//! - **Serializers are functions**: a [`Serializer`] turns one scene object
//!   into a [`SceneExport`] and nothing else.
//! - **Capabilities over introspection**: a scene object advertises its
//!   [`SceneKind`] lineage and, optionally, a [`RenderWindow`].
//! - **All or nothing**: an export either yields a full `(arrays, scene)`
//!   pair or an [`ExportError`].

use thiserror::Error;

/// Error type for scene export, archive decoding and serializer dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The native engine could not produce an archive buffer.
    #[error("native export failed: {0}")]
    NativeExportFailure(String),
    /// The buffer could not be read as a zip archive.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),
    /// A scene entry was not valid UTF-8 text.
    #[error("scene entry `{entry}` is not valid UTF-8")]
    Encoding {
        /// Full archive path of the offending entry.
        entry: String,
    },
    /// More than one scene entry was found under the strict policy.
    #[error("archive holds more than one scene entry: `{first}` and `{second}`")]
    DuplicateSceneEntry {
        /// The scene entry seen first.
        first: String,
        /// The scene entry that collided with it.
        second: String,
    },
    /// No serializer matches the object's kind.
    #[error("no serializer registered for `{0}`")]
    NoSerializerRegistered(String),
    /// A scene source could not be read.
    #[error("i/o error: {0}")]
    Io(String),
}

mod object;
mod types;
mod window;

pub use object::{SceneKind, SceneObject, RENDER_WINDOW};
pub use types::{is_array_entry, ArrayMap, SceneExport, Serializer, ARRAY_ID_LEN};
pub use window::RenderWindow;
