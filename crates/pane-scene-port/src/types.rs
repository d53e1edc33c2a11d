// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Export results and the serializer function type.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{ExportError, SceneObject};

/// Length of a content-addressed array id, in characters.
///
/// vtk.js archives name every binary array entry by a 32-character hash. Any
/// other file name denotes the scene document.
pub const ARRAY_ID_LEN: usize = 32;

/// Array id → base64-encoded array bytes.
///
/// Ordered so payloads serialize deterministically.
pub type ArrayMap = BTreeMap<String, String>;

/// Returns `true` if an archive file name (last path component) names an
/// array payload rather than the scene document.
pub fn is_array_entry(file_name: &str) -> bool {
    file_name.chars().count() == ARRAY_ID_LEN
}

/// Result of exporting one scene object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneExport {
    /// Binary arrays keyed by content id.
    pub arrays: ArrayMap,
    /// Scene description JSON. `None` when the archive held no scene entry.
    pub scene: Option<String>,
}

impl SceneExport {
    /// Build an export from its parts.
    pub fn new(arrays: ArrayMap, scene: Option<String>) -> Self {
        Self { arrays, scene }
    }

    /// Returns `true` if there is neither a scene nor any array.
    pub fn is_empty(&self) -> bool {
        self.scene.is_none() && self.arrays.is_empty()
    }

    /// Split into `(arrays, scene)`.
    pub fn into_parts(self) -> (ArrayMap, Option<String>) {
        (self.arrays, self.scene)
    }
}

/// Serializer for one kind of scene object.
///
/// Takes the object mutably: exporting a render window switches it to
/// off-screen mode and forces a render pass.
pub type Serializer =
    Arc<dyn Fn(&mut dyn SceneObject) -> Result<SceneExport, ExportError> + Send + Sync>;
