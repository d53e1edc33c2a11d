// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Decoding of vtk.js scene archives.
//!
//! A vtk.js archive is a zip holding one scene description (JSON) and any
//! number of binary arrays. Array entries are named by a 32-character content
//! hash; every other entry is the scene.

use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pane_scene_port::{is_array_entry, ArrayMap, ExportError, SceneExport};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zip::ZipArchive;

/// What to do when an archive holds more than one scene entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenePolicy {
    /// Fail with [`ExportError::DuplicateSceneEntry`].
    #[default]
    Strict,
    /// Keep the last scene entry in archive order.
    LastWins,
}

/// Default cap on the decompressed size of a single entry (1 GiB).
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 1 << 30;

/// Splits vtk.js archives into scene JSON and base64 array payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveDecoder {
    policy: ScenePolicy,
    max_entry_bytes: u64,
}

impl Default for ArchiveDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveDecoder {
    /// Decoder with the strict scene policy.
    pub const fn new() -> Self {
        Self::with_policy(ScenePolicy::Strict)
    }

    /// Decoder with an explicit scene policy.
    pub const fn with_policy(policy: ScenePolicy) -> Self {
        Self {
            policy,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    /// Cap the decompressed size of any one entry. Larger entries are
    /// rejected as malformed.
    pub const fn with_max_entry_bytes(mut self, limit: u64) -> Self {
        self.max_entry_bytes = limit;
        self
    }

    /// The scene policy in effect.
    pub const fn policy(&self) -> ScenePolicy {
        self.policy
    }

    /// The per-entry size cap in effect.
    pub const fn max_entry_bytes(&self) -> u64 {
        self.max_entry_bytes
    }

    /// Decode an archive held in memory.
    ///
    /// Entries are visited in archive order. Directory entries are skipped.
    pub fn decode(&self, bytes: &[u8]) -> Result<SceneExport, ExportError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(malformed)?;
        let mut arrays = ArrayMap::new();
        // (entry path, scene text)
        let mut scene: Option<(String, String)> = None;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(malformed)?;
            if entry.is_dir() {
                continue;
            }
            let path = entry.name().to_owned();
            // Declared sizes are untrusted: never reserve more than the input holds.
            let hint = usize::try_from(entry.size()).map_or(0, |size| size.min(bytes.len()));
            let mut raw = Vec::with_capacity(hint);
            entry
                .by_ref()
                .take(self.max_entry_bytes.saturating_add(1))
                .read_to_end(&mut raw)
                .map_err(|err| ExportError::MalformedArchive(format!("entry `{path}`: {err}")))?;
            if raw.len() > usize::try_from(self.max_entry_bytes).unwrap_or(usize::MAX) {
                return Err(ExportError::MalformedArchive(format!(
                    "entry `{path}` exceeds {} bytes",
                    self.max_entry_bytes
                )));
            }

            let file_name = entry_file_name(&path);
            if is_array_entry(file_name) {
                arrays.insert(file_name.to_owned(), STANDARD.encode(&raw));
                continue;
            }

            let text = String::from_utf8(raw).map_err(|_| ExportError::Encoding {
                entry: path.clone(),
            })?;
            if let Some((first, _)) = &scene {
                match self.policy {
                    ScenePolicy::Strict => {
                        return Err(ExportError::DuplicateSceneEntry {
                            first: first.clone(),
                            second: path,
                        });
                    }
                    ScenePolicy::LastWins => {
                        warn!(replaced = %first, by = %path, "archive holds more than one scene entry");
                    }
                }
            }
            scene = Some((path, text));
        }

        debug!(
            arrays = arrays.len(),
            scene = scene.as_ref().map(|(path, _)| path.as_str()),
            "decoded vtkjs archive"
        );
        Ok(SceneExport::new(arrays, scene.map(|(_, text)| text)))
    }
}

/// Decode an archive with the strict scene policy.
pub fn decode_archive(bytes: &[u8]) -> Result<SceneExport, ExportError> {
    ArchiveDecoder::new().decode(bytes)
}

/// Last `/`-separated component of an archive path.
fn entry_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn malformed(err: zip::result::ZipError) -> ExportError {
    ExportError::MalformedArchive(err.to_string())
}
