// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Writing vtk.js scene archives.

use std::io::{Cursor, Write};

use pane_scene_port::ARRAY_ID_LEN;
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive path of the scene document.
pub const SCENE_ENTRY: &str = "index.json";

/// Directory that holds array entries.
pub const ARRAY_DIR: &str = "data";

/// Error raised while writing an archive.
#[derive(Debug, Error)]
#[error("failed to write vtkjs archive: {0}")]
pub struct EncodeError(#[from] ZipError);

/// Content id of an array payload.
///
/// The first 32 hex characters of the BLAKE3 digest. The viewer treats ids as
/// opaque; only their length is part of the archive format.
pub fn array_id(bytes: &[u8]) -> String {
    let digest = blake3::hash(bytes);
    digest.to_hex().as_str()[..ARRAY_ID_LEN].to_owned()
}

/// Accumulates entries and writes them as a deflated zip.
///
/// Entries are written in insertion order.
#[derive(Debug, Default, Clone)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the scene document under [`SCENE_ENTRY`].
    pub fn scene(self, json: impl Into<String>) -> Self {
        self.entry(SCENE_ENTRY, json.into().into_bytes())
    }

    /// Add an array under `data/<id>` and return its id.
    ///
    /// Adding the same bytes twice stores them once.
    pub fn array(&mut self, bytes: &[u8]) -> String {
        let id = array_id(bytes);
        let path = format!("{ARRAY_DIR}/{id}");
        if !self.entries.iter().any(|(name, _)| *name == path) {
            self.entries.push((path, bytes.to_vec()));
        }
        id
    }

    /// Add a raw entry.
    pub fn entry(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.into(), bytes.into()));
        self
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &self.entries {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes).map_err(ZipError::Io)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}
