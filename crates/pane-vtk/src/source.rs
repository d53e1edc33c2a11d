// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `.vtkjs` files as scene objects, and process-wide serializer setup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pane_registry::{register_serializer, set_native_serializer};
use pane_scene_port::{ExportError, SceneExport, SceneKind, SceneObject, Serializer};
use pane_vtk_export::{render_window_serializer, RenderWindowExporter, VtkEngine};
use pane_vtkjs_codec::ArchiveDecoder;
use tracing::debug;

use crate::config::PaneConfig;

/// Kind of [`VtkjsFile`].
pub const VTKJS_FILE: SceneKind = SceneKind::new("vtkjs");

/// A vtk.js archive on disk, exported by reading and decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtkjsFile {
    path: PathBuf,
}

impl VtkjsFile {
    /// Wrap the archive at `path`. The file is read at export time.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the archive.
    pub fn export(&self, decoder: &ArchiveDecoder) -> Result<SceneExport, ExportError> {
        let bytes = fs::read(&self.path)
            .map_err(|err| ExportError::Io(format!("{}: {err}", self.path.display())))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "read vtkjs file");
        decoder.decode(&bytes)
    }
}

impl SceneObject for VtkjsFile {
    fn kind(&self) -> SceneKind {
        VTKJS_FILE
    }
}

/// Serializer for [`VtkjsFile`] objects.
pub fn vtkjs_file_serializer(decoder: ArchiveDecoder) -> Serializer {
    Arc::new(move |object: &mut dyn SceneObject| -> Result<SceneExport, ExportError> {
        let kind = object.kind();
        let file = object.downcast_ref::<VtkjsFile>().ok_or_else(|| {
            ExportError::NoSerializerRegistered(kind.name().to_owned())
        })?;
        file.export(&decoder)
    })
}

/// Set up the process-wide registry for panes.
///
/// `engine` becomes the native render-window serializer and `.vtkjs` files
/// get a serializer; both decode with `config`'s scene policy.
pub fn install<E>(engine: E, config: &PaneConfig)
where
    E: VtkEngine + Send + Sync + 'static,
{
    let decoder = config.decoder();
    set_native_serializer(render_window_serializer(
        RenderWindowExporter::new(engine).with_decoder(decoder),
    ));
    register_serializer(VTKJS_FILE, vtkjs_file_serializer(decoder));
}
