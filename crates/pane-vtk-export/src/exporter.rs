// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene exporter adapter.

use std::sync::Arc;

use pane_scene_port::{ExportError, RenderWindow, SceneExport, SceneObject, Serializer};
use pane_vtkjs_codec::ArchiveDecoder;
use tracing::debug;

use crate::{ArchiveView, BufferedArchiver};

/// Native engine binding: creates archivers and writes scenes into them.
///
/// Mirrors the `vtkVtkJSSceneExporter` + `vtkVtkJSBufferedArchiver` pair.
pub trait VtkEngine {
    /// The engine's in-memory archiver.
    type Archiver: BufferedArchiver;

    /// Create a fresh archiver, or `None` if this build cannot archive to
    /// memory.
    fn new_archiver(&self) -> Option<Self::Archiver>;

    /// Write the window's full scene graph and arrays into `archiver`.
    fn write_scene(
        &self,
        window: &mut dyn RenderWindow,
        archiver: &mut Self::Archiver,
    ) -> Result<(), ExportError>;
}

/// Exports render windows to decoded vtk.js scenes.
///
/// Each export acquires one archiver, copies its buffer out and drops it
/// before decoding. Do not export the same window from two threads at once.
#[derive(Debug, Clone)]
pub struct RenderWindowExporter<E> {
    engine: E,
    decoder: ArchiveDecoder,
}

impl<E: VtkEngine> RenderWindowExporter<E> {
    /// Exporter over `engine` with the strict decoder.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            decoder: ArchiveDecoder::new(),
        }
    }

    /// Replace the decoder.
    pub fn with_decoder(mut self, decoder: ArchiveDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Export the window and return the raw archive bytes.
    ///
    /// Leaves the window in off-screen mode.
    pub fn export_bytes(&self, window: &mut dyn RenderWindow) -> Result<Vec<u8>, ExportError> {
        if !window.has_render_target() {
            return Err(ExportError::NativeExportFailure(
                "render window has no render target".into(),
            ));
        }
        window.set_off_screen_rendering(true);
        window.render()?;

        let mut archiver = self.engine.new_archiver().ok_or_else(|| {
            ExportError::NativeExportFailure("engine has no in-memory vtk.js archiver".into())
        })?;
        self.engine.write_scene(window, &mut archiver)?;
        let bytes = ArchiveView::new(&archiver)?.to_vec();
        drop(archiver);

        debug!(bytes = bytes.len(), "exported render window");
        Ok(bytes)
    }

    /// Export the window and decode the archive.
    pub fn export(&self, window: &mut dyn RenderWindow) -> Result<SceneExport, ExportError> {
        let bytes = self.export_bytes(window)?;
        self.decoder.decode(&bytes)
    }

    /// Export the render window behind a scene object.
    pub fn export_object(&self, object: &mut dyn SceneObject) -> Result<SceneExport, ExportError> {
        let kind = object.kind();
        let window = object.as_render_window().ok_or_else(|| {
            ExportError::NativeExportFailure(format!("`{kind}` exposes no render window"))
        })?;
        self.export(window)
    }
}

/// Wrap an exporter as the default render-window [`Serializer`].
pub fn render_window_serializer<E>(exporter: RenderWindowExporter<E>) -> Serializer
where
    E: VtkEngine + Send + Sync + 'static,
{
    Arc::new(move |object: &mut dyn SceneObject| exporter.export_object(object))
}
