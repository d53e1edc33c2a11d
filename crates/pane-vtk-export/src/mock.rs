// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock engine for headless testing of the export path.
//!
//! MockEngine writes real vtk.js archives for a MockRenderWindow without any
//! native library. Its archiver keeps the archive in a Rust allocation and
//! reports it through the same pointer-string interface native bindings use,
//! so the unsafe view code is exercised for real.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pane_scene_port::{ExportError, RenderWindow, SceneKind, SceneObject, RENDER_WINDOW};
use pane_vtkjs_codec::{ArchiveBuilder, EncodeError};
use serde_json::{json, Value};

use crate::{format_pointer, BufferedArchiver, VtkEngine};

/// A polydata actor in a mock scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MockActor {
    /// Actor name.
    pub name: String,
    /// Point coordinates.
    pub points: Vec<[f32; 3]>,
    /// Polygon connectivity in vtkCellArray legacy layout (`n, i0, .., in-1`).
    pub polys: Vec<u32>,
}

impl MockActor {
    /// A single triangle offset along x by `offset`.
    pub fn triangle(name: impl Into<String>, offset: f32) -> Self {
        Self {
            name: name.into(),
            points: vec![
                [offset, 0.0, 0.0],
                [offset + 1.0, 0.0, 0.0],
                [offset, 1.0, 0.0],
            ],
            polys: vec![3, 0, 1, 2],
        }
    }
}

/// Render window that records how it was driven.
#[derive(Debug, Clone)]
pub struct MockRenderWindow {
    /// Actors in the window's single renderer.
    pub actors: Vec<MockActor>,
    /// Window size in pixels.
    pub size: [u32; 2],
    /// Renderer background color.
    pub background: [f64; 3],
    /// Whether a render target is attached.
    pub has_target: bool,
    /// Make the next render passes fail.
    pub fail_render: bool,
    off_screen: bool,
    render_count: u32,
}

impl Default for MockRenderWindow {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            size: [300, 300],
            background: [0.32, 0.34, 0.43],
            has_target: true,
            fail_render: false,
            off_screen: false,
            render_count: 0,
        }
    }
}

impl MockRenderWindow {
    /// Empty window with a render target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor.
    pub fn with_actor(mut self, actor: MockActor) -> Self {
        self.actors.push(actor);
        self
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> u32 {
        self.render_count
    }
}

impl RenderWindow for MockRenderWindow {
    fn set_off_screen_rendering(&mut self, enabled: bool) {
        self.off_screen = enabled;
    }

    fn off_screen_rendering(&self) -> bool {
        self.off_screen
    }

    fn has_render_target(&self) -> bool {
        self.has_target
    }

    fn render(&mut self) -> Result<(), ExportError> {
        if self.fail_render {
            return Err(ExportError::NativeExportFailure("render pass failed".into()));
        }
        self.render_count += 1;
        Ok(())
    }
}

impl SceneObject for MockRenderWindow {
    fn kind(&self) -> SceneKind {
        RENDER_WINDOW
    }

    fn as_render_window(&mut self) -> Option<&mut dyn RenderWindow> {
        Some(self)
    }
}

/// In-memory archiver backed by a `Vec<u8>`.
#[derive(Debug, Default)]
pub struct MockArchiver {
    buffer: Vec<u8>,
}

// SAFETY: the address is that of `buffer`, which is only replaced through
// `&mut self`, so it stays valid and unwritten while `&self` is borrowed.
#[allow(unsafe_code)]
unsafe impl BufferedArchiver for MockArchiver {
    fn buffer_address(&self) -> String {
        format_pointer(self.buffer.as_ptr().expose_provenance())
    }

    fn buffer_size(&self) -> usize {
        self.buffer.len()
    }
}

/// Engine that archives [`MockRenderWindow`]s.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    /// Behave like a build without the in-memory archiver.
    pub without_archiver: bool,
    /// Write bytes that are not a zip.
    pub corrupt: bool,
    exports: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Engine with a working archiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenes written so far (shared between clones).
    pub fn exports(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }
}

impl VtkEngine for MockEngine {
    type Archiver = MockArchiver;

    fn new_archiver(&self) -> Option<MockArchiver> {
        (!self.without_archiver).then(MockArchiver::default)
    }

    fn write_scene(
        &self,
        window: &mut dyn RenderWindow,
        archiver: &mut MockArchiver,
    ) -> Result<(), ExportError> {
        let any: &dyn Any = &*window;
        let window = any.downcast_ref::<MockRenderWindow>().ok_or_else(|| {
            ExportError::NativeExportFailure("mock engine cannot export this window".into())
        })?;
        if window.render_count == 0 {
            return Err(ExportError::NativeExportFailure(
                "window has not been rendered".into(),
            ));
        }

        archiver.buffer = if self.corrupt {
            b"this is not a zip archive".to_vec()
        } else {
            scene_archive(window)
                .map_err(|err| ExportError::NativeExportFailure(err.to_string()))?
        };
        self.exports.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn scene_archive(window: &MockRenderWindow) -> Result<Vec<u8>, EncodeError> {
    let mut builder = ArchiveBuilder::new();
    let mut actors = Vec::with_capacity(window.actors.len());
    for (index, actor) in window.actors.iter().enumerate() {
        let points: Vec<u8> = actor
            .points
            .iter()
            .flatten()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        let polys: Vec<u8> = actor.polys.iter().flat_map(|c| c.to_le_bytes()).collect();
        let points_hash = builder.array(&points);
        let polys_hash = builder.array(&polys);
        actors.push(actor_state(index, actor, &points_hash, &polys_hash));
    }

    let state = json!({
        "id": "0x1",
        "type": "vtkRenderWindow",
        "properties": {
            "numberOfLayers": 1,
            "size": window.size,
        },
        "dependencies": [{
            "id": "0x2",
            "type": "vtkRenderer",
            "properties": { "background": window.background },
            "dependencies": actors,
        }],
        "mtime": window.render_count,
    });
    builder.scene(state.to_string()).finish()
}

fn actor_state(index: usize, actor: &MockActor, points_hash: &str, polys_hash: &str) -> Value {
    json!({
        "id": format!("actor-{index}"),
        "type": "vtkActor",
        "properties": { "name": actor.name, "visibility": true },
        "dependencies": [{
            "id": format!("polydata-{index}"),
            "type": "vtkPolyData",
            "properties": {
                "points": {
                    "vtkClass": "vtkPoints",
                    "hash": points_hash,
                    "dataType": "Float32Array",
                    "numberOfComponents": 3,
                    "size": actor.points.len() * 3,
                },
                "polys": {
                    "vtkClass": "vtkCellArray",
                    "hash": polys_hash,
                    "dataType": "Uint32Array",
                    "numberOfComponents": 1,
                    "size": actor.polys.len(),
                },
            },
        }],
    })
}
