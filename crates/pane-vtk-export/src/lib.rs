// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Native scene export for VTK panes.
//!
//! Drives a native engine to write a render window into an in-memory vtk.js
//! archive, reads the archive out of the engine's buffer through a pointer
//! string, and decodes it with pane-vtkjs-codec.
//!
//! This is the only crate in the workspace that reads foreign memory; unsafe
//! code is confined to [`ArchiveView::new`] and archiver implementations.

mod buffer;
mod exporter;
mod mock;

pub use buffer::{format_pointer, parse_pointer, ArchiveView, BufferedArchiver};
pub use exporter::{render_window_serializer, RenderWindowExporter, VtkEngine};
pub use mock::{MockActor, MockArchiver, MockEngine, MockRenderWindow};
