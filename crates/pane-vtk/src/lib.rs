// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! VTK pane: wraps a scene object, exports it to a vtk.js scene plus arrays,
//! and publishes viewer payloads.
//!
//! Typical setup installs an engine binding once with [`install`], then
//! drives [`VtkPane`]s with [`VtkPane::render`] and [`VtkPane::refresh`].

mod config;
mod config_fs;
mod pane;
mod payload;
mod source;

pub use config::{ArrayRetention, ConfigError, ConfigService, ConfigStore, PaneConfig, CONFIG_KEY};
pub use config_fs::FsConfigStore;
pub use pane::VtkPane;
pub use payload::{CameraState, JsonLinesSync, ModelSync, SyncKind, VtkPlotPayload};
pub use source::{install, vtkjs_file_serializer, VtkjsFile, VTKJS_FILE};
