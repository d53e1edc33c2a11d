// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The VTK pane: wrapped object, viewer state and the exported scene cache.

use pane_registry::{GlobalRegistry, SerializerDispatch};
use pane_scene_port::{ArrayMap, ExportError, SceneExport, SceneObject};
use tracing::debug;

use crate::config::{ArrayRetention, PaneConfig};
use crate::payload::{CameraState, ModelSync, VtkPlotPayload};

/// Renders a scene object in a browser vtk.js viewer.
///
/// The pane exports its object through a [`SerializerDispatch`] (the
/// process-wide registry by default) and caches the last scene and the
/// accumulated arrays. A failed export leaves the cache as it was.
pub struct VtkPane<D = GlobalRegistry> {
    object: Option<Box<dyn SceneObject>>,
    dispatch: D,
    config: PaneConfig,
    camera: Option<CameraState>,
    selection: [f64; 3],
    enable_keybindings: bool,
    append: bool,
    scene: Option<String>,
    arrays: ArrayMap,
}

impl<D: std::fmt::Debug> std::fmt::Debug for VtkPane<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VtkPane")
            .field("object", &self.object.as_ref().map(|o| o.kind()))
            .field("dispatch", &self.dispatch)
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("enable_keybindings", &self.enable_keybindings)
            .field("scene", &self.scene.as_ref().map(String::len))
            .field("arrays", &self.arrays.len())
            .finish_non_exhaustive()
    }
}

impl VtkPane<GlobalRegistry> {
    /// Pane over `object` dispatching through the process-wide registry.
    pub fn new(object: Option<Box<dyn SceneObject>>) -> Self {
        Self::with_dispatch(object, GlobalRegistry)
    }
}

impl<D: SerializerDispatch> VtkPane<D> {
    /// Pane over `object` dispatching through `dispatch`.
    pub fn with_dispatch(object: Option<Box<dyn SceneObject>>, dispatch: D) -> Self {
        let config = PaneConfig::default();
        Self {
            object,
            dispatch,
            enable_keybindings: config.enable_keybindings,
            config,
            camera: None,
            selection: [0.0; 3],
            append: false,
            scene: None,
            arrays: ArrayMap::new(),
        }
    }

    /// Apply `config`. Also resets keybindings to the configured default.
    pub fn with_config(mut self, config: PaneConfig) -> Self {
        self.enable_keybindings = config.enable_keybindings;
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PaneConfig {
        &self.config
    }

    /// Dispatch used for exports.
    pub fn dispatch_mut(&mut self) -> &mut D {
        &mut self.dispatch
    }

    /// Wrapped object, if any.
    pub fn object(&self) -> Option<&dyn SceneObject> {
        self.object.as_deref()
    }

    /// Replace the wrapped object. Takes effect on the next export.
    pub fn set_object(&mut self, object: Option<Box<dyn SceneObject>>) {
        self.object = object;
    }

    /// Camera state last reported by the viewer.
    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    /// Record camera state reported by the viewer.
    pub fn set_camera(&mut self, camera: Option<CameraState>) {
        self.camera = camera;
    }

    /// Picked point.
    pub fn selection(&self) -> [f64; 3] {
        self.selection
    }

    /// Record a picked point.
    pub fn set_selection(&mut self, selection: [f64; 3]) {
        self.selection = selection;
    }

    /// Whether the viewer binds keyboard shortcuts.
    pub fn enable_keybindings(&self) -> bool {
        self.enable_keybindings
    }

    /// Toggle viewer keyboard shortcuts.
    pub fn set_enable_keybindings(&mut self, enable: bool) {
        self.enable_keybindings = enable;
    }

    /// Ask the viewer to append to its scene instead of replacing it.
    pub fn set_append(&mut self, append: bool) {
        self.append = append;
    }

    /// Cached scene from the last successful export.
    pub fn scene(&self) -> Option<&str> {
        self.scene.as_deref()
    }

    /// Cached arrays.
    pub fn arrays(&self) -> &ArrayMap {
        &self.arrays
    }

    /// First render: export and replace the cached scene and arrays.
    pub fn model(&mut self) -> Result<VtkPlotPayload, ExportError> {
        match self.export()? {
            Some(export) => {
                let (arrays, scene) = export.into_parts();
                debug!(arrays = arrays.len(), "pane model exported");
                self.scene = scene;
                self.arrays = arrays;
            }
            None => {
                self.scene = None;
                self.arrays.clear();
            }
        }
        Ok(self.payload())
    }

    /// Re-render: export, set the scene and fold new arrays into the cache.
    ///
    /// Without an object the scene is cleared and cached arrays stay.
    pub fn update(&mut self) -> Result<VtkPlotPayload, ExportError> {
        match self.export()? {
            Some(export) => {
                let (arrays, scene) = export.into_parts();
                self.scene = scene;
                self.absorb(arrays);
            }
            None => self.scene = None,
        }
        Ok(self.payload())
    }

    /// Export via [`model`](Self::model) and push the result as a full model.
    ///
    /// `Ok` means the export succeeded and the payload was handed to `sync`.
    /// Delivery is up to the sink: [`JsonLinesSync`](crate::JsonLinesSync)
    /// logs write failures and drops them.
    pub fn render(&mut self, sync: &mut dyn ModelSync) -> Result<(), ExportError> {
        let payload = self.model()?;
        sync.push_model(&payload);
        Ok(())
    }

    /// Export via [`update`](Self::update) and push the result as an update.
    ///
    /// Same delivery contract as [`render`](Self::render).
    pub fn refresh(&mut self, sync: &mut dyn ModelSync) -> Result<(), ExportError> {
        let payload = self.update()?;
        sync.push_update(&payload);
        Ok(())
    }

    /// Payload for the current cache and viewer state. Does not export.
    pub fn payload(&self) -> VtkPlotPayload {
        VtkPlotPayload {
            scene: self.scene.clone(),
            arrays: self.arrays.clone(),
            camera: self.camera.clone(),
            selection: self.selection,
            enable_keybindings: self.enable_keybindings,
            append: self.append,
            width: self.config.width,
            height: self.config.height,
        }
    }

    fn export(&mut self) -> Result<Option<SceneExport>, ExportError> {
        let object = self
            .object
            .as_mut()
            .map(|object| &mut **object as &mut dyn SceneObject);
        self.dispatch.serialize(object)
    }

    fn absorb(&mut self, arrays: ArrayMap) {
        match self.config.array_retention {
            ArrayRetention::Merge => {
                let fresh = arrays
                    .keys()
                    .filter(|id| !self.arrays.contains_key(*id))
                    .count();
                debug!(fresh, total = arrays.len(), "merging exported arrays");
                self.arrays.extend(arrays);
            }
            ArrayRetention::Replace => {
                debug!(total = arrays.len(), "replacing exported arrays");
                self.arrays = arrays;
            }
        }
    }
}
