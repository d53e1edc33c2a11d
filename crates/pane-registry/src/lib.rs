// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializer registry and dispatch for VTK panes.
//!
//! The registry maps [`SceneKind`]s to [`Serializer`]s. Applications register
//! serializers for their own scene objects; render windows fall back to a
//! native serializer supplied by the engine binding.

mod global;

pub use global::{
    is_registered, register_serializer, serialize, set_native_serializer, GlobalRegistry,
};

use pane_scene_port::{
    ExportError, SceneExport, SceneKind, SceneObject, Serializer, RENDER_WINDOW,
};
use tracing::debug;

/// Something that can turn an optional scene object into an export.
pub trait SerializerDispatch {
    /// Export `object`. `None` yields `Ok(None)` without invoking anything.
    fn serialize(
        &mut self,
        object: Option<&mut dyn SceneObject>,
    ) -> Result<Option<SceneExport>, ExportError>;
}

/// Ordered kind → serializer table.
///
/// One serializer per kind; re-registering a kind replaces its serializer and
/// keeps its position.
#[derive(Default, Clone)]
pub struct SerializerRegistry {
    entries: Vec<(SceneKind, Serializer)>,
    native: Option<Serializer>,
}

impl std::fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("kinds", &self.kinds())
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl SerializerRegistry {
    /// Empty registry with no native serializer.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            native: None,
        }
    }

    /// Empty registry that will adopt `native` for render windows.
    pub fn with_native(native: Serializer) -> Self {
        Self {
            entries: Vec::new(),
            native: Some(native),
        }
    }

    /// Install the serializer render windows fall back to.
    ///
    /// Does not touch a serializer already registered for `vtkRenderWindow`.
    pub fn set_native(&mut self, native: Serializer) {
        self.native = Some(native);
    }

    /// Register `serializer` for `kind`. Last registration for a kind wins.
    pub fn register(&mut self, kind: SceneKind, serializer: Serializer) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            slot.1 = serializer;
        } else {
            self.entries.push((kind, serializer));
        }
        debug!(%kind, "registered serializer");
    }

    /// Whether a serializer is registered for exactly `kind`.
    pub fn is_registered(&self, kind: SceneKind) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> Vec<SceneKind> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered serializer whose kind `object` is-a.
    pub fn lookup(&self, object: &dyn SceneObject) -> Option<Serializer> {
        self.entries
            .iter()
            .find(|(kind, _)| object.is_a(*kind))
            .map(|(_, serializer)| serializer.clone())
    }

    /// Resolve the serializer for `object`, adopting the native serializer
    /// for render windows on a miss.
    pub fn serializer_for(&mut self, object: &dyn SceneObject) -> Result<Serializer, ExportError> {
        if let Some(serializer) = self.lookup(object) {
            return Ok(serializer);
        }
        if !object.is_a(RENDER_WINDOW) {
            return Err(ExportError::NoSerializerRegistered(
                object.kind().to_string(),
            ));
        }
        let native = self.native.clone().ok_or_else(|| {
            ExportError::NativeExportFailure("no native vtk.js serializer installed".into())
        })?;
        self.register(RENDER_WINDOW, native.clone());
        Ok(native)
    }
}

impl SerializerDispatch for SerializerRegistry {
    fn serialize(
        &mut self,
        object: Option<&mut dyn SceneObject>,
    ) -> Result<Option<SceneExport>, ExportError> {
        let Some(object) = object else {
            return Ok(None);
        };
        let serializer = self.serializer_for(&*object)?;
        serializer(object).map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const MESH: SceneKind = SceneKind::new("Mesh");

    struct Mesh;

    impl SceneObject for Mesh {
        fn kind(&self) -> SceneKind {
            MESH
        }
    }

    fn tagged(tag: &'static str) -> Serializer {
        Arc::new(
            move |_: &mut dyn SceneObject| -> Result<SceneExport, ExportError> {
                Ok(SceneExport::new(Default::default(), Some(tag.to_owned())))
            },
        )
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let mut registry = SerializerRegistry::new();
        registry.register(MESH, tagged("first"));
        registry.register(RENDER_WINDOW, tagged("window"));
        registry.register(MESH, tagged("second"));

        assert_eq!(registry.kinds(), vec![MESH, RENDER_WINDOW]);
        let export = registry.serialize(Some(&mut Mesh)).unwrap().unwrap();
        assert_eq!(export.scene.as_deref(), Some("second"));
    }

    #[test]
    fn missing_native_serializer_is_an_export_failure() {
        struct Window;
        impl SceneObject for Window {
            fn kind(&self) -> SceneKind {
                RENDER_WINDOW
            }
        }

        let mut registry = SerializerRegistry::new();
        let err = registry.serialize(Some(&mut Window)).unwrap_err();
        assert!(matches!(err, ExportError::NativeExportFailure(_)));
        assert!(!registry.is_registered(RENDER_WINDOW));
    }

    #[test]
    fn debug_lists_kinds() {
        let mut registry = SerializerRegistry::with_native(tagged("native"));
        registry.register(MESH, tagged("mesh"));
        let text = format!("{registry:?}");
        assert!(text.contains("Mesh"));
        assert!(text.contains("native: true"));
    }
}
