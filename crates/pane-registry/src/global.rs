// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Process-wide serializer registry.
//!
//! Starts empty. Mutated only through [`register_serializer`],
//! [`set_native_serializer`] and native adoption during [`serialize`].
//! Serializers run with the lock released, so a serializer may register
//! others.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pane_scene_port::{ExportError, SceneExport, SceneKind, SceneObject, Serializer};

use crate::{SerializerDispatch, SerializerRegistry};

static REGISTRY: RwLock<SerializerRegistry> = RwLock::new(SerializerRegistry::new());

// Entries are plain data, so a panic mid-registration cannot leave them torn.
fn read() -> RwLockReadGuard<'static, SerializerRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, SerializerRegistry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Register `serializer` for `kind` in the process-wide registry.
pub fn register_serializer(kind: SceneKind, serializer: Serializer) {
    write().register(kind, serializer);
}

/// Install the process-wide render-window fallback.
pub fn set_native_serializer(native: Serializer) {
    write().set_native(native);
}

/// Whether the process-wide registry holds a serializer for exactly `kind`.
pub fn is_registered(kind: SceneKind) -> bool {
    read().is_registered(kind)
}

/// Export `object` through the process-wide registry.
///
/// `None` yields `Ok(None)` without touching the registry.
pub fn serialize(object: Option<&mut dyn SceneObject>) -> Result<Option<SceneExport>, ExportError> {
    let Some(object) = object else {
        return Ok(None);
    };
    let found = read().lookup(&*object);
    let serializer = match found {
        Some(serializer) => serializer,
        None => write().serializer_for(&*object)?,
    };
    serializer(object).map(Some)
}

/// [`SerializerDispatch`] over the process-wide registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalRegistry;

impl SerializerDispatch for GlobalRegistry {
    fn serialize(
        &mut self,
        object: Option<&mut dyn SceneObject>,
    ) -> Result<Option<SceneExport>, ExportError> {
        serialize(object)
    }
}
