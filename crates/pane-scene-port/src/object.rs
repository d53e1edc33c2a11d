// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene objects and their kinds.

use std::any::Any;
use std::fmt;

use crate::RenderWindow;

/// Name of a native scene-object type (e.g. `vtkRenderWindow`).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneKind(&'static str);

impl SceneKind {
    /// Declare a kind by its native type name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The native type name.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The built-in native render window kind.
pub const RENDER_WINDOW: SceneKind = SceneKind::new("vtkRenderWindow");

/// An object a pane can wrap and export.
///
/// Dispatch is by kind lineage: an object *is-a* `K` when `K` is its own kind
/// or one of its [`ancestors`](SceneObject::ancestors). A serializer
/// registered for a base kind therefore also serves derived kinds.
pub trait SceneObject: Any {
    /// The object's own kind.
    fn kind(&self) -> SceneKind;

    /// Kinds this object's kind derives from, nearest first.
    fn ancestors(&self) -> &'static [SceneKind] {
        &[]
    }

    /// Is-a test over the kind lineage.
    fn is_a(&self, kind: SceneKind) -> bool {
        self.kind() == kind || self.ancestors().contains(&kind)
    }

    /// The native render window behind this object, if it has one.
    fn as_render_window(&mut self) -> Option<&mut dyn RenderWindow> {
        None
    }
}

impl dyn SceneObject {
    /// Downcast to a concrete scene object type.
    pub fn downcast_ref<T: SceneObject>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    /// Downcast to a concrete scene object type, mutably.
    pub fn downcast_mut<T: SceneObject>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }
}
