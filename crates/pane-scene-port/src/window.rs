// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Native render window capability.

use std::any::Any;

use crate::ExportError;

/// A native render window that can be driven for export.
///
/// Engine bindings downcast `&mut dyn RenderWindow` to their own handle type
/// through `Any` to reach the native object.
pub trait RenderWindow: Any {
    /// Switch off-screen rendering on or off.
    fn set_off_screen_rendering(&mut self, enabled: bool);

    /// Whether off-screen rendering is on.
    fn off_screen_rendering(&self) -> bool;

    /// Whether the window has a render target to draw into.
    fn has_render_target(&self) -> bool;

    /// Force a render pass. Blocks until the pass completes.
    fn render(&mut self) -> Result<(), ExportError>;
}
