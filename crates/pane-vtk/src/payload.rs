// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outbound viewer payload and the model-sync port.

use std::io::Write;

use pane_scene_port::ArrayMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Camera state as the viewer reports it. Opaque to the pane.
pub type CameraState = Map<String, Value>;

/// Properties of the browser-side VTK plot model.
///
/// Versionless: compatibility is the viewer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtkPlotPayload {
    /// Serialized vtk.js scene, `None` when there is nothing to render yet.
    pub scene: Option<String>,
    /// Array id → base64 payload.
    pub arrays: ArrayMap,
    /// Camera state, if the viewer has reported one.
    pub camera: Option<CameraState>,
    /// Picked point `[x, y, z]`.
    pub selection: [f64; 3],
    /// Whether the viewer binds keyboard shortcuts.
    pub enable_keybindings: bool,
    /// Whether the viewer appends to its scene instead of replacing it.
    pub append: bool,
    /// Viewer width in pixels.
    pub width: u32,
    /// Viewer height in pixels.
    pub height: u32,
}

/// Port to the layer that mirrors payloads into the browser model.
pub trait ModelSync {
    /// Publish a full model for a first render.
    fn push_model(&mut self, payload: &VtkPlotPayload);
    /// Publish changed properties after a re-export.
    fn push_update(&mut self, payload: &VtkPlotPayload);
}

/// Message kind written by [`JsonLinesSync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncKind {
    /// Full model.
    Model,
    /// Property update.
    Update,
}

#[derive(Serialize)]
struct Envelope<'a> {
    kind: SyncKind,
    payload: &'a VtkPlotPayload,
}

/// Writes each pushed payload as one JSON line: `{"kind": .., "payload": ..}`.
///
/// Write failures are logged and dropped; the port is fire-and-forget.
#[derive(Debug)]
pub struct JsonLinesSync<W> {
    out: W,
    written: usize,
}

impl<W: Write> JsonLinesSync<W> {
    /// Sink over `out`.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Number of lines written successfully.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn push(&mut self, kind: SyncKind, payload: &VtkPlotPayload) {
        let result = serde_json::to_writer(&mut self.out, &Envelope { kind, payload })
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.written += 1,
            Err(err) => tracing::warn!(?kind, %err, "failed to write payload"),
        }
    }
}

impl<W: Write> ModelSync for JsonLinesSync<W> {
    fn push_model(&mut self, payload: &VtkPlotPayload) {
        self.push(SyncKind::Model, payload);
    }

    fn push_update(&mut self, payload: &VtkPlotPayload) {
        self.push(SyncKind::Update, payload);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn payload() -> VtkPlotPayload {
        let mut arrays = ArrayMap::new();
        arrays.insert("0123456789abcdef0123456789abcdef".into(), "AQI=".into());
        VtkPlotPayload {
            scene: Some("{}".into()),
            arrays,
            camera: None,
            selection: [0.0, 0.0, 0.0],
            enable_keybindings: false,
            append: false,
            width: 300,
            height: 300,
        }
    }

    #[test]
    fn payload_field_names_match_viewer_model() {
        let value = serde_json::to_value(payload()).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            "scene",
            "arrays",
            "camera",
            "selection",
            "enable_keybindings",
            "append",
            "width",
            "height",
        ] {
            assert!(object.contains_key(field), "{field}");
        }
        assert_eq!(value["arrays"]["0123456789abcdef0123456789abcdef"], "AQI=");
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_dropped() {
        let mut sync = JsonLinesSync::new(Closed);
        sync.push_model(&payload());
        sync.push_update(&payload());
        assert_eq!(sync.written(), 0);
    }

    #[test]
    fn json_lines_writes_one_line_per_push() {
        let mut sync = JsonLinesSync::new(Vec::new());
        sync.push_model(&payload());
        sync.push_update(&payload());
        assert_eq!(sync.written(), 2);

        let text = String::from_utf8(sync.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["kind"], "model");
        assert_eq!(second["kind"], "update");
        assert_eq!(first["payload"]["scene"], "{}");
    }
}
