// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pane model/update behaviour over an instance registry.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use pane_registry::SerializerRegistry;
use pane_scene_port::{ExportError, RENDER_WINDOW};
use pane_vtk::{
    vtkjs_file_serializer, ArrayRetention, JsonLinesSync, PaneConfig, VtkPane, VtkjsFile,
    VTKJS_FILE,
};
use pane_vtk_export::{
    render_window_serializer, MockActor, MockEngine, MockRenderWindow, RenderWindowExporter,
};
use pane_vtkjs_codec::{ArchiveBuilder, ArchiveDecoder};
use serde_json::Value;

/// Write an archive with one array per payload; returns the array ids.
fn write_archive(path: &Path, scene: &str, payloads: &[&[u8]]) -> Vec<String> {
    let mut builder = ArchiveBuilder::new();
    let ids = payloads.iter().map(|bytes| builder.array(bytes)).collect();
    fs::write(path, builder.scene(scene).finish().unwrap()).unwrap();
    ids
}

fn file_registry() -> SerializerRegistry {
    let mut registry = SerializerRegistry::new();
    registry.register(VTKJS_FILE, vtkjs_file_serializer(ArchiveDecoder::new()));
    registry
}

fn file_pane(path: &Path, retention: ArrayRetention) -> VtkPane<SerializerRegistry> {
    VtkPane::with_dispatch(Some(Box::new(VtkjsFile::new(path))), file_registry()).with_config(
        PaneConfig {
            array_retention: retention,
            ..PaneConfig::default()
        },
    )
}

#[test]
fn update_merges_arrays_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    let mut pane = file_pane(&path, ArrayRetention::Merge);

    let first = write_archive(&path, r#"{"v":1}"#, &[b"a", b"b"]);
    let payload = pane.model().unwrap();
    assert_eq!(payload.scene.as_deref(), Some(r#"{"v":1}"#));
    assert_eq!(payload.arrays.len(), 2);

    let second = write_archive(&path, r#"{"v":2}"#, &[b"b", b"c"]);
    let payload = pane.update().unwrap();
    assert_eq!(payload.scene.as_deref(), Some(r#"{"v":2}"#));
    assert_eq!(payload.arrays.len(), 3);
    for id in first.iter().chain(&second) {
        assert!(payload.arrays.contains_key(id), "{id}");
    }
}

#[test]
fn replace_retention_drops_stale_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    let mut pane = file_pane(&path, ArrayRetention::Replace);

    let first = write_archive(&path, "{}", &[b"a", b"b"]);
    pane.model().unwrap();
    let second = write_archive(&path, "{}", &[b"c"]);
    let payload = pane.update().unwrap();

    assert_eq!(payload.arrays.keys().cloned().collect::<Vec<_>>(), second);
    assert!(!payload.arrays.contains_key(&first[0]));
}

#[test]
fn model_replaces_cached_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    let mut pane = file_pane(&path, ArrayRetention::Merge);

    write_archive(&path, "{}", &[b"a", b"b"]);
    pane.model().unwrap();
    let second = write_archive(&path, "{}", &[b"c"]);
    pane.model().unwrap();

    assert_eq!(pane.arrays().keys().cloned().collect::<Vec<_>>(), second);
}

#[test]
fn failed_export_leaves_cache_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    let mut pane = file_pane(&path, ArrayRetention::Merge);

    write_archive(&path, r#"{"v":1}"#, &[b"a"]);
    let before = pane.model().unwrap();

    fs::remove_file(&path).unwrap();
    let err = pane.update().unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
    assert_eq!(pane.payload(), before);

    fs::write(&path, b"not a zip").unwrap();
    let err = pane.model().unwrap_err();
    assert!(matches!(err, ExportError::MalformedArchive(_)));
    assert_eq!(pane.payload(), before);
}

#[test]
fn absent_object_clears_scene() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    let mut pane = file_pane(&path, ArrayRetention::Merge);
    write_archive(&path, "{}", &[b"a"]);
    pane.model().unwrap();

    pane.set_object(None);
    let payload = pane.update().unwrap();
    assert_eq!(payload.scene, None);
    assert_eq!(payload.arrays.len(), 1);

    let payload = pane.model().unwrap();
    assert_eq!(payload.scene, None);
    assert!(payload.arrays.is_empty());
}

#[test]
fn render_window_exports_through_native_serializer() {
    let exporter = RenderWindowExporter::new(MockEngine::new());
    let registry = SerializerRegistry::with_native(render_window_serializer(exporter));
    let window = MockRenderWindow::new()
        .with_actor(MockActor::triangle("a", 0.0))
        .with_actor(MockActor::triangle("b", 5.0));
    let mut pane = VtkPane::with_dispatch(Some(Box::new(window)), registry);

    let payload = pane.model().unwrap();
    let scene: Value = serde_json::from_str(payload.scene.as_deref().unwrap()).unwrap();
    assert!(scene.is_object());
    assert_eq!(payload.arrays.len(), 3);
    assert!(pane.dispatch_mut().is_registered(RENDER_WINDOW));
}

#[test]
fn render_and_refresh_push_to_sync() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    write_archive(&path, "{}", &[b"a"]);
    let mut pane = file_pane(&path, ArrayRetention::Merge);
    pane.set_selection([1.0, 2.0, 3.0]);
    pane.set_enable_keybindings(true);

    let mut sync = JsonLinesSync::new(Vec::new());
    pane.render(&mut sync).unwrap();
    pane.refresh(&mut sync).unwrap();

    let text = String::from_utf8(sync.into_inner()).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "model");
    assert_eq!(lines[1]["kind"], "update");
    assert_eq!(lines[1]["payload"]["selection"], serde_json::json!([1.0, 2.0, 3.0]));
    assert_eq!(lines[1]["payload"]["enable_keybindings"], true);
    assert_eq!(lines[1]["payload"]["width"], 300);
}

#[test]
fn failed_render_pushes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut pane = file_pane(&dir.path().join("missing.vtkjs"), ArrayRetention::Merge);
    let mut sync = JsonLinesSync::new(Vec::new());
    assert!(pane.render(&mut sync).is_err());
    assert_eq!(sync.written(), 0);
}

struct Closed;

impl std::io::Write for Closed {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn render_succeeds_when_sink_drops_the_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.vtkjs");
    write_archive(&path, "{}", &[b"a"]);
    let mut pane = file_pane(&path, ArrayRetention::Merge);

    let mut sync = JsonLinesSync::new(Closed);
    pane.render(&mut sync).unwrap();
    pane.refresh(&mut sync).unwrap();
    assert_eq!(sync.written(), 0);
    assert_eq!(pane.scene(), Some("{}"));
}
