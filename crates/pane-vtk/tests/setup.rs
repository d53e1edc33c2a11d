// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem config store and process-wide installation.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use pane_registry::is_registered;
use pane_scene_port::{ExportError, RENDER_WINDOW};
use pane_vtk::{
    install, ArrayRetention, ConfigService, ConfigStore, FsConfigStore, PaneConfig, VtkPane,
    VtkjsFile, CONFIG_KEY, VTKJS_FILE,
};
use pane_vtk_export::{MockActor, MockEngine, MockRenderWindow};
use pane_vtkjs_codec::{ArchiveBuilder, ScenePolicy};

#[test]
fn fs_store_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
    assert_eq!(service.pane_config().unwrap(), PaneConfig::default());
}

#[test]
fn fs_store_round_trips_pane_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::at(dir.path().join("nested")).unwrap();
    let path = store.path_for(CONFIG_KEY);
    let service = ConfigService::new(store);

    let config = PaneConfig {
        scene_policy: ScenePolicy::LastWins,
        array_retention: ArrayRetention::Replace,
        enable_keybindings: true,
        width: 800,
        height: 600,
    };
    service.save_pane_config(&config).unwrap();

    assert!(path.ends_with("vtk-pane.json"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#""scene_policy": "last-wins""#));
    assert_eq!(service.pane_config().unwrap(), config);
    assert_eq!(service.into_inner().load_raw(CONFIG_KEY).unwrap(), text.into_bytes());
}

// Only test in this binary that touches the process-wide registry.
#[test]
fn install_wires_the_global_registry() {
    let config = PaneConfig {
        scene_policy: ScenePolicy::LastWins,
        ..PaneConfig::default()
    };
    install(MockEngine::new(), &config);
    assert!(is_registered(VTKJS_FILE));
    assert!(!is_registered(RENDER_WINDOW));

    let window = MockRenderWindow::new().with_actor(MockActor::triangle("tri", 0.0));
    let mut pane = VtkPane::new(Some(Box::new(window))).with_config(config.clone());
    let payload = pane.model().unwrap();
    assert!(payload.scene.is_some());
    assert_eq!(payload.arrays.len(), 2);
    assert!(is_registered(RENDER_WINDOW));

    // Lenient policy reaches the file serializer: two scenes, last one kept.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.vtkjs");
    let archive = ArchiveBuilder::new()
        .entry("index.json", "first")
        .entry("extra.json", "second")
        .finish()
        .unwrap();
    fs::write(&path, archive).unwrap();
    pane.set_object(Some(Box::new(VtkjsFile::new(&path))));
    let payload = pane.update().unwrap();
    assert_eq!(payload.scene.as_deref(), Some("second"));
    assert_eq!(payload.arrays.len(), 2);

    pane.set_object(Some(Box::new(VtkjsFile::new(dir.path().join("gone.vtkjs")))));
    assert!(matches!(pane.model(), Err(ExportError::Io(_))));
    assert_eq!(pane.scene(), Some("second"));
}
