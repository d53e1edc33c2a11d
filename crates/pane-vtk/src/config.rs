// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pane configuration and its storage port.

use pane_vtkjs_codec::{ArchiveDecoder, ScenePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the pane config is stored under.
pub const CONFIG_KEY: &str = "vtk-pane";

/// What `update` does with arrays cached from earlier exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayRetention {
    /// Keep cached arrays and add or overwrite with the new ones.
    #[default]
    Merge,
    /// Drop cached arrays and keep only the new ones.
    Replace,
}

/// Pane settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    /// Handling of archives with more than one scene entry.
    pub scene_policy: ScenePolicy,
    /// Array cache behaviour across updates.
    pub array_retention: ArrayRetention,
    /// Initial keybinding state for new panes.
    pub enable_keybindings: bool,
    /// Viewer width in pixels.
    pub width: u32,
    /// Viewer height in pixels.
    pub height: u32,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            scene_policy: ScenePolicy::Strict,
            array_retention: ArrayRetention::Merge,
            enable_keybindings: false,
            width: 300,
            height: 300,
        }
    }
}

impl PaneConfig {
    /// Archive decoder matching `scene_policy`.
    pub fn decoder(&self) -> ArchiveDecoder {
        ArchiveDecoder::with_policy(self.scene_policy)
    }
}

/// Where pane config blobs live. Keys are logical names such as
/// [`CONFIG_KEY`].
pub trait ConfigStore {
    /// Raw bytes under `key`, or [`ConfigError::NotFound`].
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace the bytes under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failure to read or write pane config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("pane config not found")]
    NotFound,
    /// The store could not be read or written.
    #[error("pane config i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The stored blob is not valid pane config JSON.
    #[error("pane config json: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure.
    #[error("pane config: {0}")]
    Other(String),
}

/// Loads and saves [`PaneConfig`] as JSON through a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// The stored pane config. Missing or empty blobs yield defaults; absent
    /// fields take their default values.
    pub fn pane_config(&self) -> Result<PaneConfig, ConfigError> {
        match self.store.load_raw(CONFIG_KEY) {
            Ok(bytes) if bytes.is_empty() => Ok(PaneConfig::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(ConfigError::NotFound) => Ok(PaneConfig::default()),
            Err(err) => Err(err),
        }
    }

    /// Persist `config` as pretty JSON.
    pub fn save_pane_config(&self, config: &PaneConfig) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(config)?;
        self.store.save_raw(CONFIG_KEY, &data)
    }
}
