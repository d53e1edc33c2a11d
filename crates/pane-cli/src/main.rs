// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `vtkjs`: inspect vtk.js archives and emit VTK pane payloads.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pane_registry::SerializerRegistry;
use pane_vtk::{
    vtkjs_file_serializer, ConfigService, FsConfigStore, PaneConfig, VtkPane, VtkjsFile,
    VTKJS_FILE,
};
use pane_vtkjs_codec::ScenePolicy;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect vtk.js archives and emit VTK pane payloads")]
struct Args {
    /// Directory holding the pane config (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scene size and the array ids of an archive
    Inspect {
        /// Path to a .vtkjs archive
        archive: PathBuf,
        /// Keep the last scene entry instead of rejecting duplicates
        #[arg(long)]
        lenient: bool,
    },
    /// Export an archive as a viewer payload (JSON)
    Payload {
        /// Path to a .vtkjs archive
        archive: PathBuf,
        /// Enable viewer keybindings in the payload
        #[arg(long)]
        keybindings: bool,
        /// Write the payload here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the effective pane config
    Config {
        /// Write the effective config to the store
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let service = ConfigService::new(open_store(args.config_dir.as_deref())?);
    let config = service.pane_config().context("failed to load pane config")?;

    match args.cmd {
        Command::Inspect { archive, lenient } => inspect(&archive, lenient, config),
        Command::Payload {
            archive,
            keybindings,
            out,
        } => payload(&archive, keybindings, out.as_deref(), config),
        Command::Config { init } => {
            if init {
                service
                    .save_pane_config(&config)
                    .context("failed to write pane config")?;
                info!("pane config written");
            }
            let text = serde_json::to_string_pretty(&config)?;
            writeln!(io::stdout().lock(), "{text}")?;
            Ok(())
        }
    }
}

fn open_store(dir: Option<&Path>) -> Result<FsConfigStore> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    store.context("failed to open config store")
}

fn inspect(archive: &Path, lenient: bool, mut config: PaneConfig) -> Result<()> {
    if lenient {
        config.scene_policy = ScenePolicy::LastWins;
    }
    let export = VtkjsFile::new(archive)
        .export(&config.decoder())
        .with_context(|| format!("failed to decode {}", archive.display()))?;
    info!(archive = %archive.display(), arrays = export.arrays.len(), "decoded");

    let mut out = io::stdout().lock();
    match &export.scene {
        Some(scene) => writeln!(out, "scene: {} bytes", scene.len())?,
        None => writeln!(out, "scene: none")?,
    }
    writeln!(out, "arrays: {}", export.arrays.len())?;
    for (id, payload) in &export.arrays {
        writeln!(out, "  {id}  {} base64 chars", payload.len())?;
    }
    Ok(())
}

fn payload(
    archive: &Path,
    keybindings: bool,
    out: Option<&Path>,
    config: PaneConfig,
) -> Result<()> {
    let mut registry = SerializerRegistry::new();
    registry.register(VTKJS_FILE, vtkjs_file_serializer(config.decoder()));

    let mut pane = VtkPane::with_dispatch(Some(Box::new(VtkjsFile::new(archive))), registry)
        .with_config(config);
    if keybindings {
        pane.set_enable_keybindings(true);
    }
    let payload = pane
        .model()
        .with_context(|| format!("failed to export {}", archive.display()))?;
    let text = serde_json::to_string_pretty(&payload)?;

    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), arrays = payload.arrays.len(), "payload written");
        }
        None => writeln!(io::stdout().lock(), "{text}")?,
    }
    Ok(())
}
