// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! vtk.js archive codec for VTK panes.
//!
//! This crate provides:
//! - [`ArchiveDecoder`]: zip bytes → scene JSON + base64 array payloads
//! - [`ArchiveBuilder`]: scene JSON + arrays → zip bytes
//!
//! # Design
//!
//! Archive handling is kept apart from the scene port contract, so the
//! contract stays free of zip and base64.

mod archive;
mod builder;

pub use archive::{decode_archive, ArchiveDecoder, ScenePolicy, DEFAULT_MAX_ENTRY_BYTES};
pub use builder::{array_id, ArchiveBuilder, EncodeError, ARRAY_DIR, SCENE_ENTRY};
