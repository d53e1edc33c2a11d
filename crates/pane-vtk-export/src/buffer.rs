// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Borrowed views over native archiver buffers.
//!
//! Native wrappers hand out the archiver's internal buffer as a formatted
//! pointer string (`_00007f3a1c002000_p_void`) plus a byte length. This module
//! turns that pair into a bounded slice whose lifetime is tied to the archiver
//! borrow, so the bytes must be copied out before the archiver is released.

use pane_scene_port::ExportError;

const POINTER_PREFIX: char = '_';
const POINTER_SUFFIX: &str = "_p_void";

/// Native in-memory archiver that a scene exporter writes into.
///
/// # Safety
///
/// While `&self` is borrowed, [`buffer_address`](BufferedArchiver::buffer_address)
/// must name [`buffer_size`](BufferedArchiver::buffer_size) initialised bytes
/// that nothing writes to or frees. A size of zero may come with any address.
#[allow(unsafe_code)]
pub unsafe trait BufferedArchiver {
    /// Address of the internal buffer, formatted as `_<hex>_p_void`.
    fn buffer_address(&self) -> String;

    /// Length of the internal buffer in bytes.
    fn buffer_size(&self) -> usize;
}

/// Parse a `_<hex>_p_void` pointer string into an address.
pub fn parse_pointer(text: &str) -> Result<usize, ExportError> {
    let hex = text
        .strip_prefix(POINTER_PREFIX)
        .and_then(|rest| rest.strip_suffix(POINTER_SUFFIX))
        .ok_or_else(|| {
            ExportError::NativeExportFailure(format!("unrecognised buffer pointer `{text}`"))
        })?;
    usize::from_str_radix(hex, 16).map_err(|err| {
        ExportError::NativeExportFailure(format!("buffer pointer `{text}`: {err}"))
    })
}

/// Format an address the way native wrappers print `void*` values.
pub fn format_pointer(address: usize) -> String {
    format!("{POINTER_PREFIX}{address:016x}{POINTER_SUFFIX}")
}

/// Bytes of an archiver's buffer, borrowed for as long as the archiver is.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveView<'a> {
    bytes: &'a [u8],
}

impl<'a> ArchiveView<'a> {
    /// View the archiver's current buffer.
    pub fn new<A: BufferedArchiver + ?Sized>(archiver: &'a A) -> Result<Self, ExportError> {
        let len = archiver.buffer_size();
        if len == 0 {
            return Ok(Self { bytes: &[] });
        }
        if isize::try_from(len).is_err() {
            return Err(ExportError::NativeExportFailure(format!(
                "archiver reported an impossible buffer size ({len} bytes)"
            )));
        }
        let address = parse_pointer(&archiver.buffer_address())?;
        if address == 0 {
            return Err(ExportError::NativeExportFailure(
                "archiver reported a null buffer".into(),
            ));
        }
        if address.checked_add(len).is_none() {
            return Err(ExportError::NativeExportFailure(format!(
                "archiver buffer at {address:#x} ({len} bytes) wraps the address space"
            )));
        }
        let data = std::ptr::with_exposed_provenance::<u8>(address);
        // SAFETY: `BufferedArchiver` guarantees `len` initialised, unaliased-for-write
        // bytes at `address` while `archiver` is borrowed for 'a; `len` fits in isize,
        // and `address + len` does not wrap.
        #[allow(unsafe_code)]
        let bytes = unsafe { std::slice::from_raw_parts(data, len) };
        Ok(Self { bytes })
    }

    /// The borrowed bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy the bytes out so they outlive the archiver.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}
