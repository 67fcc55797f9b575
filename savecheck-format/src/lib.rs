//! Structural validation of chunked, zlib-compressed save files.
//!
//! A save starts with a [`Header`]. If it is compressed, the rest of the file is a sequence of
//! chunks, each a little-endian `u32` length followed by that many bytes of one self-contained
//! zlib stream. Validation decodes every chunk without keeping the output and reports the first
//! place where the stream breaks.

use std::io::Read;

use savecheck_core::binary::Deserializer;
use tracing::debug;

pub mod chunk;
pub mod compression;
pub mod header;
pub mod version;
pub mod zlib;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use chunk::{
    ChunkCount, ChunkError, ChunkFailure, ChunkSummary, DecompressionPhase, FailureKind,
    ValidationOutcome,
};
pub use header::{read_header, Header, HeaderError};
pub use version::{SaveVersions, VersionDescriptor, VersionInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCheck {
    pub header: Header,
    pub version: VersionInfo,
    pub body: SaveBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveBody {
    /// The compression marker is not [`Header::COMPRESSED`]; no chunks were looked at.
    NotCompressed,
    Chunks(ValidationOutcome),
}

/// Checks a save from its first byte: header, version lookup, then the chunk stream if there is
/// one.
pub fn check_save(
    deserializer: &mut Deserializer<impl Read>,
    versions: &impl VersionDescriptor,
) -> Result<SaveCheck, HeaderError> {
    let header = read_header(deserializer)?;
    let version = versions.describe(header.version);
    debug!(
        version = header.version,
        compression_marker = header.compression_marker,
        known = version.known,
        "Read save header"
    );

    let body = if header.is_compressed() {
        SaveBody::Chunks(compression::validate_chunks(deserializer))
    } else {
        SaveBody::NotCompressed
    };
    Ok(SaveCheck {
        header,
        version,
        body,
    })
}
