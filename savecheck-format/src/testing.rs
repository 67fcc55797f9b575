//! Builders for save images used across the crate's tests.

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use savecheck_core::binary::serialize;

use crate::header::Header;

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Deterministic, mildly compressible bytes.
pub fn sample_data(len: usize, seed: u64) -> Vec<u8> {
    const WORDS: &[&[u8]] = &[
        b"dwarf ", b"magma ", b"goblin ", b"barrel ", b"plump helmet ", b"forgotten beast ",
        b"\x00\x01\x02\x03", b"\xff\xfe",
    ];
    let mut state = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.extend_from_slice(WORDS[(state % WORDS.len() as u64) as usize]);
        out.push(state as u8);
    }
    out.truncate(len);
    out
}

/// Byte-level save file builder.
#[derive(Debug, Clone)]
pub struct SaveImage {
    bytes: Vec<u8>,
}

impl SaveImage {
    pub fn new(version: u32, compression_marker: u32) -> Self {
        Self {
            bytes: serialize(&Header {
                version,
                compression_marker,
            })
            .unwrap(),
        }
    }

    pub fn compressed() -> Self {
        Self::new(1710, Header::COMPRESSED)
    }

    /// Appends a chunk holding `data` compressed with zlib.
    pub fn chunk(self, data: &[u8]) -> Self {
        self.raw_chunk(&zlib(data))
    }

    /// Appends a length prefix followed by `payload` verbatim.
    pub fn raw_chunk(self, payload: &[u8]) -> Self {
        self.length_prefix(payload.len() as u32).bytes(payload)
    }

    pub fn length_prefix(self, declared_length: u32) -> Self {
        self.bytes(&declared_length.to_le_bytes())
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
