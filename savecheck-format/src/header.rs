use std::io::Read;

use savecheck_core::{
    binary::{self, Deserializer},
    Deserialize, Serialize,
};
use thiserror::Error;

/// The fixed prefix of every save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Header {
    pub version: u32,
    pub compression_marker: u32,
}

impl Header {
    /// Size of the header on disk.
    pub const LEN: u64 = 8;
    /// Marker value of a chunked, zlib-compressed body.
    pub const COMPRESSED: u32 = 1;

    pub fn is_compressed(&self) -> bool {
        self.compression_marker == Self::COMPRESSED
    }
}

#[derive(Debug, Clone, Error)]
#[error("cannot read save header ({available} of {} bytes available)", Header::LEN)]
pub struct HeaderError {
    /// How many bytes the file actually had where the header should be.
    pub available: u64,
    #[source]
    pub source: binary::Error,
}

/// Reads the header from the start of the stream, advancing it by exactly [`Header::LEN`] bytes on
/// success.
pub fn read_header(deserializer: &mut Deserializer<impl Read>) -> Result<Header, HeaderError> {
    let start = deserializer.stream_position();
    deserializer
        .deserialize::<Header>()
        .map_err(|source| HeaderError {
            available: deserializer.stream_position() - start,
            source,
        })
}
