use std::io::Read;

use savecheck_core::binary::Deserializer;
use tracing::{debug, trace};

use crate::{
    chunk::{ChunkError, ChunkFailure, ChunkSummary, ValidationOutcome, MAX_CHUNK_MIB, MIB},
    zlib::Inflater,
};

struct DecodedChunk {
    declared_length: u32,
    decompressed_len: u64,
}

/// Walks the chunk stream that follows a compressed save's header, decoding every chunk and
/// stopping at the first one that fails.
///
/// The stream is valid only if it ends exactly where a chunk's length prefix would start.
pub fn validate_chunks(deserializer: &mut Deserializer<impl Read>) -> ValidationOutcome {
    let mut inflater = Inflater::new();
    let mut chunks_decoded = 0;
    let mut decompressed_bytes = 0;
    let mut chunk_index = 0;
    loop {
        chunk_index += 1;
        let start_offset = deserializer.stream_position();

        match next_chunk(deserializer, &mut inflater) {
            Ok(Some(chunk)) => {
                trace!(
                    chunk_index,
                    start_offset,
                    declared_length = chunk.declared_length,
                    decompressed_len = chunk.decompressed_len,
                    "Decoded chunk"
                );
                chunks_decoded += 1;
                decompressed_bytes += chunk.decompressed_len;
            }
            Ok(None) => {
                debug!(chunks_decoded, decompressed_bytes, "Reached end of chunk stream");
                return ValidationOutcome::Success(ChunkSummary {
                    chunks_decoded,
                    iterations: chunk_index,
                    bytes_read: deserializer.stream_position(),
                    decompressed_bytes,
                });
            }
            Err(error) => {
                debug!(chunk_index, start_offset, %error, "Chunk failed");
                return ValidationOutcome::Failure(ChunkFailure {
                    chunk_index,
                    start_offset,
                    bytes_read: deserializer.stream_position(),
                    bytes_remaining: deserializer.remaining(),
                    error,
                });
            }
        }
    }
}

/// Reads and decodes one chunk. `None` means the stream ended cleanly before a length prefix.
fn next_chunk(
    deserializer: &mut Deserializer<impl Read>,
    inflater: &mut Inflater,
) -> Result<Option<DecodedChunk>, ChunkError> {
    let mut prefix = [0; 4];
    match deserializer.read_up_to(&mut prefix).map_err(ChunkError::Io)? {
        0 => return Ok(None),
        4 => (),
        available => return Err(ChunkError::TruncatedLengthPrefix { available }),
    }

    let declared_length = u32::from_le_bytes(prefix);
    if declared_length / MIB > MAX_CHUNK_MIB {
        return Err(ChunkError::ThresholdExceeded { declared_length });
    }

    let mut payload = vec![0; declared_length as usize];
    let actual = deserializer
        .read_up_to(&mut payload)
        .map_err(ChunkError::Io)?;
    if actual < payload.len() {
        return Err(ChunkError::ShortRead {
            declared_length,
            actual,
        });
    }

    let decompressed_len = inflater
        .drain(&payload)
        .map_err(|source| ChunkError::decompression(declared_length, source))?;
    Ok(Some(DecodedChunk {
        declared_length,
        decompressed_len,
    }))
}
