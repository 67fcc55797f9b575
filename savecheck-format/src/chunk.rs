//! Results of walking a save's chunk stream.

use std::fmt;

use savecheck_core::binary;
use thiserror::Error;

use crate::zlib::InflateError;

pub const MIB: u32 = 1024 * 1024;

/// Chunks declaring more than this many whole MiB are rejected before anything is allocated.
pub const MAX_CHUNK_MIB: u32 = 10;

/// How the number of chunks in a valid save is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkCount {
    /// Chunks that were actually decompressed.
    #[default]
    Decoded,
    /// Loop iterations, including the final one that only found the end of the file. This is one
    /// more than [`ChunkCount::Decoded`] and matches what older versions of the tool printed.
    Iterations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSummary {
    pub chunks_decoded: u32,
    pub iterations: u32,
    /// Bytes consumed from the file, header included. Equal to the file length.
    pub bytes_read: u64,
    pub decompressed_bytes: u64,
}

impl ChunkSummary {
    pub fn reported_count(&self, count: ChunkCount) -> u32 {
        match count {
            ChunkCount::Decoded => self.chunks_decoded,
            ChunkCount::Iterations => self.iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressionPhase {
    /// The decompressor could not be set up from the payload's stream header.
    StreamHeader,
    /// Decoding failed partway through the payload.
    Body,
}

impl fmt::Display for DecompressionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompressionPhase::StreamHeader => f.write_str("read failed"),
            DecompressionPhase::Body => f.write_str("compression error"),
        }
    }
}

/// Why a chunk could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("truncated length prefix: got {available} of 4 bytes")]
    TruncatedLengthPrefix { available: usize },
    #[error("memory threshold exceeded: tried to read {} MB", declared_length / MIB)]
    ThresholdExceeded { declared_length: u32 },
    #[error("expected {declared_length} bytes, got {actual}")]
    ShortRead { declared_length: u32, actual: usize },
    #[error("{phase}: {source}")]
    Decompression {
        phase: DecompressionPhase,
        declared_length: u32,
        source: InflateError,
    },
    #[error("I/O error: {0}")]
    Io(#[source] binary::Error),
}

/// Failure classes, one per way a chunk stream can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    HeaderRead,
    ThresholdExceeded,
    ShortRead,
    Decompression,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::HeaderRead => "HeaderReadError",
            FailureKind::ThresholdExceeded => "ThresholdExceeded",
            FailureKind::ShortRead => "ShortRead",
            FailureKind::Decompression => "DecompressionError",
            FailureKind::Io => "IoError",
        })
    }
}

impl ChunkError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ChunkError::TruncatedLengthPrefix { .. } => FailureKind::HeaderRead,
            ChunkError::ThresholdExceeded { .. } => FailureKind::ThresholdExceeded,
            ChunkError::ShortRead { .. } => FailureKind::ShortRead,
            ChunkError::Decompression { .. } => FailureKind::Decompression,
            ChunkError::Io(_) => FailureKind::Io,
        }
    }

    pub(crate) fn decompression(declared_length: u32, source: InflateError) -> Self {
        let phase = if source.is_stream_header_error() {
            DecompressionPhase::StreamHeader
        } else {
            DecompressionPhase::Body
        };
        ChunkError::Decompression {
            phase,
            declared_length,
            source,
        }
    }
}

/// The first chunk that could not be decoded, located within the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// 1-based.
    pub chunk_index: u32,
    /// Offset of the chunk's length prefix.
    pub start_offset: u64,
    pub bytes_read: u64,
    pub bytes_remaining: u64,
    pub error: ChunkError,
}

impl ChunkFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Success(ChunkSummary),
    Failure(ChunkFailure),
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success(_))
    }
}
