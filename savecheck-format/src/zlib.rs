//! Draining zlib (RFC 1950) streams without keeping their output.

use flate2::{Decompress, FlushDecompress, Status};
use thiserror::Error;

/// Output is decompressed into this much scratch space at a time and then thrown away.
const SCRATCH_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InflateError {
    #[error("zlib stream header needs 2 bytes, payload has {len}")]
    MissingHeader { len: usize },
    #[error("invalid zlib stream header {cmf:02x} {flg:02x}: {reason}")]
    InvalidHeader {
        cmf: u8,
        flg: u8,
        reason: &'static str,
    },
    #[error("corrupt deflate data at input byte {consumed}: {message}")]
    Corrupt { consumed: u64, message: String },
    #[error("stream is truncated: input ran out after {consumed} bytes")]
    Truncated { consumed: u64 },
    #[error("stream ended after {consumed} bytes, leaving {} of {len} bytes unconsumed", *len as u64 - consumed)]
    TrailingBytes { consumed: u64, len: usize },
}

impl InflateError {
    /// Whether the decompressor could not even be set up, as opposed to failing partway.
    pub fn is_stream_header_error(&self) -> bool {
        matches!(
            self,
            InflateError::MissingHeader { .. } | InflateError::InvalidHeader { .. }
        )
    }
}

/// Validates the two-byte zlib header: deflate method, window of at most 32 KiB, matching check
/// bits and no preset dictionary.
pub fn check_stream_header(payload: &[u8]) -> Result<(), InflateError> {
    let &[cmf, flg, ..] = payload else {
        return Err(InflateError::MissingHeader { len: payload.len() });
    };
    let invalid = |reason| Err(InflateError::InvalidHeader { cmf, flg, reason });
    if cmf & 0x0f != 8 {
        return invalid("compression method is not deflate");
    }
    if cmf >> 4 > 7 {
        return invalid("window size is larger than 32 KiB");
    }
    if ((u16::from(cmf) << 8) | u16::from(flg)) % 31 != 0 {
        return invalid("header check bits do not match");
    }
    if flg & 0x20 != 0 {
        return invalid("stream requires a preset dictionary");
    }
    Ok(())
}

/// Reusable zlib decoder that only reports whether a stream decodes.
pub struct Inflater {
    decompress: Decompress,
    scratch: Vec<u8>,
}

impl Inflater {
    pub fn new() -> Self {
        Self {
            decompress: Decompress::new(true),
            scratch: vec![0; SCRATCH_LEN],
        }
    }

    /// Decodes `payload` as exactly one complete zlib stream, discarding the output.
    ///
    /// Returns the decompressed size.
    pub fn drain(&mut self, payload: &[u8]) -> Result<u64, InflateError> {
        check_stream_header(payload)?;
        self.decompress.reset(true);

        loop {
            let consumed = self.decompress.total_in();
            let produced = self.decompress.total_out();
            let status = self
                .decompress
                .decompress(
                    &payload[consumed as usize..],
                    &mut self.scratch,
                    FlushDecompress::None,
                )
                .map_err(|error| InflateError::Corrupt {
                    consumed: self.decompress.total_in(),
                    message: error.to_string(),
                })?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if self.decompress.total_in() == consumed
                        && self.decompress.total_out() == produced
                    {
                        return Err(InflateError::Truncated { consumed });
                    }
                }
            }
        }

        let consumed = self.decompress.total_in();
        if consumed != payload.len() as u64 {
            return Err(InflateError::TrailingBytes {
                consumed,
                len: payload.len(),
            });
        }
        Ok(self.decompress.total_out())
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}
