use std::{
    io::{self, Cursor, Read, Seek, SeekFrom},
    ops::Deref,
};

use crate::binary::{Error, ErrorKind, ResultContextExt, ResultMapToBinaryErrorExt};

/// Reader wrapper that tracks how many bytes have been consumed and how long the stream is.
///
/// The position only ever moves forward, by exactly the number of bytes the underlying reader
/// handed out - including on failed reads.
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<R> {
    stream_len: u64,
    stream_position: u64,
    stream: R,
}

impl<R> Deserializer<R> {
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    pub fn stream_position(&self) -> u64 {
        self.stream_position
    }

    /// Number of bytes between the current position and the end of the stream.
    pub fn remaining(&self) -> u64 {
        self.stream_len.saturating_sub(self.stream_position)
    }

    /// Reads as many bytes as the stream provides, up to `out_bytes.len()`.
    ///
    /// Returns the number of bytes read; anything less than the buffer length means the stream
    /// ended. `0` means the stream was already at its end.
    pub fn read_up_to(&mut self, out_bytes: &mut [u8]) -> Result<usize, Error>
    where
        R: Read,
    {
        let mut filled = 0;
        while filled < out_bytes.len() {
            match self.stream.read(&mut out_bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.stream_position += n as u64;
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    return Err(ErrorKind::Deserialize.make(error.to_string()))
                        .with_context(|| format!("at stream position {:08x}", self.stream_position))
                }
            }
        }
        Ok(filled)
    }

    pub fn read_bytes(&mut self, out_bytes: &mut [u8]) -> Result<(), Error>
    where
        R: Read,
    {
        let start = self.stream_position;
        let read = self.read_up_to(out_bytes)?;
        if read < out_bytes.len() {
            return Err(ErrorKind::Deserialize.make(format!(
                "unexpected end of stream ({read} of {} bytes available)",
                out_bytes.len()
            )))
            .with_context(|| format!("at stream position {start:08x}"));
        }
        Ok(())
    }
}

impl<T> Deserializer<Cursor<T>>
where
    T: Deref<Target = [u8]>,
{
    pub fn from_buffer(buffer: T) -> Self {
        Self::from(Cursor::new(buffer))
    }
}

impl<R> Deserializer<R>
where
    R: Read + Seek,
{
    pub fn new(mut reader: R) -> Result<Self, Error> {
        let position = reader
            .stream_position()
            .map_err_to_binary_error(ErrorKind::Deserialize)
            .context("cannot obtain current stream position")?;
        let stream_length = reader
            .seek(SeekFrom::End(0))
            .map_err_to_binary_error(ErrorKind::Deserialize)
            .context("cannot obtain stream length")?;
        reader
            .seek(SeekFrom::Start(position))
            .map_err_to_binary_error(ErrorKind::Deserialize)
            .context("cannot go back to previous stream position after obtaining its length")?;
        Ok(Self {
            stream_len: stream_length,
            stream_position: position,
            stream: reader,
        })
    }
}

impl<T> From<Cursor<T>> for Deserializer<Cursor<T>>
where
    T: Deref<Target = [u8]>,
{
    fn from(cursor: Cursor<T>) -> Self {
        Self {
            stream_len: cursor.get_ref().len() as u64,
            stream_position: cursor.position(),
            stream: cursor,
        }
    }
}
