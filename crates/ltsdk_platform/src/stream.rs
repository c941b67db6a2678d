//! # Streams
//!
//! Byte stream traits consumed by the database and serialization code, plus
//! in-memory implementations.
//!
//! Any backing store (disk file, memory buffer, socket) plugs in by
//! implementing [`InStream`] or [`OutStream`].

use crate::error::{StreamError, StreamResult};

/// A readable byte stream.
pub trait InStream {
    /// Fills `buf` completely or fails with [`StreamError::ShortRead`].
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()>;

    /// True if [`InStream::seek_to`] is supported.
    fn can_seek(&self) -> bool;

    /// Moves the read position to `pos` bytes from the start.
    fn seek_to(&mut self, pos: u64) -> StreamResult<()>;

    /// Current read position.
    fn pos(&self) -> u64;

    /// Total stream length in bytes.
    fn len(&self) -> u64;

    /// True if the stream holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a string stored as a little-endian `u16` byte count followed by
    /// the raw bytes, no terminator.
    fn read_string(&mut self) -> StreamResult<String> {
        let mut len = [0u8; 2];
        self.read(&mut len)?;
        let mut bytes = vec![0u8; usize::from(u16::from_le_bytes(len))];
        self.read(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| StreamError::InvalidUtf8)
    }
}

/// A writable byte stream.
pub trait OutStream {
    /// Writes all of `buf`.
    fn write(&mut self, buf: &[u8]) -> StreamResult<()>;

    /// True if [`OutStream::seek_to`] is supported.
    fn can_seek(&self) -> bool;

    /// Moves the write position to `pos` bytes from the start.
    fn seek_to(&mut self, pos: u64) -> StreamResult<()>;

    /// Current write position.
    fn pos(&self) -> u64;

    /// Pushes buffered bytes to the backing store.
    fn flush(&mut self) -> StreamResult<()> {
        Ok(())
    }

    /// Writes a string as a little-endian `u16` byte count and raw bytes.
    fn write_string(&mut self, s: &str) -> StreamResult<()> {
        let len = u16::try_from(s.len()).map_err(|_| StreamError::StringTooLong(s.len()))?;
        self.write(&len.to_le_bytes())?;
        self.write(s.as_bytes())
    }
}

/// Reads from an owned byte buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryInStream {
    data: Vec<u8>,
    pos: usize,
    seekable: bool,
}

impl MemoryInStream {
    /// Creates a seekable stream over `data`.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            seekable: true,
        }
    }

    /// Creates a forward-only stream, the way a pipe or socket behaves.
    #[must_use]
    pub fn unseekable(data: impl Into<Vec<u8>>) -> Self {
        Self {
            seekable: false,
            ..Self::new(data)
        }
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl InStream for MemoryInStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let available = self.data.len() - self.pos;
        if buf.len() > available {
            return Err(StreamError::ShortRead {
                wanted: buf.len(),
                available: available as u64,
                pos: self.pos as u64,
            });
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }

    fn can_seek(&self) -> bool {
        self.seekable
    }

    fn seek_to(&mut self, pos: u64) -> StreamResult<()> {
        if !self.seekable {
            return Err(StreamError::NotSeekable);
        }
        let len = self.data.len() as u64;
        if pos > len {
            return Err(StreamError::SeekOutOfRange { pos, len });
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Writes into a growable byte buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryOutStream {
    data: Vec<u8>,
    pos: usize,
}

impl MemoryOutStream {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the stream, returning the written bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Turns the written bytes into a readable stream.
    #[must_use]
    pub fn into_in_stream(self) -> MemoryInStream {
        MemoryInStream::new(self.data)
    }
}

impl OutStream for MemoryOutStream {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(())
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_to(&mut self, pos: u64) -> StreamResult<()> {
        let len = self.data.len() as u64;
        if pos > len {
            return Err(StreamError::SeekOutOfRange { pos, len });
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos as u64
    }
}
