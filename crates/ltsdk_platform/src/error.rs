//! # Stream Error Types

use thiserror::Error;

/// Errors raised by stream reads, writes and seeks.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Fewer bytes were available than requested.
    #[error("short read: wanted {wanted} bytes at offset {pos}, {available} available")]
    ShortRead {
        /// Bytes requested.
        wanted: usize,
        /// Bytes left in the stream.
        available: u64,
        /// Stream position of the read.
        pos: u64,
    },

    /// Seek requested on a stream that cannot seek.
    #[error("stream is not seekable")]
    NotSeekable,

    /// Seek target lies past the end of the stream.
    #[error("seek to {pos} is past the end of the stream ({len} bytes)")]
    SeekOutOfRange {
        /// Requested position.
        pos: u64,
        /// Stream length.
        len: u64,
    },

    /// String too long for its 16-bit length prefix.
    #[error("string of {0} bytes does not fit a 16-bit length prefix")]
    StringTooLong(usize),

    /// String bytes were not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
