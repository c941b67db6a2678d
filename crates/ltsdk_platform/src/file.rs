//! Disk-backed streams.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{StreamError, StreamResult};
use crate::stream::{InStream, OutStream};

/// Buffered reader over a file on disk.
pub struct FileInStream {
    /// Path, kept for diagnostics.
    path: PathBuf,
    reader: BufReader<File>,
    pos: u64,
    len: u64,
}

impl FileInStream {
    /// Opens `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> StreamResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let len = file.metadata()?.len();
        tracing::debug!("opened {} for reading ({} bytes)", path.display(), len);
        Ok(Self {
            path,
            reader: BufReader::new(file),
            pos: 0,
            len,
        })
    }

    /// Path this stream reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InStream for FileInStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let available = self.len.saturating_sub(self.pos);
        if buf.len() as u64 > available {
            return Err(StreamError::ShortRead {
                wanted: buf.len(),
                available,
                pos: self.pos,
            });
        }
        self.reader.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_to(&mut self, pos: u64) -> StreamResult<()> {
        if pos > self.len {
            return Err(StreamError::SeekOutOfRange { pos, len: self.len });
        }
        self.reader.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> u64 {
        self.len
    }
}

/// Buffered writer to a file on disk. Truncates on open.
pub struct FileOutStream {
    path: PathBuf,
    writer: BufWriter<File>,
    pos: u64,
}

impl FileOutStream {
    /// Creates or truncates `path` for writing.
    pub fn create(path: impl AsRef<Path>) -> StreamResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        tracing::debug!("opened {} for writing", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            pos: 0,
        })
    }

    /// Path this stream writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutStream for FileOutStream {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        self.writer.write_all(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_to(&mut self, pos: u64) -> StreamResult<()> {
        self.writer.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("test_stream_{tag}_{id}.bin"))
    }

    #[test]
    fn test_file_roundtrip() {
        let path = temp_path("roundtrip");
        {
            let mut out = FileOutStream::create(&path).unwrap();
            out.write(&[1, 2, 3]).unwrap();
            out.write_string("record").unwrap();
            out.flush().unwrap();
        }

        let mut input = FileInStream::open(&path).unwrap();
        assert_eq!(input.len(), 3 + 2 + 6);
        let mut head = [0u8; 3];
        input.read(&mut head).unwrap();
        assert_eq!(head, [1, 2, 3]);
        assert_eq!(input.read_string().unwrap(), "record");

        input.seek_to(1).unwrap();
        let mut one = [0u8; 1];
        input.read(&mut one).unwrap();
        assert_eq!(one, [2]);
        assert!(matches!(input.read(&mut [0u8; 64]), Err(StreamError::ShortRead { .. })));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FileInStream::open(temp_path("missing"));
        assert!(matches!(result, Err(StreamError::Io(_))));
    }
}
