//! Request body storage.
//!
//! A body lands either in memory or in an anonymous temporary file,
//! chosen once from the declared Content-Length. Both variants expose the
//! same `Read + Write + Seek` surface, so callers read the body the same way
//! regardless of where it was stored.
//!
//! Disk-backed sinks never have a visible path: the default
//! [`TempFileSpill`] uses `tempfile::tempfile()`, which unlinks the file as
//! part of creating it. The storage is released when the sink is dropped.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Creates the file backing a disk-spilled body.
///
/// Implementations must return a file that is already detached from the
/// file-system namespace (or will be removed when the handle closes), so
/// that the parser is the only owner of the storage.
pub trait SpillFactory: fmt::Debug + Send + Sync {
    fn create(&self) -> io::Result<File>;
}

/// Default spill factory backed by `tempfile`.
#[derive(Debug, Clone, Default)]
pub struct TempFileSpill {
    dir: Option<PathBuf>,
}

impl TempFileSpill {
    /// Spill into the system temporary directory.
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Spill into `dir` instead of the system temporary directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl SpillFactory for TempFileSpill {
    fn create(&self) -> io::Result<File> {
        match &self.dir {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        }
    }
}

/// Storage for a request body.
pub enum BodySink {
    /// Body held in a growable buffer.
    Memory(Cursor<Vec<u8>>),
    /// Body spilled to an anonymous temporary file.
    Disk { file: File, len: u64, pos: u64 },
}

impl BodySink {
    /// An in-memory sink with room for `capacity` bytes.
    pub fn memory(capacity: usize) -> Self {
        Self::Memory(Cursor::new(Vec::with_capacity(capacity)))
    }

    /// A disk sink writing into `file`, which must be empty.
    pub fn disk(file: File) -> Self {
        Self::Disk {
            file,
            len: 0,
            pos: 0,
        }
    }

    /// Number of body bytes stored so far.
    pub fn len(&self) -> u64 {
        match self {
            Self::Memory(cursor) => cursor.get_ref().len() as u64,
            Self::Disk { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the body was spilled to disk.
    pub fn is_spilled(&self) -> bool {
        matches!(self, Self::Disk { .. })
    }

    /// Read everything from the current position to the end.
    pub fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.read_to_end(&mut out)?;
        Ok(out)
    }
}

impl fmt::Debug for BodySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(cursor) => f
                .debug_struct("Memory")
                .field("len", &cursor.get_ref().len())
                .field("pos", &cursor.position())
                .finish(),
            Self::Disk { len, pos, .. } => f
                .debug_struct("Disk")
                .field("len", len)
                .field("pos", pos)
                .finish(),
        }
    }
}

impl Write for BodySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Memory(cursor) => cursor.write(buf),
            Self::Disk { file, len, pos } => {
                let n = file.write(buf)?;
                *pos += n as u64;
                *len = (*len).max(*pos);
                Ok(n)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Memory(cursor) => cursor.flush(),
            Self::Disk { file, .. } => file.flush(),
        }
    }
}

impl Read for BodySink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Memory(cursor) => cursor.read(buf),
            Self::Disk { file, pos, .. } => {
                let n = file.read(buf)?;
                *pos += n as u64;
                Ok(n)
            }
        }
    }
}

impl Seek for BodySink {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Memory(cursor) => cursor.seek(target),
            Self::Disk { file, pos, .. } => {
                *pos = file.seek(target)?;
                Ok(*pos)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_write_rewind_read() {
        let mut sink = BodySink::memory(5);
        sink.write_all(b"stuff").unwrap();
        assert_eq!(sink.len(), 5);
        assert!(!sink.is_spilled());

        sink.rewind().unwrap();
        assert_eq!(sink.read_to_vec().unwrap(), b"stuff");
    }

    #[test]
    fn disk_sink_write_rewind_read() {
        let file = TempFileSpill::new().create().unwrap();
        let mut sink = BodySink::disk(file);
        sink.write_all(b"hello ").unwrap();
        sink.write_all(b"world").unwrap();
        assert_eq!(sink.len(), 11);
        assert!(sink.is_spilled());

        sink.rewind().unwrap();
        assert_eq!(sink.read_to_vec().unwrap(), b"hello world");
    }

    #[test]
    fn disk_sink_len_survives_reads() {
        let file = TempFileSpill::new().create().unwrap();
        let mut sink = BodySink::disk(file);
        sink.write_all(b"abc").unwrap();
        sink.rewind().unwrap();
        let mut first = [0u8; 1];
        sink.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"a");
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.read_to_vec().unwrap(), b"bc");
    }

    #[test]
    fn empty_sinks() {
        assert!(BodySink::memory(0).is_empty());
        let file = TempFileSpill::new().create().unwrap();
        assert!(BodySink::disk(file).is_empty());
    }

    #[test]
    fn spill_in_dir_leaves_no_visible_file() {
        let dir = tempfile::tempdir().unwrap();
        let spill = TempFileSpill::in_dir(dir.path());
        assert_eq!(spill.dir(), Some(dir.path()));

        let mut sink = BodySink::disk(spill.create().unwrap());
        sink.write_all(&[7u8; 4096]).unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 0, "spilled body must not be reachable by path");
    }

    #[test]
    fn spill_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let spill = TempFileSpill::in_dir(dir.path().join("missing"));
        assert!(spill.create().is_err());
    }

    #[test]
    fn debug_shows_variant_and_len() {
        let mut sink = BodySink::memory(0);
        sink.write_all(b"xy").unwrap();
        let rendered = format!("{sink:?}");
        assert!(rendered.starts_with("Memory"));
        assert!(rendered.contains("len: 2"));
    }
}
