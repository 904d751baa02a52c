//! Byte sources handed to the aggregation engine
//!
//! The engine never opens files itself; it reads from anything exposing the
//! whole input as one contiguous, read-only byte view.

use crate::error::{AggregatorError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only, random-access input
pub trait ByteSource: Sync {
    /// The full input
    fn as_bytes(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A sub-range of the input
    fn read(&self, range: Range<usize>) -> &[u8] {
        &self.as_bytes()[range]
    }
}

impl ByteSource for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for str {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

/// A memory-mapped input file
#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    // Zero-length files cannot be mapped on every platform
    map: Option<Mmap>,
}

impl MappedFile {
    /// Map `path` read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|e| AggregatorError::io(format!("failed to open {}", path.display()), e))?;
        let len = file
            .metadata()
            .map_err(|e| AggregatorError::io(format!("failed to stat {}", path.display()), e))?
            .len();

        let map = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and the input is not expected to
            // be modified while the run is in progress.
            let map = unsafe { Mmap::map(&file) }
                .map_err(|e| AggregatorError::io(format!("failed to map {}", path.display()), e))?;
            Some(map)
        };

        debug!("Mapped {} ({} bytes)", path.display(), len);
        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for MappedFile {
    fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}
