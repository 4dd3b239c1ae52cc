use std::{fs::File, path::Path};

use memmap2::{Mmap, MmapOptions};
use tracing::debug;

use crate::error::{Error, Result};

/// A read-only memory map of an input file.
pub struct Input {
    // zero-length files are not mapped
    mmap: Option<Mmap>,
}

impl Input {
    pub fn open(path: &Path) -> Result<Self> {
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let len = file.metadata().map_err(io_error)?.len();
        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the map is only read, and the file must not be truncated while mapped
            Some(unsafe { MmapOptions::new().map(&file) }.map_err(io_error)?)
        };
        debug!(path = %path.display(), len, "input mapped");
        Ok(Self { mmap })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }
}
