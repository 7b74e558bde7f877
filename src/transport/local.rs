//! "Local" transport where the register window is a memory-mapped device node (UIO or `/dev/mem`)

use super::{
    Error,
    Transport,
    TransportResult,
};
use crate::consts::{
    GENERATE_BASE_SIZE,
    WORD,
};
use memmap2::{
    MmapMut,
    MmapOptions,
};
use nix::libc::O_SYNC;
use std::{
    fs::File,
    io,
    os::unix::{
        fs::OpenOptionsExt,
        io::AsRawFd,
    },
    path::{
        Path,
        PathBuf,
    },
};
use tracing::{
    debug,
    info,
    trace,
};

/// A local mapping of the generator register window
#[derive(Debug)]
pub struct Local {
    // Field order is drop order: unmap first, then close
    mem: MmapMut,
    file: File,
    path: PathBuf,
}

impl Local {
    /// Open `path` read/write and map [`GENERATE_BASE_SIZE`] bytes of it from offset zero.
    ///
    /// Note: This may require some file permission bologna
    /// # Errors
    /// Returns [`Error::Open`] if the device can't be opened and [`Error::Map`] if the window
    /// can't be mapped. Anything acquired before the failure is released here.
    pub fn new<P: AsRef<Path>>(path: P) -> TransportResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::options()
            .read(true)
            .write(true)
            .custom_flags(O_SYNC)
            .open(&path)
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
        // Device nodes report a zero length, but a regular file has to cover the whole window or
        // touching the tail of the mapping faults
        let meta = file.metadata().map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;
        if meta.is_file() && meta.len() < GENERATE_BASE_SIZE as u64 {
            return Err(Error::Map {
                path,
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "file is {} bytes, the register window needs {GENERATE_BASE_SIZE}",
                        meta.len()
                    ),
                ),
            });
        }
        let mem = unsafe { MmapOptions::new().len(GENERATE_BASE_SIZE).map_mut(&file) }.map_err(
            |source| Error::Map {
                path: path.clone(),
                source,
            },
        )?;
        info!(path = %path.display(), size = GENERATE_BASE_SIZE, "mapped generator registers");
        Ok(Self { mem, file, path })
    }

    /// The device path this window was mapped from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check(&self, offset: usize) -> TransportResult<()> {
        if offset % WORD != 0 {
            return Err(Error::Misaligned(offset));
        }
        match offset.checked_add(WORD) {
            Some(end) if end <= self.mem.len() => Ok(()),
            _ => Err(Error::OutOfBounds { offset, len: WORD }),
        }
    }
}

impl Transport for Local {
    fn read_word(&self, offset: usize) -> TransportResult<u32> {
        self.check(offset)?;
        // SAFETY: the offset is word aligned (the mapping itself is page aligned) and in bounds
        let word = unsafe {
            self.mem
                .as_ptr()
                .add(offset)
                .cast::<u32>()
                .read_volatile()
        };
        trace!(offset, word, "read");
        Ok(word)
    }

    fn write_word(&mut self, offset: usize, word: u32) -> TransportResult<()> {
        self.check(offset)?;
        trace!(offset, word, "write");
        // SAFETY: as above, and we hold the only mutable reference to the mapping
        unsafe {
            self.mem
                .as_mut_ptr()
                .add(offset)
                .cast::<u32>()
                .write_volatile(word);
        }
        Ok(())
    }
}

impl Drop for Local {
    fn drop(&mut self) {
        debug!(
            path = %self.path.display(),
            fd = self.file.as_raw_fd(),
            "unmapping generator registers and closing device"
        );
    }
}
