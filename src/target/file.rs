//! Read-only data file handle
//!
//! `DataFileReader` wraps an open `std::fs::File` for one planned extent. In
//! unbuffered mode the file is opened with `O_DIRECT` (Linux) or has
//! `F_NOCACHE` set (macOS) so reads bypass the page cache. The descriptor is
//! closed when the reader is dropped, which covers budget expiry and error
//! paths as well as normal completion.

use crate::error::{BenchError, IoOp};
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::os::unix::fs::MetadataExt;
#[cfg(target_os = "linux")]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Fallback block size when the filesystem reports nothing usable
pub const DEFAULT_BLOCK_SIZE: u64 = 512;

/// Open data file positioned for sequential reads
#[derive(Debug)]
pub struct DataFileReader {
    file: File,
    path: PathBuf,
}

impl DataFileReader {
    /// Open `path` read-only, bypassing the page cache unless `buffered`
    pub fn open(path: &Path, buffered: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true);

        #[cfg(target_os = "linux")]
        if !buffered {
            options.custom_flags(libc::O_DIRECT);
        }

        let file = options
            .open(path)
            .map_err(|e| BenchError::io(IoOp::Open, path, e))?;

        #[cfg(target_os = "macos")]
        if !buffered {
            use std::os::unix::io::AsRawFd;
            // SAFETY: fd is owned by `file` and valid for the duration of the call
            let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
            if rc == -1 {
                return Err(BenchError::io(IoOp::Open, path, std::io::Error::last_os_error()));
            }
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Move the read position to `offset`
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| BenchError::io(IoOp::Seek, &self.path, e))?;
        Ok(())
    }

    /// Read into `buf`, returning the number of bytes transferred
    ///
    /// Zero means end of file. Interrupted calls are retried.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.file.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(BenchError::io(IoOp::Read, &self.path, e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Block size the filesystem holding `path` reports for I/O
///
/// Uses `st_blksize`, accepted only when it is a power of two of at least 512
/// bytes; otherwise falls back to 512, which every device accepts.
pub fn detect_block_size(path: &Path) -> Result<u64> {
    let meta = std::fs::metadata(path).map_err(|e| BenchError::io(IoOp::Stat, path, e))?;
    let blksize = meta.blksize();
    if blksize >= DEFAULT_BLOCK_SIZE && blksize.is_power_of_two() {
        Ok(blksize)
    } else {
        Ok(DEFAULT_BLOCK_SIZE)
    }
}
