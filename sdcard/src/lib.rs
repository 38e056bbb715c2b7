//! # SD Card Access
//!
//! This crate defines the storage collaborator contract the menu core
//! navigates over, together with a deterministic in-memory implementation
//! and a failure-injecting wrapper for tests.
//!
//! ## Philosophy
//!
//! - **Capabilities, not ambient access**: containers receive a
//!   [`Filesystem`] reference and an opened [`SequentialSource`]; nothing
//!   reaches for a global device.
//! - **Forward-only is explicit**: a [`SequentialSource`] can be rewound to
//!   byte 0 and read forward; there is no seek. Algorithms that need to
//!   revisit earlier data must rewind and replay, and that cost is visible
//!   in the interface rather than hidden behind a generic read call.
//! - **Testable**: the in-memory filesystem yields entries in a fixed,
//!   documented order, and the failing wrapper simulates device faults
//!   without hardware.

pub mod failing;
pub mod memory;

pub use failing::{FailingFilesystem, FailurePolicy};
pub use memory::MemoryFilesystem;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the storage collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FsError {
    /// The path does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The file exists but could not be opened for reading
    #[error("failed to open: {0}")]
    SourceOpenFailed(String),

    /// A read from an open source failed mid-stream
    #[error("read failed")]
    ReadFailed,

    /// A directory operation was attempted on a non-directory
    #[error("not a directory: {0}")]
    NotADirectory(String),
}

/// Metadata for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    /// True if the path names a directory
    pub is_directory: bool,
    /// Size in bytes (0 for directories)
    pub size: u32,
}

/// One directory listing entry.
///
/// This is everything the file-type classifier is allowed to consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not a path)
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u32,
    /// True if the entry is a directory
    pub is_directory: bool,
}

/// A forward-only byte stream over an open file.
///
/// The only way back is [`rewind`](SequentialSource::rewind), which restarts
/// the stream from byte 0.
pub trait SequentialSource {
    /// Restarts the stream from the beginning.
    fn rewind(&mut self) -> Result<(), FsError>;

    /// Reads up to `buf.len()` bytes, returning how many were read.
    /// Returns 0 once the stream is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Reads and discards `n` bytes, returning how many were actually
    /// skipped (fewer than `n` means the stream ended first).
    fn skip(&mut self, n: usize) -> Result<usize, FsError> {
        let mut scratch = [0u8; 64];
        let mut skipped = 0;
        while skipped < n {
            let want = (n - skipped).min(scratch.len());
            let got = self.read(&mut scratch[..want])?;
            if got == 0 {
                break;
            }
            skipped += got;
        }
        Ok(skipped)
    }
}

/// Reads until `buf` is full or the stream ends, returning the bytes read.
pub fn read_full(source: &mut dyn SequentialSource, buf: &mut [u8]) -> Result<usize, FsError> {
    let mut filled = 0;
    while filled < buf.len() {
        let got = source.read(&mut buf[filled..])?;
        if got == 0 {
            break;
        }
        filled += got;
    }
    Ok(filled)
}

/// The filesystem collaborator.
///
/// Object safe; the menu core holds it as `&mut dyn Filesystem`.
pub trait Filesystem {
    /// Returns metadata for a path.
    fn stat(&self, path: &str) -> Result<FileStat, FsError>;

    /// Lists a directory in the order the underlying medium yields entries.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Opens a file for forward-only reading.
    fn open(&mut self, path: &str) -> Result<Box<dyn SequentialSource>, FsError>;
}
