//! # Archive Image
//!
//! Reader for sequential-entry tape archives: a fixed header, a table of
//! fixed-size entry records, and program payloads addressed by offset.
//!
//! ## Philosophy
//!
//! - **Forward-only, honestly**: the underlying [`SequentialSource`] cannot
//!   seek, so every backward movement is an explicit rewind-and-replay. The
//!   cursor API ([`ArchiveImage::rewind`], [`ArchiveImage::read_next_entry`])
//!   exposes exactly that capability and nothing more.
//! - **Validate at open**: a source that does not carry a plausible header
//!   is rejected before any navigation state is built on top of it.
//! - **Payload extraction is bounded**: [`ArchiveImage::extract_program`]
//!   never writes past the caller's capacity; size validity is the caller's
//!   policy, not ours.
//!
//! [`SequentialSource`]: sdcard::SequentialSource

pub mod builder;
pub mod format;
pub mod image;

pub use builder::ImageBuilder;
pub use format::{EntryRecord, Header, ENTRY_RECORD_LEN, HEADER_LEN};
pub use image::ArchiveImage;

use sdcard::FsError;
use thiserror::Error;

/// Errors surfaced by the archive reader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// The underlying source failed
    #[error("storage error: {0}")]
    Io(#[from] FsError),

    /// The source does not start with a valid archive header
    #[error("bad archive header")]
    BadHeader,

    /// No entry is under the cursor
    #[error("no entry under the cursor")]
    NoEntry,
}
