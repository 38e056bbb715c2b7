//! # File Types
//!
//! This crate decides which container or loader a directory entry should be
//! opened with, from nothing but its name and size.
//!
//! ## Philosophy
//!
//! - **Pure**: classification is a function of `(name, size, is_directory)`;
//!   no filesystem access, no state, no probing of file contents.
//! - **Reject, never coerce**: a recognized extension whose size fails its
//!   bound classifies as [`FileKind::Unknown`]. The caller must treat
//!   `Unknown` as "cannot open" rather than fall back to a guess.
//! - **Stable**: the kind is derived on every use and never persisted.

pub mod classify;
pub mod geometry;
pub mod kind;

pub use classify::{classify, prg_size_valid};
pub use geometry::{disk_format_for_size, DiskFormat};
pub use kind::FileKind;

/// Size of a P00 container header in bytes (signature, original name, record
/// length).
pub const P00_HEADER_LEN: u32 = 26;

/// Size of a sequential archive (tape image) header in bytes.
pub const ARCHIVE_HEADER_LEN: u32 = 64;

/// Size of a cartridge image header in bytes.
pub const CRT_HEADER_LEN: u32 = 64;

/// Size of the persisted device-state header in bytes.
pub const DAT_HEADER_LEN: u32 = 32;

/// Capacity of the on-device ROM/boot buffer in bytes.
pub const ROM_BUFFER_CAPACITY: u32 = 64 * 1024;
