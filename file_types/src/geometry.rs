//! Disk image geometry table
//!
//! A disk image is recognized purely by its byte size matching one of the
//! known track layouts, with or without the trailing per-sector error bytes.

use serde::{Deserialize, Serialize};

/// Recognized disk image layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskFormat {
    /// Single-sided 35-track image
    D64,
    /// Single-sided 40-track image
    D64Extended40,
    /// Single-sided 42-track image
    D64Extended42,
    /// Double-sided 70-track image
    D71,
    /// 3.5" 80-track image
    D81,
}

/// Byte sizes of each layout, without and with error bytes.
const GEOMETRY: &[(u32, u32, DiskFormat)] = &[
    (174_848, 175_531, DiskFormat::D64),
    (196_608, 197_376, DiskFormat::D64Extended40),
    (205_312, 206_114, DiskFormat::D64Extended42),
    (349_696, 351_062, DiskFormat::D71),
    (819_200, 822_400, DiskFormat::D81),
];

/// Looks up the disk layout matching the given image size, if any.
pub fn disk_format_for_size(size: u32) -> Option<DiskFormat> {
    GEOMETRY
        .iter()
        .find(|(plain, with_errors, _)| size == *plain || size == *with_errors)
        .map(|(_, _, format)| *format)
}
