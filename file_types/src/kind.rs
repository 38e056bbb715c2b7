//! File kind tags

use core::fmt;
use serde::{Deserialize, Serialize};

/// What a directory entry can be opened as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// A directory (no loader; navigation descends into it)
    None,
    /// A plain program file
    Prg,
    /// A program wrapped in a P00 container
    P00,
    /// A sequential-entry tape archive
    T64Archive,
    /// A cartridge image
    CartridgeImage,
    /// A disk image
    DiskImage,
    /// A raw ROM image that fits the ROM buffer
    RomImage,
    /// A firmware update package
    FirmwareUpdate,
    /// A persisted device-state file
    RawData,
    /// Not recognized or failed its size bound; cannot be opened
    Unknown,
}

impl FileKind {
    /// Returns true if the entry can be materialized into the boot buffer as
    /// a program.
    pub fn is_program(self) -> bool {
        matches!(self, Self::Prg | Self::P00)
    }

    /// Short display tag rendered in the type column of a page row.
    pub fn tag(self) -> &'static str {
        match self {
            Self::None => "DIR",
            Self::Prg => "PRG",
            Self::P00 => "P00",
            Self::T64Archive => "T64",
            Self::CartridgeImage => "CRT",
            Self::DiskImage => "DSK",
            Self::RomImage => "ROM",
            Self::FirmwareUpdate => "UPD",
            Self::RawData => "DAT",
            Self::Unknown => "???",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_program() {
        assert!(FileKind::Prg.is_program());
        assert!(FileKind::P00.is_program());
        assert!(!FileKind::T64Archive.is_program());
        assert!(!FileKind::Unknown.is_program());
    }

    #[test]
    fn test_display_tag() {
        assert_eq!(FileKind::Prg.to_string(), "PRG");
        assert_eq!(FileKind::None.to_string(), "DIR");
        assert_eq!(FileKind::Unknown.to_string(), "???");
    }
}
