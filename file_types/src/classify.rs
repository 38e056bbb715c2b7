//! The classification algorithm

use crate::geometry::disk_format_for_size;
use crate::kind::FileKind;
use crate::{ARCHIVE_HEADER_LEN, CRT_HEADER_LEN, DAT_HEADER_LEN, P00_HEADER_LEN, ROM_BUFFER_CAPACITY};

/// Returns true if the size can be a loadable program: at least a 2-byte
/// load address plus 1 byte of data, and small enough for the boot buffer.
pub fn prg_size_valid(size: u32) -> bool {
    size > 2 && size < ROM_BUFFER_CAPACITY
}

/// Compares the first 3 bytes of an extension against a 3-letter uppercase
/// pattern. Only `a`-`z` are case-folded; every other byte must match
/// exactly.
fn extension_matches(ext: &[u8], pattern: &[u8; 3]) -> bool {
    if ext.len() < 3 {
        return false;
    }
    for i in 0..3 {
        let ch = if ext[i].is_ascii_lowercase() {
            ext[i] - 0x20
        } else {
            ext[i]
        };
        if ch != pattern[i] {
            return false;
        }
    }
    true
}

/// How a name splits at its last dot.
enum Extension<'a> {
    /// No dot anywhere in the name
    Missing,
    /// A dot with fewer than 3 characters after it; never matches a pattern
    TooShort,
    /// At least 3 characters after the last dot
    Tail(&'a [u8]),
}

fn extension_of(name: &[u8]) -> Extension<'_> {
    match name.iter().rposition(|&b| b == b'.') {
        None => Extension::Missing,
        // The raw length from the dot must be at least 4 including the dot
        Some(dot) if name.len() - dot >= 4 => Extension::Tail(&name[dot + 1..]),
        Some(_) => Extension::TooShort,
    }
}

/// Classifies a directory entry by name and size.
///
/// Pure: identical inputs always yield the same kind. A recognized
/// extension whose size bound fails yields [`FileKind::Unknown`], never a
/// fallback kind.
pub fn classify(name: &str, size: u32, is_directory: bool) -> FileKind {
    if is_directory {
        return FileKind::None;
    }

    let ext = match extension_of(name.as_bytes()) {
        Extension::Missing => {
            // Extensionless files are tentatively programs
            if prg_size_valid(size) {
                return FileKind::Prg;
            }
            return FileKind::Unknown;
        }
        Extension::TooShort => return FileKind::Unknown,
        Extension::Tail(ext) => ext,
    };

    if extension_matches(ext, b"PRG") {
        if prg_size_valid(size) {
            return FileKind::Prg;
        }
    } else if extension_matches(ext, b"P00") {
        if size > P00_HEADER_LEN {
            return FileKind::P00;
        }
    } else if extension_matches(ext, b"T64") {
        if size > ARCHIVE_HEADER_LEN {
            return FileKind::T64Archive;
        }
    } else if extension_matches(ext, b"CRT") {
        if size > CRT_HEADER_LEN {
            return FileKind::CartridgeImage;
        }
    } else if extension_matches(ext, b"D64")
        || extension_matches(ext, b"D71")
        || extension_matches(ext, b"D81")
    {
        if disk_format_for_size(size).is_some() {
            return FileKind::DiskImage;
        }
    } else if extension_matches(ext, b"ROM") || extension_matches(ext, b"BIN") {
        if size <= ROM_BUFFER_CAPACITY {
            return FileKind::RomImage;
        }
    } else if extension_matches(ext, b"UPD") {
        if size >= ROM_BUFFER_CAPACITY {
            return FileKind::FirmwareUpdate;
        }
    } else if extension_matches(ext, b"DAT") && size == DAT_HEADER_LEN + ROM_BUFFER_CAPACITY {
        return FileKind::RawData;
    }

    FileKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_is_none() {
        assert_eq!(classify("GAMES", 0, true), FileKind::None);
        assert_eq!(classify("games.prg", 4096, true), FileKind::None);
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(classify("game.PRG", 4096, false), FileKind::Prg);
        assert_eq!(classify("game.prg", 4096, false), FileKind::Prg);
        assert_eq!(classify("game.Prg", 4096, false), FileKind::Prg);
    }

    #[test]
    fn test_digits_not_case_folded() {
        // '0' must match exactly; it is not a letter
        assert_eq!(classify("game.pr0", 4096, false), FileKind::Unknown);
        assert_eq!(classify("wrap.p00", 4096, false), FileKind::P00);
    }

    #[test]
    fn test_prg_size_boundaries() {
        assert_eq!(classify("a.prg", 2, false), FileKind::Unknown);
        assert_eq!(classify("a.prg", 3, false), FileKind::Prg);
        assert_eq!(classify("a.prg", 65_535, false), FileKind::Prg);
        assert_eq!(classify("a.prg", 65_536, false), FileKind::Unknown);
    }

    #[test]
    fn test_extensionless_is_tentative_prg() {
        assert_eq!(classify("GAME", 65_000, false), FileKind::Prg);
        assert_eq!(classify("GAME", 1, false), FileKind::Unknown);
    }

    #[test]
    fn test_short_extension_is_unknown() {
        // Fewer than 3 characters after the dot never matches anything,
        // and does not fall back to the extensionless rule
        assert_eq!(classify("game.gz", 4096, false), FileKind::Unknown);
        assert_eq!(classify("game.", 4096, false), FileKind::Unknown);
    }

    #[test]
    fn test_longer_extension_matches_first_three() {
        // Only the first 3 bytes take part in the comparison
        assert_eq!(classify("game.prgx", 4096, false), FileKind::Prg);
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(classify("v1.2.final.prg", 4096, false), FileKind::Prg);
    }

    #[test]
    fn test_archive_header_bound() {
        assert_eq!(classify("tape.t64", 64, false), FileKind::Unknown);
        assert_eq!(classify("tape.t64", 65, false), FileKind::T64Archive);
    }

    #[test]
    fn test_p00_header_bound() {
        assert_eq!(classify("wrap.p00", 26, false), FileKind::Unknown);
        assert_eq!(classify("wrap.p00", 27, false), FileKind::P00);
    }

    #[test]
    fn test_cartridge_header_bound() {
        assert_eq!(classify("cart.crt", 64, false), FileKind::Unknown);
        assert_eq!(classify("cart.crt", 8256, false), FileKind::CartridgeImage);
    }

    #[test]
    fn test_disk_geometry_delegation() {
        assert_eq!(classify("disk.d64", 174_848, false), FileKind::DiskImage);
        assert_eq!(classify("disk.d71", 349_696, false), FileKind::DiskImage);
        assert_eq!(classify("disk.d81", 819_200, false), FileKind::DiskImage);
        assert_eq!(classify("disk.d64", 12_345, false), FileKind::Unknown);
    }

    #[test]
    fn test_rom_and_update_split_at_capacity() {
        assert_eq!(classify("k.rom", 8192, false), FileKind::RomImage);
        assert_eq!(classify("k.bin", 65_536, false), FileKind::RomImage);
        assert_eq!(classify("k.bin", 65_537, false), FileKind::Unknown);
        assert_eq!(classify("fw.upd", 65_536, false), FileKind::FirmwareUpdate);
        assert_eq!(classify("fw.upd", 65_535, false), FileKind::Unknown);
    }

    #[test]
    fn test_dat_exact_size() {
        let exact = 32 + 65_536;
        assert_eq!(classify("state.dat", exact, false), FileKind::RawData);
        assert_eq!(classify("state.dat", exact - 1, false), FileKind::Unknown);
        assert_eq!(classify("state.dat", exact + 1, false), FileKind::Unknown);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(classify("readme.txt", 100, false), FileKind::Unknown);
    }

    #[test]
    fn test_purity() {
        for _ in 0..3 {
            assert_eq!(classify("game.prg", 4096, false), FileKind::Prg);
        }
    }
}
