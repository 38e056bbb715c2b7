//! Row rendering
//!
//! All fixed-column layout lives here so the two containers render
//! identically: selection marker in column 0, block count at column 1,
//! name at column 7, 3-letter type tag at column 34.

use host_link::PageRow;
use menu_types::NAME_WIDTH;

/// Column of the block-count field.
const COL_BLOCKS: usize = 1;
/// Column of the name field.
const COL_NAME: usize = 7;
/// Column of the type tag.
const COL_TAG: usize = 34;
/// Width of the block-count field.
const BLOCKS_WIDTH: usize = 5;
/// Width of the type tag.
const TAG_WIDTH: usize = 3;

/// Sanitizes raw name bytes for display.
///
/// The name ends at the first NUL or shifted-space (0xA0) byte; every byte
/// outside the printable ASCII range is replaced with `?`. The result is
/// truncated to `width` characters.
pub fn sanitize_name(raw: &[u8], width: usize) -> String {
    let mut out = String::with_capacity(width);
    for &byte in raw {
        if byte == 0x00 || byte == 0xA0 {
            break;
        }
        if out.len() == width {
            break;
        }
        if (0x20..=0x7E).contains(&byte) {
            out.push(byte as char);
        } else {
            out.push('?');
        }
    }
    out
}

/// The sanitized display name of an entry, trailing padding removed.
pub fn display_name(raw: &[u8]) -> String {
    let mut name = sanitize_name(raw, NAME_WIDTH);
    while name.ends_with(' ') {
        name.pop();
    }
    name
}

/// The directory name row shown above a listing.
pub fn dir_name_row(name: &str) -> PageRow {
    let mut row = PageRow::blank();
    row.put(1, 36, name);
    row
}

/// The parent-link row rendered in slot 0 of page 0.
pub fn parent_row() -> PageRow {
    let mut row = PageRow::blank();
    row.put(COL_BLOCKS, 2, "..");
    row.put(COL_TAG, TAG_WIDTH, "DIR");
    row
}

/// The quick-action row rendered in slot 1 of page 0.
///
/// `label` is the archive description for archives, or the wildcard marker
/// text for a plain directory.
pub fn quick_action_row(label: &str) -> PageRow {
    let mut row = PageRow::blank();
    row.put(COL_BLOCKS, 1, "*");
    row.put(COL_NAME, 24, label);
    row.put(COL_TAG, TAG_WIDTH, "---");
    row
}

/// A regular entry row: block count (blank when `None`), 16-character name,
/// 3-letter type tag.
pub fn entry_row(blocks: Option<u16>, name: &str, tag: &str) -> PageRow {
    let mut row = PageRow::blank();
    if let Some(blocks) = blocks {
        row.put(COL_BLOCKS, BLOCKS_WIDTH, &blocks.to_string());
    }
    row.put(COL_NAME, NAME_WIDTH, name);
    row.put(COL_TAG, TAG_WIDTH, tag);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_stops_at_terminators() {
        assert_eq!(sanitize_name(b"GAME\x00JUNK", 16), "GAME");
        assert_eq!(sanitize_name(b"GAME\xA0\xA0\xA0", 16), "GAME");
    }

    #[test]
    fn test_sanitize_replaces_unprintable() {
        assert_eq!(sanitize_name(&[b'A', 0x01, 0x7F, b'B'], 16), "A??B");
    }

    #[test]
    fn test_sanitize_truncates() {
        assert_eq!(sanitize_name(b"ABCDEFGHIJKLMNOPQRSTU", 16).len(), 16);
    }

    #[test]
    fn test_display_name_trims_padding() {
        assert_eq!(display_name(b"GAME            "), "GAME");
    }

    #[test]
    fn test_parent_row_layout() {
        let row = parent_row();
        assert_eq!(&row.0[1..3], b"..");
        assert_eq!(&row.0[34..37], b"DIR");
        assert!(!row.is_selected());
    }

    #[test]
    fn test_quick_action_row_layout() {
        let row = quick_action_row("DEMO TAPE");
        assert_eq!(row.0[1], b'*');
        assert_eq!(&row.0[7..16], b"DEMO TAPE");
        assert_eq!(&row.0[34..37], b"---");
    }

    #[test]
    fn test_entry_row_layout() {
        let row = entry_row(Some(12), "GAME", "PRG");
        assert_eq!(&row.0[1..6], b"12   ");
        assert_eq!(&row.0[7..11], b"GAME");
        assert_eq!(&row.0[34..37], b"PRG");

        let row = entry_row(None, "SAVES", "DIR");
        assert_eq!(&row.0[1..6], b"     ");
    }
}
