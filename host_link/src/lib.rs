//! # Host Link
//!
//! This crate defines the contract between the menu core and the remote
//! display it renders to. The core calls one method per rendered row, page
//! boundary, or terminal event; the byte layout of the physical link is the
//! transport's concern, not ours.
//!
//! ## Philosophy
//!
//! - **Fixed geometry**: every row is exactly [`ROW_WIDTH`] bytes; the host
//!   never reflows text.
//! - **Events, not a framebuffer**: the core states what happened (reply,
//!   row, page end, exit); the transport decides how to move it.
//! - **Testable**: [`RecordingHostLink`] captures the full event stream so
//!   tests can assert on exactly what a navigation operation rendered.

pub mod recording;

pub use recording::{HostEvent, NullOptionsMenu, RecordingHostLink};

use file_types::FileKind;
use serde::{Deserialize, Serialize};

/// Fixed width of one rendered row, in bytes.
pub const ROW_WIDTH: usize = 38;

/// Marker byte written into column 0 of the selected row.
pub const SELECTED_MARK: u8 = b'>';

/// Reply code sent ahead of a rendered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyCode {
    /// A full directory render follows (directory name row, then rows)
    ReadDir,
    /// A page render follows (rows only)
    ReadDirPage,
}

/// One fixed-width display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRow(pub [u8; ROW_WIDTH]);

impl PageRow {
    /// A row of spaces.
    pub fn blank() -> Self {
        Self([b' '; ROW_WIDTH])
    }

    /// Marks this row as the selected one.
    pub fn mark_selected(&mut self) {
        self.0[0] = SELECTED_MARK;
    }

    /// Returns true if the row carries the selection marker.
    pub fn is_selected(&self) -> bool {
        self.0[0] == SELECTED_MARK
    }

    /// Writes `text` at `offset`, truncated to `width` and space-padded.
    pub fn put(&mut self, offset: usize, width: usize, text: &str) {
        let end = (offset + width).min(ROW_WIDTH);
        let mut pos = offset;
        for byte in text.bytes() {
            if pos >= end {
                break;
            }
            self.0[pos] = byte;
            pos += 1;
        }
        while pos < end {
            self.0[pos] = b' ';
            pos += 1;
        }
    }

    /// The row text with trailing spaces removed, for assertions and logs.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0).trim_end().to_string()
    }
}

impl Default for PageRow {
    fn default() -> Self {
        Self::blank()
    }
}

/// The host display/link collaborator.
pub trait HostLink {
    /// Announces what kind of render follows.
    fn send_reply(&mut self, code: ReplyCode);

    /// Sends the directory name row shown above the listing.
    fn send_dir_name(&mut self, row: &PageRow);

    /// Sends one listing row.
    fn send_row(&mut self, row: &PageRow);

    /// Terminates the current page ("no more rows").
    fn send_page_end(&mut self);

    /// Tells the host to leave the menu and run the loaded program.
    fn send_exit_to_boot(&mut self);
}

/// The file-options sub-menu collaborator.
///
/// Invoked instead of navigating or booting when the "inspect options" flag
/// accompanies a select request.
pub trait OptionsMenu {
    /// Shows the options sub-menu for the given item.
    fn show_options(&mut self, display_name: &str, kind: FileKind, slot_in_page: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_row() {
        let row = PageRow::blank();
        assert_eq!(row.text(), "");
        assert!(!row.is_selected());
    }

    #[test]
    fn test_put_pads_and_truncates() {
        let mut row = PageRow::blank();
        row.put(1, 5, "AB");
        assert_eq!(&row.0[1..6], b"AB   ");

        row.put(1, 5, "ABCDEFGH");
        assert_eq!(&row.0[1..6], b"ABCDE");
    }

    #[test]
    fn test_put_clamps_to_row_width() {
        let mut row = PageRow::blank();
        row.put(ROW_WIDTH - 2, 10, "XYZ");
        assert_eq!(&row.0[ROW_WIDTH - 2..], b"XY");
    }

    #[test]
    fn test_selection_marker() {
        let mut row = PageRow::blank();
        row.put(1, 10, "GAME");
        row.mark_selected();
        assert!(row.is_selected());
        assert_eq!(row.0[0], SELECTED_MARK);
    }
}
