//! Recording host link
//!
//! Test double that captures every call so tests can assert on the exact
//! render stream a navigation operation produced.

use crate::{HostLink, OptionsMenu, PageRow, ReplyCode};
use file_types::FileKind;

/// One recorded host link call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// `send_reply`
    Reply(ReplyCode),
    /// `send_dir_name` (trailing spaces trimmed)
    DirName(String),
    /// `send_row` (trailing spaces trimmed, selection marker preserved)
    Row(String),
    /// `send_page_end`
    PageEnd,
    /// `send_exit_to_boot`
    ExitToBoot,
}

/// A [`HostLink`] that records everything it is told to send.
#[derive(Debug, Default)]
pub struct RecordingHostLink {
    events: Vec<HostEvent>,
}

impl RecordingHostLink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in call order.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Clears the recording.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The row texts of the most recent render (since the last reply).
    pub fn last_page_rows(&self) -> Vec<String> {
        let start = self
            .events
            .iter()
            .rposition(|e| matches!(e, HostEvent::Reply(_)))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        self.events[start..]
            .iter()
            .filter_map(|e| match e {
                HostEvent::Row(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Index of the selected row within the most recent render, if any.
    pub fn selected_row(&self) -> Option<usize> {
        self.last_page_rows()
            .iter()
            .position(|row| row.starts_with('>'))
    }

    /// True if an exit-to-boot was recorded.
    pub fn booted(&self) -> bool {
        self.events.contains(&HostEvent::ExitToBoot)
    }
}

impl HostLink for RecordingHostLink {
    fn send_reply(&mut self, code: ReplyCode) {
        self.events.push(HostEvent::Reply(code));
    }

    fn send_dir_name(&mut self, row: &PageRow) {
        self.events.push(HostEvent::DirName(row.text()));
    }

    fn send_row(&mut self, row: &PageRow) {
        self.events.push(HostEvent::Row(row.text()));
    }

    fn send_page_end(&mut self) {
        self.events.push(HostEvent::PageEnd);
    }

    fn send_exit_to_boot(&mut self) {
        self.events.push(HostEvent::ExitToBoot);
    }
}

/// An [`OptionsMenu`] that records invocations and performs nothing.
#[derive(Debug, Default)]
pub struct NullOptionsMenu {
    invocations: Vec<(String, FileKind, u8)>,
}

impl NullOptionsMenu {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded invocations, in call order.
    pub fn invocations(&self) -> &[(String, FileKind, u8)] {
        &self.invocations
    }
}

impl OptionsMenu for NullOptionsMenu {
    fn show_options(&mut self, display_name: &str, kind: FileKind, slot_in_page: u8) {
        self.invocations
            .push((display_name.to_string(), kind, slot_in_page));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut link = RecordingHostLink::new();
        link.send_reply(ReplyCode::ReadDir);
        let mut row = PageRow::blank();
        row.put(1, 4, "GAME");
        link.send_row(&row);
        link.send_page_end();

        assert_eq!(
            link.events(),
            &[
                HostEvent::Reply(ReplyCode::ReadDir),
                HostEvent::Row(" GAME".to_string()),
                HostEvent::PageEnd,
            ]
        );
    }

    #[test]
    fn test_last_page_rows_spans_latest_reply() {
        let mut link = RecordingHostLink::new();
        let mut row = PageRow::blank();

        link.send_reply(ReplyCode::ReadDir);
        row.put(1, 3, "OLD");
        link.send_row(&row);

        link.send_reply(ReplyCode::ReadDirPage);
        let mut row = PageRow::blank();
        row.put(1, 3, "NEW");
        link.send_row(&row);

        assert_eq!(link.last_page_rows(), vec![" NEW".to_string()]);
    }

    #[test]
    fn test_selected_row() {
        let mut link = RecordingHostLink::new();
        link.send_reply(ReplyCode::ReadDir);
        let mut first = PageRow::blank();
        first.put(1, 2, "..");
        link.send_row(&first);
        let mut second = PageRow::blank();
        second.put(1, 4, "GAME");
        second.mark_selected();
        link.send_row(&second);

        assert_eq!(link.selected_row(), Some(1));
    }

    #[test]
    fn test_options_recorder() {
        let mut options = NullOptionsMenu::new();
        options.show_options("GAME", FileKind::Prg, 3);
        assert_eq!(
            options.invocations(),
            &[("GAME".to_string(), FileKind::Prg, 3)]
        );
    }
}
