//! Selection ledger and boot hand-off record
//!
//! The ledger is the only state that survives a container transition. It
//! remembers which global slot was last selected (so a container can resume
//! at that page on re-entry) and carries the pending boot request that the
//! menu hands to the boot loader on exit.

use crate::paging::NAME_WIDTH;
use serde::{Deserialize, Serialize};

/// Modifier flags accompanying a select request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectFlags(u8);

impl SelectFlags {
    const OPTIONS: u8 = 0x01;

    /// No flags set.
    pub fn none() -> Self {
        Self(0)
    }

    /// The "inspect options" flag: show the file-options sub-menu instead of
    /// navigating or booting.
    pub fn options() -> Self {
        Self(Self::OPTIONS)
    }

    /// Builds flags from the raw host byte.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns true if the options flag is set.
    pub fn has_options(self) -> bool {
        self.0 & Self::OPTIONS != 0
    }
}

/// Kind of the pending boot hand-off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootKind {
    /// Nothing pending
    #[default]
    None,
    /// A program materialized into the boot buffer
    Prg,
    /// A cartridge image
    Cartridge,
    /// A disk image mount
    Disk,
    /// A raw ROM image
    Rom,
}

/// The record handed to the boot loader when the menu exits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootRequest {
    /// What the boot buffer holds
    pub kind: BootKind,
    /// Display name of the chosen item, sanitized, at most [`NAME_WIDTH`] chars
    pub name: String,
    /// Payload size in bytes
    pub size: u32,
    /// Path of the file the payload came from
    pub source_path: String,
}

impl BootRequest {
    /// Resets the record to "nothing pending".
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Cross-container record of the last selection.
///
/// Process-wide with a single owner at any time. Initialized empty at
/// power-on, written by `select`, consulted by `enter_directory` to resume
/// the saved position, and cleared whenever navigation leaves a container so
/// that re-entry from the parent starts fresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLedger {
    /// Global slot of the last selected element, if any
    pub pending_element: Option<u16>,
    /// The pending boot hand-off
    pub boot: BootRequest,
}

impl SelectionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the given global slot as the last selected element.
    pub fn set_pending(&mut self, slot: u16) {
        self.pending_element = Some(slot);
    }

    /// Forgets the last selected element.
    pub fn clear_pending(&mut self) {
        self.pending_element = None;
    }

    /// Starts a selection: remembers the slot and resets the boot record.
    ///
    /// Called at the top of every select so a later re-entry resumes at this
    /// slot even when the selection ends in the options menu or a failure.
    pub fn begin_selection(&mut self, slot: u16) {
        self.pending_element = Some(slot);
        self.boot.clear();
    }

    /// Commits the boot hand-off for the chosen item.
    ///
    /// The name is truncated to [`NAME_WIDTH`] characters; callers pass it
    /// already sanitized for display.
    pub fn commit_boot(&mut self, kind: BootKind, name: &str, size: u32, source_path: &str) {
        let mut name: String = name.chars().take(NAME_WIDTH).collect();
        while name.ends_with(' ') {
            name.pop();
        }
        self.boot = BootRequest {
            kind,
            name,
            size,
            source_path: source_path.to_string(),
        };
    }

    /// Resets the whole ledger to power-on state (root re-entry).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
