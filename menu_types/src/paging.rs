//! Slot and page addressing
//!
//! A container exposes its contents as a flat sequence of 0-based global
//! slots; the host display shows a fixed-size window of consecutive slots.

use serde::{Deserialize, Serialize};

/// Number of slots rendered per page.
///
/// Driven by the remote display: 25 text rows minus the title row and the
/// status row.
pub const PAGE_SIZE: usize = 23;

/// Fixed display width of an entry name, in characters.
pub const NAME_WIDTH: usize = 16;

/// What a display slot stands for.
///
/// The first two slots of every container are synthetic: slot 0 always
/// navigates to the parent and slot 1 always opens the first real item
/// (the wildcard). Slots from 2 upward map 1:1 to the underlying source
/// entries, in the order the source yields them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Slot 0: navigate up to the parent container
    ParentLink,
    /// Slot 1: open the first real item (wildcard)
    QuickAction,
    /// Slot >= 2: an entry of the underlying source
    RealItem,
}

impl EntryKind {
    /// Returns the kind of a global slot.
    pub fn of_slot(slot: u16) -> Self {
        match slot {
            0 => Self::ParentLink,
            1 => Self::QuickAction,
            _ => Self::RealItem,
        }
    }
}

/// Page number covering the given global slot.
pub fn page_of(slot: u16) -> u16 {
    slot / PAGE_SIZE as u16
}

/// Position of the given global slot within its page.
pub fn slot_in_page(slot: u16) -> u8 {
    (slot % PAGE_SIZE as u16) as u8
}

/// Global slot addressed by a page number and an in-page position.
pub fn global_slot(page: u16, in_page: u8) -> u16 {
    page * PAGE_SIZE as u16 + in_page as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_of_slot() {
        assert_eq!(EntryKind::of_slot(0), EntryKind::ParentLink);
        assert_eq!(EntryKind::of_slot(1), EntryKind::QuickAction);
        assert_eq!(EntryKind::of_slot(2), EntryKind::RealItem);
        assert_eq!(EntryKind::of_slot(500), EntryKind::RealItem);
    }

    #[test]
    fn test_page_math_round_trip() {
        for slot in 0..(PAGE_SIZE as u16 * 4) {
            assert_eq!(global_slot(page_of(slot), slot_in_page(slot)), slot);
        }
    }

    #[test]
    fn test_page_boundaries() {
        let last_of_page0 = PAGE_SIZE as u16 - 1;
        assert_eq!(page_of(last_of_page0), 0);
        assert_eq!(page_of(last_of_page0 + 1), 1);
        assert_eq!(slot_in_page(last_of_page0 + 1), 0);
    }
}
