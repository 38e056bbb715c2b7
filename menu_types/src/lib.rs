//! # Menu Types
//!
//! This crate defines the fundamental navigation types for the CartMenu core.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the last-selected element and the pending
//!   boot hand-off are owned state, not globals scattered across modules.
//! - **Slots, not rows**: an element is addressed by its global slot in the
//!   full listing; pages are derived windows, never stored per row.
//! - **Testable**: all navigation state is plain data with serde support.
//!
//! ## Key Types
//!
//! - [`EntryKind`]: what a display slot stands for
//! - [`SelectFlags`]: modifier flags accompanying a select request
//! - [`SelectionLedger`]: the cross-container record of the last selection
//! - [`BootRequest`]: the hand-off record consumed by the boot loader

pub mod paging;
pub mod selection;

pub use paging::{global_slot, page_of, slot_in_page, EntryKind, NAME_WIDTH, PAGE_SIZE};
pub use selection::{BootKind, BootRequest, SelectFlags, SelectionLedger};
