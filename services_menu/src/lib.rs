//! # Menu Service
//!
//! The browsing/navigation core of the cartridge menu: paged containers over
//! the SD filesystem and mounted tape archives, a forward-only pagination
//! and resume protocol, and the driver that dispatches host requests to
//! whichever container is active.
//!
//! ## Philosophy
//!
//! - **One contract, many containers**: every navigable listing — the SD
//!   root and every opened archive — implements the same five-operation
//!   [`PagedContainer`] contract.
//! - **Transitions are values**: a container never reaches for a global
//!   "current menu" pointer; it returns a [`Transition`] and the
//!   [`NavigationDriver`] performs the hand-over, so the single-owner rule
//!   for the underlying source handle is enforced by ownership.
//! - **No fault escapes**: every host request completes with a render, a
//!   notice, or a boot exit. End-of-data is control flow, not an error.

pub mod archive_container;
pub mod driver;
pub mod render;
pub mod root_container;

pub use archive_container::ArchiveContainer;
pub use driver::{MenuRequest, NavigationDriver};
pub use root_container::RootContainer;

use host_link::{HostLink, OptionsMenu};
use menu_types::{SelectFlags, SelectionLedger};
use sdcard::Filesystem;
use services_log::EventLog;
use services_notice::Notifier;

/// Collaborator bundle passed through every container operation.
///
/// Borrows are per request; nothing here outlives the host request being
/// processed.
pub struct MenuContext<'a> {
    /// Storage collaborator
    pub fs: &'a mut dyn Filesystem,
    /// Host display/link collaborator
    pub host: &'a mut dyn HostLink,
    /// User-visible notice sink
    pub notices: &'a mut dyn Notifier,
    /// File-options sub-menu collaborator
    pub options: &'a mut dyn OptionsMenu,
    /// Cross-container selection state
    pub ledger: &'a mut SelectionLedger,
    /// Structured event log
    pub log: &'a mut EventLog,
    /// The boot-load buffer a selected program is materialized into
    pub boot_buffer: &'a mut Vec<u8>,
}

/// Hand-over requested by a container operation.
///
/// The driver owns the containers; a container states what should happen
/// next and the driver moves ownership accordingly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Keep the current container active
    Stay,
    /// Close this container and return to the parent listing
    ToParent {
        /// Propagate all the way to the filesystem root
        to_root: bool,
    },
    /// Open the file at `path` as an archive container
    OpenArchive {
        /// Path of the archive image
        path: String,
    },
    /// A boot request was committed; leave the menu
    Boot,
}

/// The contract every navigable container implements.
///
/// Exactly five operations; each renders to the host link and/or mutates
/// the selection ledger. None of them fail: faults are degraded to notices
/// and safe renders inside the operation that detected them.
pub trait PagedContainer {
    /// (Re)starts the listing, resuming the saved page when the ledger
    /// holds a reachable pending element, and renders a full page with the
    /// selected slot marked.
    fn enter_directory(&mut self, ctx: &mut MenuContext<'_>);

    /// Hands control back to the parent container, clearing the pending
    /// element. `to_root` propagates "go to root" instead of "show parent".
    fn leave_directory(&mut self, ctx: &mut MenuContext<'_>, to_root: bool) -> Transition;

    /// Advances one page unless the listing end was already reached; an
    /// advance that renders no rows is rolled back.
    fn next_page(&mut self, ctx: &mut MenuContext<'_>);

    /// Rewinds to the previous page, replaying the source from the start
    /// (the source is forward-only). Reports "no more pages" at page 0.
    fn previous_page(&mut self, ctx: &mut MenuContext<'_>);

    /// Resolves `slot_in_page` against the current page and acts on the
    /// slot: navigate up, open the first real item, descend, show options,
    /// or materialize a program and commit the boot request.
    fn select(&mut self, ctx: &mut MenuContext<'_>, flags: SelectFlags, slot_in_page: u8)
        -> Transition;
}
