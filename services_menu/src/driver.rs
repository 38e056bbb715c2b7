//! Request dispatch and container hand-over
//!
//! The driver owns the active container, the filesystem handle, the
//! selection ledger, and the boot buffer. Containers never see each other;
//! they return a [`Transition`] and the driver moves ownership.

use crate::root_container::boot_program;
use crate::{ArchiveContainer, MenuContext, PagedContainer, RootContainer, Transition};
use archive_image::ArchiveImage;
use file_types::{classify, FileKind};
use host_link::{HostLink, OptionsMenu};
use menu_types::{BootRequest, SelectFlags, SelectionLedger};
use sdcard::Filesystem;
use serde::{Deserialize, Serialize};
use services_log::EventLog;
use services_notice::{Notice, Notifier};

/// One navigation request from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuRequest {
    /// (Re)render the current listing
    ShowDir,
    /// Advance one page
    NextPage,
    /// Go back one page
    PrevPage,
    /// Act on a slot of the current page
    Select {
        /// Modifier flags from the host
        flags: SelectFlags,
        /// Slot within the current page
        slot_in_page: u8,
    },
}

/// The one container navigation currently runs in.
///
/// A closed set: the menu browses either the filesystem or exactly one
/// archive opened from it. The suspended root rides along so its directory
/// position survives the archive visit.
enum ActiveContainer {
    Root(RootContainer),
    Archive {
        archive: ArchiveContainer,
        parent: RootContainer,
    },
}

impl ActiveContainer {
    fn current(&mut self) -> &mut dyn PagedContainer {
        match self {
            Self::Root(root) => root,
            Self::Archive { archive, .. } => archive,
        }
    }
}

/// Owns all navigation state and dispatches host requests to the active
/// container.
pub struct NavigationDriver {
    fs: Box<dyn Filesystem>,
    active: ActiveContainer,
    ledger: SelectionLedger,
    log: EventLog,
    boot_buffer: Vec<u8>,
    boot_ready: bool,
}

impl NavigationDriver {
    /// A driver positioned at the filesystem root with an empty ledger.
    pub fn new(fs: Box<dyn Filesystem>) -> Self {
        Self::with_ledger(fs, SelectionLedger::new())
    }

    /// A driver restored from a persisted ledger, for resume after boot.
    pub fn with_ledger(fs: Box<dyn Filesystem>, ledger: SelectionLedger) -> Self {
        Self {
            fs,
            active: ActiveContainer::Root(RootContainer::new()),
            ledger,
            log: EventLog::new(),
            boot_buffer: Vec::new(),
            boot_ready: false,
        }
    }

    /// True once a select committed a boot hand-off.
    pub fn boot_ready(&self) -> bool {
        self.boot_ready
    }

    /// The committed boot record.
    pub fn boot_request(&self) -> &BootRequest {
        &self.ledger.boot
    }

    /// The contents of the boot buffer.
    pub fn boot_payload(&self) -> &[u8] {
        &self.boot_buffer
    }

    /// The selection ledger, for persistence across power cycles.
    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    /// The structured event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// True while an archive container is active.
    pub fn browsing_archive(&self) -> bool {
        matches!(self.active, ActiveContainer::Archive { .. })
    }

    /// Mutable access to the filesystem, for tests that change the medium
    /// underneath the menu.
    pub fn fs_mut(&mut self) -> &mut dyn Filesystem {
        self.fs.as_mut()
    }

    /// Dispatches one host request to the active container and applies the
    /// resulting transition.
    pub fn handle(
        &mut self,
        request: MenuRequest,
        host: &mut dyn HostLink,
        notices: &mut dyn Notifier,
        options: &mut dyn OptionsMenu,
    ) {
        let transition = {
            let Self {
                fs,
                active,
                ledger,
                log,
                boot_buffer,
                ..
            } = self;
            let mut ctx = MenuContext {
                fs: fs.as_mut(),
                host,
                notices,
                options,
                ledger,
                log,
                boot_buffer,
            };
            let container = active.current();
            match request {
                MenuRequest::ShowDir => {
                    container.enter_directory(&mut ctx);
                    Transition::Stay
                }
                MenuRequest::NextPage => {
                    container.next_page(&mut ctx);
                    Transition::Stay
                }
                MenuRequest::PrevPage => {
                    container.previous_page(&mut ctx);
                    Transition::Stay
                }
                MenuRequest::Select {
                    flags,
                    slot_in_page,
                } => container.select(&mut ctx, flags, slot_in_page),
            }
        };
        self.apply(transition, host, notices, options);
    }

    /// Auto-boot entry point: acts on `path` as if it had just been
    /// selected, without browsing to it first.
    ///
    /// Archives are opened and their first program selected; a failure
    /// leaves the archive open as the current container. Plain programs
    /// boot directly; directories become the current listing.
    pub fn start_with_file(
        &mut self,
        path: &str,
        host: &mut dyn HostLink,
        notices: &mut dyn Notifier,
        options: &mut dyn OptionsMenu,
    ) {
        let stat = match self.fs.stat(path) {
            Ok(stat) => stat,
            Err(err) => {
                self.log.error("driver", err.to_string());
                notices.notify(Notice::not_found("File no longer exists", path));
                self.handle(MenuRequest::ShowDir, host, notices, options);
                return;
            }
        };

        let name = path.rsplit('/').next().unwrap_or(path);
        let kind = classify(name, stat.size, stat.is_directory);
        match kind {
            FileKind::None => {
                if let ActiveContainer::Root(root) = &mut self.active {
                    root.set_directory(path);
                }
                self.handle(MenuRequest::ShowDir, host, notices, options);
            }
            FileKind::T64Archive => {
                self.apply(
                    Transition::OpenArchive {
                        path: path.to_string(),
                    },
                    host,
                    notices,
                    options,
                );
                if self.browsing_archive() {
                    self.handle(
                        MenuRequest::Select {
                            flags: SelectFlags::none(),
                            slot_in_page: 1,
                        },
                        host,
                        notices,
                        options,
                    );
                }
            }
            FileKind::Prg | FileKind::P00 => {
                let transition = {
                    let Self {
                        fs,
                        ledger,
                        log,
                        boot_buffer,
                        ..
                    } = self;
                    let mut ctx = MenuContext {
                        fs: fs.as_mut(),
                        host,
                        notices,
                        options,
                        ledger,
                        log,
                        boot_buffer,
                    };
                    boot_program(&mut ctx, path, name, kind)
                };
                if transition == Transition::Stay {
                    // The program failed its checks; fall back to browsing
                    self.handle(MenuRequest::ShowDir, host, notices, options);
                } else {
                    self.apply(transition, host, notices, options);
                }
            }
            _ => {
                notices.notify(Notice::unsupported(name));
                self.handle(MenuRequest::ShowDir, host, notices, options);
            }
        }
    }

    /// Re-opens an archive after a boot without touching the pending
    /// element, so entry resumes at the saved page and slot.
    pub fn resume_archive(
        &mut self,
        path: &str,
        host: &mut dyn HostLink,
        notices: &mut dyn Notifier,
        options: &mut dyn OptionsMenu,
    ) {
        self.boot_ready = false;
        self.open_archive(path, host, notices, options, false);
    }

    fn apply(
        &mut self,
        transition: Transition,
        host: &mut dyn HostLink,
        notices: &mut dyn Notifier,
        options: &mut dyn OptionsMenu,
    ) {
        match transition {
            Transition::Stay => {}
            Transition::ToParent { to_root } => {
                let current =
                    std::mem::replace(&mut self.active, ActiveContainer::Root(RootContainer::new()));
                let mut root = match current {
                    ActiveContainer::Archive { archive, parent } => {
                        // The archive's source handle must be released
                        // before anything else is opened
                        drop(archive);
                        parent
                    }
                    ActiveContainer::Root(root) => root,
                };
                if to_root {
                    root.reset_to_root();
                }
                self.active = ActiveContainer::Root(root);
                self.handle(MenuRequest::ShowDir, host, notices, options);
            }
            Transition::OpenArchive { path } => {
                self.open_archive(&path, host, notices, options, true);
            }
            Transition::Boot => {
                self.boot_ready = true;
                self.log.info("driver", "boot hand-off committed");
            }
        }
    }

    /// Opens `path` as an archive and enters it. On failure the previous
    /// container stays active and is re-rendered.
    ///
    /// A `fresh` descent clears the pending element on success so the
    /// archive starts at its first page; a resume keeps it so entry lands
    /// on the saved slot.
    fn open_archive(
        &mut self,
        path: &str,
        host: &mut dyn HostLink,
        notices: &mut dyn Notifier,
        options: &mut dyn OptionsMenu,
        fresh: bool,
    ) {
        let source = match self.fs.open(path) {
            Ok(source) => source,
            Err(err) => {
                self.log.error("driver", err.to_string());
                notices.notify(Notice::read_failed(path));
                if !fresh {
                    // The saved slot belongs to the archive we could not open
                    self.ledger.clear_pending();
                }
                self.handle(MenuRequest::ShowDir, host, notices, options);
                return;
            }
        };
        let image = match ArchiveImage::open(source) {
            Ok(image) => image,
            Err(err) => {
                self.log.error("driver", err.to_string());
                notices.notify(Notice::unsupported(path));
                if !fresh {
                    self.ledger.clear_pending();
                }
                self.handle(MenuRequest::ShowDir, host, notices, options);
                return;
            }
        };

        if fresh {
            self.ledger.clear_pending();
        }
        let current =
            std::mem::replace(&mut self.active, ActiveContainer::Root(RootContainer::new()));
        let parent = match current {
            ActiveContainer::Root(root) => root,
            ActiveContainer::Archive { parent, .. } => parent,
        };
        self.active = ActiveContainer::Archive {
            archive: ArchiveContainer::new(image, path),
            parent,
        };
        self.handle(MenuRequest::ShowDir, host, notices, options);
    }
}
