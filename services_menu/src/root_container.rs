//! Paged navigation over the SD filesystem
//!
//! Unlike an archive, a directory listing can be snapshotted, so this
//! container re-reads the listing on entry and pages over the snapshot.
//! Slot numbering and the resume protocol are identical to the archive
//! container: slot 0 is the parent link, slot 1 the wildcard, slots from 2
//! map to listing entries in source order.

use crate::render;
use crate::{MenuContext, PagedContainer, Transition};
use file_types::{classify, prg_size_valid, FileKind, P00_HEADER_LEN, ROM_BUFFER_CAPACITY};
use host_link::ReplyCode;
use menu_types::{global_slot, page_of, slot_in_page, BootKind, EntryKind, SelectFlags};
use menu_types::{NAME_WIDTH, PAGE_SIZE};
use sdcard::{read_full, DirEntry};
use services_log::{LogEntry, LogLevel};
use services_notice::Notice;

/// The SD filesystem presented as a paged container.
pub struct RootContainer {
    cwd: String,
    entries: Vec<DirEntry>,
    page: u16,
    dir_end: bool,
}

impl Default for RootContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl RootContainer {
    /// A container positioned at the filesystem root.
    pub fn new() -> Self {
        Self {
            cwd: "/".to_string(),
            entries: Vec::new(),
            page: 0,
            dir_end: false,
        }
    }

    /// The current directory path.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Moves back to the filesystem root without rendering.
    pub fn reset_to_root(&mut self) {
        self.cwd = "/".to_string();
        self.entries.clear();
        self.page = 0;
        self.dir_end = false;
    }

    /// Positions the container at `path` without rendering.
    pub fn set_directory(&mut self, path: impl Into<String>) {
        self.cwd = path.into();
        self.entries.clear();
        self.page = 0;
        self.dir_end = false;
    }

    /// Re-reads the listing. A directory that fails to list degrades to the
    /// filesystem root, and a root that fails to list shows empty.
    fn refresh(&mut self, ctx: &mut MenuContext<'_>) {
        match ctx.fs.read_dir(&self.cwd) {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                ctx.log.error("root", err.to_string());
                ctx.notices.notify(Notice::read_failed(&self.cwd));
                if self.cwd != "/" {
                    self.cwd = "/".to_string();
                    self.entries = ctx.fs.read_dir("/").unwrap_or_default();
                } else {
                    self.entries.clear();
                }
            }
        }
    }

    /// True if `page` has at least one slot in the current listing.
    fn reachable(&self, page: u16) -> bool {
        (page as usize) * PAGE_SIZE < self.entries.len() + 2
    }

    fn entry_path(&self, name: &str) -> String {
        if self.cwd == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.cwd)
        }
    }

    /// Renders one page of the snapshot, marking `selected` if given.
    /// Returns the number of rows sent.
    fn send_page(&mut self, ctx: &mut MenuContext<'_>, selected: Option<u8>) -> usize {
        let mut rendered = 0;
        for in_page in 0..PAGE_SIZE as u8 {
            let global = global_slot(self.page, in_page);
            let mut row = match EntryKind::of_slot(global) {
                EntryKind::ParentLink => render::parent_row(),
                EntryKind::QuickAction => render::quick_action_row(""),
                EntryKind::RealItem => match self.entries.get((global - 2) as usize) {
                    Some(entry) => {
                        let kind = classify(&entry.name, entry.size, entry.is_directory);
                        let blocks = if entry.is_directory {
                            None
                        } else {
                            Some((entry.size / 254 + 1).min(u16::MAX as u32) as u16)
                        };
                        render::entry_row(
                            blocks,
                            &render::sanitize_name(entry.name.as_bytes(), NAME_WIDTH),
                            kind.tag(),
                        )
                    }
                    None => {
                        self.dir_end = true;
                        break;
                    }
                },
            };
            if selected == Some(in_page) {
                row.mark_selected();
            }
            ctx.host.send_row(&row);
            rendered += 1;
        }
        ctx.host.send_page_end();
        rendered
    }

    /// Opens the first loadable program in the listing (the wildcard slot).
    fn select_first(&mut self, ctx: &mut MenuContext<'_>) -> Transition {
        let first = self.entries.iter().find(|entry| {
            classify(&entry.name, entry.size, entry.is_directory).is_program()
        });
        match first.cloned() {
            Some(entry) => {
                let kind = classify(&entry.name, entry.size, entry.is_directory);
                let path = self.entry_path(&entry.name);
                let name = render::display_name(entry.name.as_bytes());
                boot_program(ctx, &path, &name, kind)
            }
            None => {
                ctx.notices
                    .notify(Notice::not_found("No loadable program here", &self.cwd));
                self.enter_directory(ctx);
                Transition::Stay
            }
        }
    }

    fn select_entry(
        &mut self,
        ctx: &mut MenuContext<'_>,
        flags: SelectFlags,
        global: u16,
        in_page: u8,
    ) -> Transition {
        let entry = match self.entries.get((global - 2) as usize).cloned() {
            Some(entry) => entry,
            None => {
                // Selection beyond the listing; show it again from the top
                ctx.ledger.clear_pending();
                self.enter_directory(ctx);
                return Transition::Stay;
            }
        };
        let path = self.entry_path(&entry.name);
        if ctx.fs.stat(&path).is_err() {
            ctx.notices
                .notify(Notice::not_found("File no longer exists", &path));
            ctx.ledger.clear_pending();
            self.enter_directory(ctx);
            return Transition::Stay;
        }

        let kind = classify(&entry.name, entry.size, entry.is_directory);
        let name = render::display_name(entry.name.as_bytes());
        if flags.has_options() {
            ctx.options.show_options(&name, kind, in_page);
            return Transition::Stay;
        }

        match kind {
            FileKind::None => {
                ctx.ledger.clear_pending();
                self.cwd = path;
                self.page = 0;
                self.enter_directory(ctx);
                Transition::Stay
            }
            FileKind::Prg | FileKind::P00 => boot_program(ctx, &path, &name, kind),
            FileKind::T64Archive => Transition::OpenArchive { path },
            _ => {
                ctx.notices.notify(Notice::unsupported(&name));
                Transition::Stay
            }
        }
    }
}

impl PagedContainer for RootContainer {
    fn enter_directory(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDir);
        self.refresh(ctx);
        ctx.host.send_dir_name(&render::dir_name_row(&self.cwd));
        self.dir_end = false;
        self.page = 0;

        if let Some(pending) = ctx.ledger.pending_element {
            let target_page = page_of(pending);
            if self.reachable(target_page) {
                self.page = target_page;
                self.send_page(ctx, Some(slot_in_page(pending)));
                return;
            }
            ctx.ledger.clear_pending();
        }
        self.send_page(ctx, None);
    }

    fn leave_directory(&mut self, ctx: &mut MenuContext<'_>, to_root: bool) -> Transition {
        ctx.ledger.clear_pending();
        if to_root || self.cwd == "/" {
            self.cwd = "/".to_string();
        } else {
            let parent = match self.cwd.rfind('/') {
                Some(0) | None => "/".to_string(),
                Some(cut) => self.cwd[..cut].to_string(),
            };
            self.cwd = parent;
        }
        self.page = 0;
        self.enter_directory(ctx);
        Transition::Stay
    }

    fn next_page(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDirPage);
        if self.dir_end {
            ctx.host.send_page_end();
            return;
        }
        self.page += 1;
        if self.send_page(ctx, None) == 0 {
            self.page -= 1;
        }
    }

    fn previous_page(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDirPage);
        if self.page == 0 {
            ctx.host.send_page_end();
            return;
        }
        self.page -= 1;
        self.dir_end = false;
        self.send_page(ctx, None);
    }

    fn select(
        &mut self,
        ctx: &mut MenuContext<'_>,
        flags: SelectFlags,
        slot_in_page: u8,
    ) -> Transition {
        let global = global_slot(self.page, slot_in_page);
        ctx.ledger.begin_selection(global);

        match EntryKind::of_slot(global) {
            EntryKind::ParentLink => {
                if flags.has_options() {
                    ctx.options.show_options("..", FileKind::None, slot_in_page);
                    return Transition::Stay;
                }
                self.leave_directory(ctx, false)
            }
            EntryKind::QuickAction => {
                if flags.has_options() {
                    ctx.options.show_options("*", FileKind::Prg, slot_in_page);
                    return Transition::Stay;
                }
                self.select_first(ctx)
            }
            EntryKind::RealItem => self.select_entry(ctx, flags, global, slot_in_page),
        }
    }
}

/// Materializes a program file into the boot buffer and commits the boot
/// hand-off. P00 containers have their header skipped first.
pub(crate) fn boot_program(
    ctx: &mut MenuContext<'_>,
    path: &str,
    display_name: &str,
    kind: FileKind,
) -> Transition {
    let mut source = match ctx.fs.open(path) {
        Ok(source) => source,
        Err(err) => {
            ctx.log.error("root", err.to_string());
            ctx.notices.notify(Notice::read_failed(path));
            return Transition::Stay;
        }
    };

    if kind == FileKind::P00 {
        match source.skip(P00_HEADER_LEN as usize) {
            Ok(n) if n == P00_HEADER_LEN as usize => {}
            Ok(_) => {
                ctx.notices.notify(Notice::unsupported(display_name));
                return Transition::Stay;
            }
            Err(err) => {
                ctx.log.error("root", err.to_string());
                ctx.notices.notify(Notice::read_failed(path));
                return Transition::Stay;
            }
        }
    }

    ctx.boot_buffer.clear();
    ctx.boot_buffer.resize(ROM_BUFFER_CAPACITY as usize, 0);
    let got = match read_full(source.as_mut(), ctx.boot_buffer) {
        Ok(got) => got,
        Err(err) => {
            ctx.log.error("root", err.to_string());
            ctx.notices.notify(Notice::read_failed(path));
            ctx.boot_buffer.clear();
            return Transition::Stay;
        }
    };
    ctx.boot_buffer.truncate(got);

    let size = got as u32;
    if !prg_size_valid(size) {
        ctx.notices.notify(Notice::unsupported(display_name));
        ctx.boot_buffer.clear();
        return Transition::Stay;
    }

    ctx.ledger.commit_boot(BootKind::Prg, display_name, size, path);
    ctx.log.record(
        LogEntry::new(LogLevel::Info, "root", "boot")
            .with_field("name", display_name)
            .with_field("size", size.to_string()),
    );
    ctx.host.send_exit_to_boot();
    Transition::Boot
}
