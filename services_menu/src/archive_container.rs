//! Paged navigation over an opened archive image
//!
//! The archive source is forward-only, so the container never stores page
//! contents: every render replays the entry cursor from wherever it stands,
//! and going backwards means rewinding and skipping forward again.

use crate::render;
use crate::{MenuContext, PagedContainer, Transition};
use archive_image::format::DESCRIPTION_LEN;
use archive_image::ArchiveImage;
use file_types::{prg_size_valid, FileKind, ROM_BUFFER_CAPACITY};
use host_link::ReplyCode;
use menu_types::{global_slot, page_of, slot_in_page, BootKind, EntryKind, SelectFlags};
use menu_types::{NAME_WIDTH, PAGE_SIZE};
use services_notice::Notice;

/// An opened archive presented as a paged container.
///
/// Holds the only handle to the archive's source; closing the container
/// releases it.
pub struct ArchiveContainer {
    image: ArchiveImage,
    path: String,
    page: u16,
    dir_end: bool,
}

impl ArchiveContainer {
    /// Wraps an opened archive image.
    pub fn new(image: ArchiveImage, path: impl Into<String>) -> Self {
        Self {
            image,
            path: path.into(),
            page: 0,
            dir_end: false,
        }
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sanitized user description from the archive header.
    fn description(&self) -> String {
        let mut text = render::sanitize_name(&self.image.header().description, DESCRIPTION_LEN);
        while text.ends_with(' ') {
            text.pop();
        }
        text
    }

    /// Name shown in the directory row: the archive's file name.
    fn dir_label(&self) -> String {
        self.path
            .rsplit('/')
            .next()
            .unwrap_or(self.path.as_str())
            .to_string()
    }

    /// Renders one page from the current cursor position, marking `selected`
    /// if given. Returns the number of rows sent before the listing ended.
    fn send_page(&mut self, ctx: &mut MenuContext<'_>, selected: Option<u8>) -> usize {
        let quick_label = self.description();
        let mut rendered = 0;
        for in_page in 0..PAGE_SIZE as u8 {
            let global = global_slot(self.page, in_page);
            let mut row = match EntryKind::of_slot(global) {
                EntryKind::ParentLink => render::parent_row(),
                EntryKind::QuickAction => render::quick_action_row(&quick_label),
                EntryKind::RealItem => match self.image.read_next_entry() {
                    Ok(Some(entry)) => render::entry_row(
                        Some(entry.block_count()),
                        &render::sanitize_name(&entry.name, NAME_WIDTH),
                        FileKind::Prg.tag(),
                    ),
                    Ok(None) => {
                        self.dir_end = true;
                        break;
                    }
                    Err(err) => {
                        ctx.log.error("archive", err.to_string());
                        ctx.notices.notify(Notice::read_failed(&self.path));
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

    /// Moves the cursor to the start of `page` by skipping the entries of
    /// every page before it. On a short listing the cursor falls back to
    /// page 0 and `false` is returned.
    fn skip_to_page(&mut self, ctx: &mut MenuContext<'_>, page: u16) -> bool {
        self.page = page;
        let mut success = true;
        // The two synthetic slots of page 0 consume no entries
        let mut index = 2;
        while index < page as usize * PAGE_SIZE {
            match self.image.read_next_entry() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    success = false;
                    break;
                }
                Err(err) => {
                    ctx.log.error("archive", err.to_string());
                    ctx.notices.notify(Notice::read_failed(&self.path));
                    success = false;
                    break;
                }
            }
            index += 1;
        }
        if !success {
            if self.image.rewind().is_err() {
                ctx.notices.notify(Notice::read_failed(&self.path));
            }
            self.page = 0;
        }
        success
    }

    /// Materializes the program under the cursor and commits the boot
    /// hand-off. On any failure the listing is re-rendered and navigation
    /// stays in the archive. A quick-action pick that extracts to an invalid
    /// program counts as "nothing loadable found"; a direct pick reports the
    /// entry itself as unsupported.
    fn boot_current(&mut self, ctx: &mut MenuContext<'_>, quick_action: bool) -> Transition {
        let entry = match self.image.current_entry() {
            Some(entry) => entry.clone(),
            None => return Transition::Stay,
        };
        let name = render::display_name(&entry.name);

        match self
            .image
            .extract_program(ctx.boot_buffer, ROM_BUFFER_CAPACITY as usize)
        {
            Ok(size) if prg_size_valid(size) => {
                ctx.ledger.commit_boot(BootKind::Prg, &name, size, &self.path);
                ctx.log.record(
                    services_log::LogEntry::new(services_log::LogLevel::Info, "archive", "boot")
                        .with_field("name", name.as_str())
                        .with_field("size", size.to_string()),
                );
                ctx.host.send_exit_to_boot();
                Transition::Boot
            }
            Ok(_) => {
                if quick_action {
                    ctx.notices
                        .notify(Notice::not_found("No programs in image", &self.path));
                } else {
                    ctx.notices.notify(Notice::unsupported(&name));
                }
                self.enter_directory(ctx);
                Transition::Stay
            }
            Err(err) => {
                ctx.log.error("archive", err.to_string());
                ctx.notices.notify(Notice::read_failed(&self.path));
                self.enter_directory(ctx);
                Transition::Stay
            }
        }
    }

    /// Opens the first program in the archive (the quick-action slot).
    fn select_first(&mut self, ctx: &mut MenuContext<'_>) -> Transition {
        let found = self.image.rewind().is_ok()
            && matches!(self.image.read_next_entry(), Ok(Some(_)));
        if !found {
            ctx.notices
                .notify(Notice::not_found("No programs in image", &self.path));
            self.enter_directory(ctx);
            return Transition::Stay;
        }
        self.boot_current(ctx, true)
    }

    /// Walks the cursor to the entry at `global` and acts on it.
    fn select_entry(
        &mut self,
        ctx: &mut MenuContext<'_>,
        flags: SelectFlags,
        global: u16,
        in_page: u8,
    ) -> Transition {
        let mut found = self.image.rewind().is_ok();
        if found {
            for _ in 2..=global {
                match self.image.read_next_entry() {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        found = false;
                        break;
                    }
                    Err(err) => {
                        ctx.log.error("archive", err.to_string());
                        ctx.notices.notify(Notice::read_failed(&self.path));
                        found = false;
                        break;
                    }
                }
            }
        }
        if !found {
            // The entry vanished under us; forget the selection and show
            // the listing from the top
            ctx.ledger.clear_pending();
            self.enter_directory(ctx);
            return Transition::Stay;
        }

        if flags.has_options() {
            if let Some(entry) = self.image.current_entry() {
                let name = render::display_name(&entry.name);
                ctx.options.show_options(&name, FileKind::Prg, in_page);
            }
            return Transition::Stay;
        }
        self.boot_current(ctx, false)
    }
}

impl PagedContainer for ArchiveContainer {
    fn enter_directory(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDir);
        if self.image.rewind().is_err() {
            ctx.notices.notify(Notice::read_failed(&self.path));
        }
        ctx.host.send_dir_name(&render::dir_name_row(&self.dir_label()));
        self.dir_end = false;
        self.page = 0;

        match ctx.ledger.pending_element {
            Some(pending) => {
                let target_page = page_of(pending);
                let target_slot = slot_in_page(pending);
                if self.skip_to_page(ctx, target_page) {
                    self.send_page(ctx, Some(target_slot));
                } else {
                    ctx.ledger.clear_pending();
                    self.send_page(ctx, None);
                }
            }
            None => {
                self.send_page(ctx, None);
            }
        }
    }

    fn leave_directory(&mut self, ctx: &mut MenuContext<'_>, to_root: bool) -> Transition {
        ctx.ledger.clear_pending();
        Transition::ToParent { to_root }
    }

    fn next_page(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDirPage);
        if self.dir_end {
            ctx.host.send_page_end();
            return;
        }
        self.page += 1;
        if self.send_page(ctx, None) == 0 {
            // Nothing past the boundary; undo the advance
            self.page -= 1;
        }
    }

    fn previous_page(&mut self, ctx: &mut MenuContext<'_>) {
        ctx.host.send_reply(ReplyCode::ReadDirPage);
        if self.page == 0 {
            ctx.host.send_page_end();
            return;
        }
        if self.image.rewind().is_err() {
            ctx.notices.notify(Notice::read_failed(&self.path));
        }
        self.dir_end = false;
        let target = self.page - 1;
        self.skip_to_page(ctx, target);
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
