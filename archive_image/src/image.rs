//! The forward-only archive cursor

use crate::format::{EntryRecord, Header, ENTRY_RECORD_LEN, HEADER_LEN};
use crate::ArchiveError;
use sdcard::{read_full, SequentialSource};

/// An opened archive image with a forward-only entry cursor.
///
/// After [`open`](ArchiveImage::open) or [`rewind`](ArchiveImage::rewind) the
/// cursor sits before the first entry record. [`read_next_entry`] advances
/// one occupied record at a time. [`extract_program`] moves the underlying
/// stream to the payload region, so the entry cursor is only valid again
/// after another rewind.
///
/// [`read_next_entry`]: ArchiveImage::read_next_entry
/// [`extract_program`]: ArchiveImage::extract_program
pub struct ArchiveImage {
    source: Box<dyn SequentialSource>,
    header: Header,
    records_read: u16,
    yielded: u16,
    current: Option<EntryRecord>,
}

impl ArchiveImage {
    /// Opens an archive over a freshly opened source.
    ///
    /// Reads and validates the header; the cursor is left before the first
    /// entry record.
    pub fn open(mut source: Box<dyn SequentialSource>) -> Result<Self, ArchiveError> {
        let mut raw = [0u8; HEADER_LEN];
        let got = read_full(source.as_mut(), &mut raw)?;
        if got < HEADER_LEN {
            return Err(ArchiveError::BadHeader);
        }
        let header = Header::parse(&raw).ok_or(ArchiveError::BadHeader)?;
        Ok(Self {
            source,
            header,
            records_read: 0,
            yielded: 0,
            current: None,
        })
    }

    /// The parsed archive header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The entry record currently under the cursor, if any.
    pub fn current_entry(&self) -> Option<&EntryRecord> {
        self.current.as_ref()
    }

    /// Restarts the entry cursor from the first record.
    pub fn rewind(&mut self) -> Result<(), ArchiveError> {
        self.source.rewind()?;
        let skipped = self.source.skip(HEADER_LEN)?;
        if skipped < HEADER_LEN {
            return Err(ArchiveError::BadHeader);
        }
        self.records_read = 0;
        self.yielded = 0;
        self.current = None;
        Ok(())
    }

    /// Advances the cursor to the next occupied entry.
    ///
    /// Free table slots are skipped. Returns `None` once every occupied
    /// record has been yielded or the stream ends early.
    pub fn read_next_entry(&mut self) -> Result<Option<EntryRecord>, ArchiveError> {
        loop {
            if self.yielded >= self.header.used_entries
                || self.records_read >= self.header.max_entries
            {
                self.current = None;
                return Ok(None);
            }

            let mut raw = [0u8; ENTRY_RECORD_LEN];
            let got = read_full(self.source.as_mut(), &mut raw)?;
            if got < ENTRY_RECORD_LEN {
                self.current = None;
                return Ok(None);
            }
            self.records_read += 1;

            let record = EntryRecord::parse(&raw);
            if record.is_free() {
                continue;
            }
            self.yielded += 1;
            self.current = Some(record.clone());
            return Ok(Some(record));
        }
    }

    /// Materializes the program under the cursor into `buf`.
    ///
    /// Writes the 2-byte little-endian load address followed by the payload,
    /// bounded by `capacity`. The payload is reached by rewinding and
    /// replaying the stream to the record's offset. Returns the number of
    /// bytes written; a payload that cannot be reached yields 0. Size
    /// validity is the caller's check.
    pub fn extract_program(
        &mut self,
        buf: &mut Vec<u8>,
        capacity: usize,
    ) -> Result<u32, ArchiveError> {
        let entry = self.current.clone().ok_or(ArchiveError::NoEntry)?;
        buf.clear();

        self.source.rewind()?;
        let offset = entry.payload_offset as usize;
        if self.source.skip(offset)? < offset {
            return Ok(0);
        }

        // The stream now points into the payload region; the entry cursor is
        // only valid again after a rewind.
        self.records_read = self.header.max_entries;

        buf.extend_from_slice(&entry.start_address.to_le_bytes());
        let want = (entry.payload_len() as usize).min(capacity.saturating_sub(2));
        let mut payload = vec![0u8; want];
        let got = read_full(self.source.as_mut(), &mut payload)?;
        buf.extend_from_slice(&payload[..got]);

        Ok((2 + got) as u32)
    }

    /// Releases the underlying source handle.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ImageBuilder;
    use sdcard::{Filesystem, MemoryFilesystem};

    fn open_image(bytes: Vec<u8>) -> ArchiveImage {
        let mut fs = MemoryFilesystem::new();
        fs.add_file("/tape.t64", bytes);
        ArchiveImage::open(fs.open("/tape.t64").unwrap()).unwrap()
    }

    fn three_entry_image() -> ArchiveImage {
        let bytes = ImageBuilder::new("DEMO TAPE")
            .entry("FIRST", 0x0801, &[0x11; 100])
            .entry("SECOND", 0x0801, &[0x22; 200])
            .entry("THIRD", 0x1000, &[0x33; 50])
            .build();
        open_image(bytes)
    }

    #[test]
    fn test_open_validates_signature() {
        let mut fs = MemoryFilesystem::new();
        fs.add_file("/bad.t64", vec![0u8; 200]);
        let source = fs.open("/bad.t64").unwrap();
        assert_eq!(
            ArchiveImage::open(source).err(),
            Some(ArchiveError::BadHeader)
        );
    }

    #[test]
    fn test_open_rejects_truncated_header() {
        let mut fs = MemoryFilesystem::new();
        fs.add_file("/short.t64", b"C64 tape".to_vec());
        let source = fs.open("/short.t64").unwrap();
        assert_eq!(
            ArchiveImage::open(source).err(),
            Some(ArchiveError::BadHeader)
        );
    }

    #[test]
    fn test_read_entries_in_order() {
        let mut image = three_entry_image();
        let first = image.read_next_entry().unwrap().unwrap();
        assert_eq!(&first.name[..5], b"FIRST");
        let second = image.read_next_entry().unwrap().unwrap();
        assert_eq!(&second.name[..6], b"SECOND");
        let third = image.read_next_entry().unwrap().unwrap();
        assert_eq!(&third.name[..5], b"THIRD");
        assert_eq!(image.read_next_entry().unwrap(), None);
    }

    #[test]
    fn test_free_slots_are_skipped() {
        let bytes = ImageBuilder::new("SPARSE")
            .entry("ONE", 0x0801, &[0x11; 10])
            .free_slot()
            .entry("TWO", 0x0801, &[0x22; 10])
            .build();
        let mut image = open_image(bytes);
        assert_eq!(&image.read_next_entry().unwrap().unwrap().name[..3], b"ONE");
        assert_eq!(&image.read_next_entry().unwrap().unwrap().name[..3], b"TWO");
        assert_eq!(image.read_next_entry().unwrap(), None);
    }

    #[test]
    fn test_rewind_replays_from_first_entry() {
        let mut image = three_entry_image();
        image.read_next_entry().unwrap();
        image.read_next_entry().unwrap();

        image.rewind().unwrap();
        let first = image.read_next_entry().unwrap().unwrap();
        assert_eq!(&first.name[..5], b"FIRST");
    }

    #[test]
    fn test_extract_program() {
        let mut image = three_entry_image();
        image.read_next_entry().unwrap();
        let second = image.read_next_entry().unwrap().unwrap();
        assert_eq!(second.payload_len(), 200);

        let mut buf = Vec::new();
        let size = image.extract_program(&mut buf, 64 * 1024).unwrap();
        assert_eq!(size, 202);
        assert_eq!(&buf[..2], &0x0801u16.to_le_bytes());
        assert!(buf[2..].iter().all(|&b| b == 0x22));
    }

    #[test]
    fn test_extract_bounded_by_capacity() {
        let mut image = three_entry_image();
        image.read_next_entry().unwrap();
        let mut buf = Vec::new();
        let size = image.extract_program(&mut buf, 50).unwrap();
        assert_eq!(size, 50);
        assert_eq!(buf.len(), 50);
    }

    #[test]
    fn test_extract_without_cursor_is_an_error() {
        let mut image = three_entry_image();
        let mut buf = Vec::new();
        assert_eq!(
            image.extract_program(&mut buf, 1024).err(),
            Some(ArchiveError::NoEntry)
        );
    }

    #[test]
    fn test_extract_unreachable_payload_yields_zero() {
        // The second payload starts beyond the truncated end of the file
        let mut bytes = ImageBuilder::new("TRUNCATED")
            .entry("GAME", 0x0801, &[0x44; 100])
            .entry("LOST", 0x0801, &[0x55; 100])
            .build();
        bytes.truncate(bytes.len() - 150);
        let mut image = open_image(bytes);
        image.read_next_entry().unwrap();
        image.read_next_entry().unwrap();

        let mut buf = Vec::new();
        assert_eq!(image.extract_program(&mut buf, 1024).unwrap(), 0);
    }

    #[test]
    fn test_cursor_invalid_after_extract_until_rewind() {
        let mut image = three_entry_image();
        image.read_next_entry().unwrap();
        let mut buf = Vec::new();
        image.extract_program(&mut buf, 1024).unwrap();

        assert_eq!(image.read_next_entry().unwrap(), None);
        image.rewind().unwrap();
        assert!(image.read_next_entry().unwrap().is_some());
    }
}
