//! Archive image builder
//!
//! Produces well-formed image bytes for tests and the simulator. Payloads
//! are laid out back to back after the entry table, with offsets filled in
//! automatically.

use crate::format::{DESCRIPTION_LEN, ENTRY_NAME_LEN, ENTRY_RECORD_LEN, HEADER_LEN};

enum Slot {
    Free,
    Entry {
        name: String,
        start_address: u16,
        payload: Vec<u8>,
    },
}

/// Builder for sequential archive images.
pub struct ImageBuilder {
    description: String,
    max_entries: Option<u16>,
    slots: Vec<Slot>,
}

impl ImageBuilder {
    /// Starts an image with the given user description.
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            max_entries: None,
            slots: Vec::new(),
        }
    }

    /// Overrides the table capacity (defaults to the number of slots added).
    pub fn max_entries(mut self, max: u16) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Appends an occupied entry.
    pub fn entry(mut self, name: &str, start_address: u16, payload: &[u8]) -> Self {
        self.slots.push(Slot::Entry {
            name: name.to_string(),
            start_address,
            payload: payload.to_vec(),
        });
        self
    }

    /// Appends a free table slot.
    pub fn free_slot(mut self) -> Self {
        self.slots.push(Slot::Free);
        self
    }

    /// Produces the image bytes.
    pub fn build(self) -> Vec<u8> {
        let max = self.max_entries.unwrap_or(self.slots.len() as u16);
        let used = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Entry { .. }))
            .count() as u16;

        let mut image = vec![0u8; HEADER_LEN + max as usize * ENTRY_RECORD_LEN];
        image[0..3].copy_from_slice(b"C64");
        image[32..34].copy_from_slice(&0x0100u16.to_le_bytes());
        image[34..36].copy_from_slice(&max.to_le_bytes());
        image[36..38].copy_from_slice(&used.to_le_bytes());
        let mut description = [b' '; DESCRIPTION_LEN];
        for (i, byte) in self.description.bytes().take(DESCRIPTION_LEN).enumerate() {
            description[i] = byte;
        }
        image[40..40 + DESCRIPTION_LEN].copy_from_slice(&description);

        let mut payload_offset = image.len() as u32;
        let mut payloads = Vec::new();
        for (index, slot) in self.slots.iter().enumerate().take(max as usize) {
            let record_at = HEADER_LEN + index * ENTRY_RECORD_LEN;
            let Slot::Entry {
                name,
                start_address,
                payload,
            } = slot
            else {
                continue;
            };

            let record = &mut image[record_at..record_at + ENTRY_RECORD_LEN];
            record[0] = 1;
            record[1] = 0x82; // stored program type on the original medium
            record[2..4].copy_from_slice(&start_address.to_le_bytes());
            let end_address = start_address.wrapping_add(payload.len() as u16);
            record[4..6].copy_from_slice(&end_address.to_le_bytes());
            record[8..12].copy_from_slice(&payload_offset.to_le_bytes());
            let mut padded = [b' '; ENTRY_NAME_LEN];
            for (i, byte) in name.bytes().take(ENTRY_NAME_LEN).enumerate() {
                padded[i] = byte;
            }
            record[16..32].copy_from_slice(&padded);

            payload_offset += payload.len() as u32;
            payloads.push(payload.clone());
        }

        for payload in payloads {
            image.extend_from_slice(&payload);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Header;

    #[test]
    fn test_build_header() {
        let bytes = ImageBuilder::new("MY TAPE")
            .entry("A", 0x0801, &[1, 2, 3])
            .free_slot()
            .entry("B", 0x0801, &[4])
            .build();

        let mut raw = [0u8; HEADER_LEN];
        raw.copy_from_slice(&bytes[..HEADER_LEN]);
        let header = Header::parse(&raw).unwrap();
        assert_eq!(header.max_entries, 3);
        assert_eq!(header.used_entries, 2);
        assert_eq!(&header.description[..7], b"MY TAPE");
    }

    #[test]
    fn test_payloads_follow_table() {
        let bytes = ImageBuilder::new("T")
            .entry("A", 0x0801, &[0xAA; 4])
            .entry("B", 0x0801, &[0xBB; 2])
            .build();

        let table_end = HEADER_LEN + 2 * ENTRY_RECORD_LEN;
        assert_eq!(&bytes[table_end..table_end + 4], &[0xAA; 4]);
        assert_eq!(&bytes[table_end + 4..table_end + 6], &[0xBB; 2]);
    }

    #[test]
    fn test_empty_image() {
        let bytes = ImageBuilder::new("EMPTY").max_entries(10).build();
        assert_eq!(bytes.len(), HEADER_LEN + 10 * ENTRY_RECORD_LEN);
    }
}
