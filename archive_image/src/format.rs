//! On-disk layout of the archive header and entry records

/// Size of the archive header in bytes.
pub const HEADER_LEN: usize = 64;

/// Size of one entry record in bytes.
pub const ENTRY_RECORD_LEN: usize = 32;

/// Length of the user description field in the header.
pub const DESCRIPTION_LEN: usize = 24;

/// Length of the name field in an entry record.
pub const ENTRY_NAME_LEN: usize = 16;

/// The archive header.
///
/// Layout: 32-byte signature (must begin with `C64`), version u16le,
/// max-entries u16le, used-entries u16le, 2 pad bytes, 24-byte space-padded
/// user description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Format version
    pub version: u16,
    /// Capacity of the entry table (including free slots)
    pub max_entries: u16,
    /// Number of occupied records in the entry table
    pub used_entries: u16,
    /// Raw user description bytes
    pub description: [u8; DESCRIPTION_LEN],
}

impl Header {
    /// Parses a header from its raw bytes, checking the signature.
    pub fn parse(raw: &[u8; HEADER_LEN]) -> Option<Self> {
        if &raw[0..3] != b"C64" {
            return None;
        }
        let mut description = [0u8; DESCRIPTION_LEN];
        description.copy_from_slice(&raw[40..40 + DESCRIPTION_LEN]);
        Some(Self {
            version: u16::from_le_bytes([raw[32], raw[33]]),
            max_entries: u16::from_le_bytes([raw[34], raw[35]]),
            used_entries: u16::from_le_bytes([raw[36], raw[37]]),
            description,
        })
    }
}

/// One entry record of the table.
///
/// Layout: entry-type u8 (0 = free slot), file-type u8, start-address u16le,
/// end-address u16le, 2 pad, payload-offset u32le, 4 pad, 16-byte
/// space-padded name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// 0 marks a free slot; anything else is occupied
    pub entry_type: u8,
    /// Original file type byte of the stored program
    pub file_type: u8,
    /// Load address of the program
    pub start_address: u16,
    /// Address one past the last program byte
    pub end_address: u16,
    /// Byte offset of the payload within the image
    pub payload_offset: u32,
    /// Raw name bytes, space padded
    pub name: [u8; ENTRY_NAME_LEN],
}

impl EntryRecord {
    /// Parses an entry record from its raw bytes.
    pub fn parse(raw: &[u8; ENTRY_RECORD_LEN]) -> Self {
        let mut name = [0u8; ENTRY_NAME_LEN];
        name.copy_from_slice(&raw[16..32]);
        Self {
            entry_type: raw[0],
            file_type: raw[1],
            start_address: u16::from_le_bytes([raw[2], raw[3]]),
            end_address: u16::from_le_bytes([raw[4], raw[5]]),
            payload_offset: u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
            name,
        }
    }

    /// True if this record is an unused table slot.
    pub fn is_free(&self) -> bool {
        self.entry_type == 0
    }

    /// Payload length implied by the address pair.
    pub fn payload_len(&self) -> u16 {
        self.end_address.wrapping_sub(self.start_address)
    }

    /// Display block count, matching the 254-byte data blocks of the
    /// original medium: size includes the 2-byte load address.
    pub fn block_count(&self) -> u16 {
        let size = self.payload_len().wrapping_add(2);
        size / 254 + 1
    }
}
