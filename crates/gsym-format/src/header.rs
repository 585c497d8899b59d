//! Store file header (64 bytes).
//!
//! Layout:
//! - 0-15: identity and sizes (magic, version, checksum, total_size)
//! - 16-19: byte-order marker (u16), address size (u8), reserved (u8)
//! - 20-23: function count
//! - 24-47: offset/size pairs for index, strings, payload
//! - 48-63: reserved

use crate::constants::{BYTE_ORDER_MARK, HEADER_SIZE, MAGIC, SECTION_ALIGN, VERSION};
use crate::error::FormatError;
use crate::index::AddressSize;

/// File header - first 64 bytes of a store file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Header {
    /// Magic bytes: b"GSYM"
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    pub total_size: u32,

    pub byte_order: u16,
    /// Width of index addresses in bytes (4 or 8).
    pub addr_size: u8,
    pub _pad: u8,
    pub function_count: u32,

    pub index_offset: u32,
    pub index_size: u32,
    pub strings_offset: u32,
    pub strings_size: u32,
    pub payload_offset: u32,
    pub payload_size: u32,

    pub _reserved: [u8; 16],
}

const _: () = assert!(std::mem::size_of::<Header>() == HEADER_SIZE);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            byte_order: BYTE_ORDER_MARK,
            addr_size: 4,
            _pad: 0,
            function_count: 0,
            index_offset: 0,
            index_size: 0,
            strings_offset: 0,
            strings_size: 0,
            payload_offset: 0,
            payload_size: 0,
            _reserved: [0; 16],
        }
    }
}

/// Section name, used in diagnostics and dumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sections {
    Index,
    Strings,
    Payload,
}

impl Sections {
    pub fn as_str(self) -> &'static str {
        match self {
            Sections::Index => "index",
            Sections::Strings => "strings",
            Sections::Payload => "payload",
        }
    }
}

impl std::fmt::Display for Sections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

impl Header {
    /// Decode header from the first 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::FileTooSmall(bytes.len()));
        }

        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&bytes[48..64]);

        Ok(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(bytes, 4),
            checksum: u32_at(bytes, 8),
            total_size: u32_at(bytes, 12),
            byte_order: u16::from_le_bytes([bytes[16], bytes[17]]),
            addr_size: bytes[18],
            _pad: bytes[19],
            function_count: u32_at(bytes, 20),
            index_offset: u32_at(bytes, 24),
            index_size: u32_at(bytes, 28),
            strings_offset: u32_at(bytes, 32),
            strings_size: u32_at(bytes, 36),
            payload_offset: u32_at(bytes, 40),
            payload_size: u32_at(bytes, 44),
            _reserved: reserved,
        })
    }

    /// Encode header to 64 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..18].copy_from_slice(&self.byte_order.to_le_bytes());
        bytes[18] = self.addr_size;
        bytes[19] = self._pad;
        bytes[20..24].copy_from_slice(&self.function_count.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.index_offset.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.index_size.to_le_bytes());
        bytes[32..36].copy_from_slice(&self.strings_offset.to_le_bytes());
        bytes[36..40].copy_from_slice(&self.strings_size.to_le_bytes());
        bytes[40..44].copy_from_slice(&self.payload_offset.to_le_bytes());
        bytes[44..48].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes[48..64].copy_from_slice(&self._reserved);
        bytes
    }

    /// Check identity fields: magic, version, byte order and address width.
    pub fn validate_identity(&self) -> Result<AddressSize, FormatError> {
        if self.magic != MAGIC {
            return Err(FormatError::InvalidMagic);
        }
        if self.version != VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }
        if self.byte_order != BYTE_ORDER_MARK {
            return Err(FormatError::UnsupportedByteOrder(self.byte_order));
        }
        AddressSize::from_width(self.addr_size)
            .ok_or(FormatError::UnsupportedAddressSize(self.addr_size))
    }

    /// Offset and size of a section.
    pub fn section(&self, section: Sections) -> (u32, u32) {
        match section {
            Sections::Index => (self.index_offset, self.index_size),
            Sections::Strings => (self.strings_offset, self.strings_size),
            Sections::Payload => (self.payload_offset, self.payload_size),
        }
    }

    /// Check that every section lies after the header, inside `total_size`,
    /// is aligned, and that sections appear in order without overlap.
    pub fn validate_sections(&self) -> Result<(), FormatError> {
        let mut floor = HEADER_SIZE as u64;
        for section in [Sections::Index, Sections::Strings, Sections::Payload] {
            let (offset, size) = self.section(section);
            let end = offset as u64 + size as u64;
            let aligned = offset as usize % SECTION_ALIGN == 0;
            if (offset as u64) < floor || end > self.total_size as u64 || !aligned {
                return Err(FormatError::SectionOutOfBounds {
                    section,
                    offset,
                    size,
                });
            }
            floor = end;
        }
        Ok(())
    }
}

/// Round `offset` up to the next multiple of `align`.
pub fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}
