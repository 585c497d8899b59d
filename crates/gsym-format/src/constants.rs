/// Magic bytes identifying a gsym store file.
pub const MAGIC: [u8; 4] = *b"GSYM";

/// Current format version.
pub const VERSION: u32 = 1;

/// Section alignment in bytes.
pub const SECTION_ALIGN: usize = 64;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Written as a little-endian u16; reads back as 0x0201 on a byte-swapped file.
pub const BYTE_ORDER_MARK: u16 = 0x0102;
