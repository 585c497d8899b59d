//! Address index: one fixed-width entry per function, sorted by start.

use gsym_core::Range;

use crate::error::FormatError;

/// Width of addresses in the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressSize {
    #[default]
    Four,
    Eight,
}

impl AddressSize {
    pub fn from_width(width: u8) -> Option<Self> {
        match width {
            4 => Some(AddressSize::Four),
            8 => Some(AddressSize::Eight),
            _ => None,
        }
    }

    /// Smallest width that can represent `max_end`.
    pub fn for_max_address(max_end: u64) -> Self {
        if max_end <= u32::MAX as u64 {
            AddressSize::Four
        } else {
            AddressSize::Eight
        }
    }

    #[inline]
    pub fn width(self) -> usize {
        match self {
            AddressSize::Four => 4,
            AddressSize::Eight => 8,
        }
    }

    /// Bytes per index entry: start, end, payload offset (u32).
    #[inline]
    pub fn entry_size(self) -> usize {
        self.width() * 2 + 4
    }
}

/// Decoded index entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub range: Range,
    /// Offset of the function's block within the payload region.
    pub payload_offset: u32,
}

impl IndexEntry {
    /// Append the encoded entry to `out`. Addresses must fit `size`.
    pub fn write(&self, size: AddressSize, out: &mut Vec<u8>) {
        write_addr(self.range.start(), size, out);
        write_addr(self.range.end(), size, out);
        out.extend_from_slice(&self.payload_offset.to_le_bytes());
    }
}

fn write_addr(addr: u64, size: AddressSize, out: &mut Vec<u8>) {
    match size {
        AddressSize::Four => {
            debug_assert!(addr <= u32::MAX as u64);
            out.extend_from_slice(&(addr as u32).to_le_bytes());
        }
        AddressSize::Eight => out.extend_from_slice(&addr.to_le_bytes()),
    }
}

fn read_addr(bytes: &[u8], size: AddressSize) -> u64 {
    match size {
        AddressSize::Four => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
        AddressSize::Eight => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[..8]);
            u64::from_le_bytes(buf)
        }
    }
}

/// View into the index region.
#[derive(Clone, Copy, Debug)]
pub struct IndexView<'a> {
    bytes: &'a [u8],
    size: AddressSize,
    count: usize,
}

impl<'a> IndexView<'a> {
    /// `bytes` must hold at least `count` entries.
    pub(crate) fn new(bytes: &'a [u8], size: AddressSize, count: usize) -> Self {
        debug_assert!(bytes.len() >= count * size.entry_size());
        Self { bytes, size, count }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn address_size(&self) -> AddressSize {
        self.size
    }

    fn raw(&self, index: usize) -> (u64, u64, u32) {
        let width = self.size.width();
        let at = index * self.size.entry_size();
        let entry = &self.bytes[at..at + self.size.entry_size()];
        let start = read_addr(entry, self.size);
        let end = read_addr(&entry[width..], self.size);
        let off = &entry[width * 2..];
        (start, end, u32::from_le_bytes([off[0], off[1], off[2], off[3]]))
    }

    /// Decode entry `index`, checking that its range is not inverted.
    ///
    /// Panics if `index >= len()`.
    pub fn entry(&self, index: usize) -> Result<IndexEntry, FormatError> {
        let (start, end, payload_offset) = self.raw(index);
        let range = Range::new(start, end).map_err(|_| FormatError::CorruptIndex {
            index,
            reason: "range end precedes start",
        })?;
        Ok(IndexEntry {
            range,
            payload_offset,
        })
    }

    /// Range of entry `index`. Inverted ranges come back empty at `start`;
    /// [`validate`](Self::validate) rejects those at load.
    #[inline]
    pub fn range(&self, index: usize) -> Range {
        let (start, end, _) = self.raw(index);
        Range::new(start, end).unwrap_or(Range::empty_at(start))
    }

    #[inline]
    pub fn payload_offset(&self, index: usize) -> u32 {
        self.raw(index).2
    }

    /// Check every entry: ranges well-formed, starts strictly ascending,
    /// payload offsets inside a payload region of `payload_size` bytes.
    pub fn validate(&self, payload_size: u32) -> Result<(), FormatError> {
        let mut previous: Option<u64> = None;
        for index in 0..self.count {
            let entry = self.entry(index)?;
            if previous.is_some_and(|prev| entry.range.start() <= prev) {
                return Err(FormatError::CorruptIndex {
                    index,
                    reason: "start addresses not strictly ascending",
                });
            }
            if entry.payload_offset >= payload_size {
                return Err(FormatError::CorruptOffset {
                    index,
                    offset: entry.payload_offset,
                });
            }
            previous = Some(entry.range.start());
        }
        Ok(())
    }
}
