//! Per-function address→line mapping.

use crate::strings::FileRef;

/// One row of a line table: code at `address` (up to the next row) comes
/// from `file:line`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LineEntry {
    pub address: u64,
    pub file: FileRef,
    pub line: u32,
}

impl LineEntry {
    pub fn new(address: u64, file: FileRef, line: u32) -> Self {
        Self {
            address,
            file,
            line,
        }
    }
}

/// Line table construction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineTableError {
    #[error("line entry {index} at {address:#x} is not above the previous entry")]
    NotAscending { index: usize, address: u64 },
}

/// Line entries sorted strictly ascending by address.
///
/// Compares lexicographically, element by element.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct LineTable(Vec<LineEntry>);

impl LineTable {
    /// Wrap entries that are already strictly ascending by address.
    pub fn new(entries: Vec<LineEntry>) -> Result<Self, LineTableError> {
        for (index, pair) in entries.windows(2).enumerate() {
            if pair[1].address <= pair[0].address {
                return Err(LineTableError::NotAscending {
                    index: index + 1,
                    address: pair[1].address,
                });
            }
        }
        Ok(Self(entries))
    }

    #[inline]
    pub fn entries(&self) -> &[LineEntry] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&LineEntry> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&LineEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineEntry> {
        self.0.iter()
    }

    /// Entry with the greatest address `<= addr`.
    ///
    /// Does not check the upper bound; callers already know `addr` is inside
    /// the owning function.
    pub fn lookup(&self, addr: u64) -> Option<&LineEntry> {
        let idx = self.0.partition_point(|e| e.address <= addr);
        idx.checked_sub(1).map(|i| &self.0[i])
    }

    pub fn into_vec(self) -> Vec<LineEntry> {
        self.0
    }
}

impl<'a> IntoIterator for &'a LineTable {
    type Item = &'a LineEntry;
    type IntoIter = std::slice::Iter<'a, LineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
