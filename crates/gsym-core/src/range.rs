//! Half-open address ranges.

use std::fmt;

/// Error produced by range construction and combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// `start` is greater than `end`.
    #[error("inverted range: start {start:#x} > end {end:#x}")]
    Inverted { start: u64, end: u64 },

    /// The two ranges neither overlap nor abut, so their union is not a range.
    #[error("cannot union disjoint ranges {left} and {right}")]
    Disjoint { left: Range, right: Range },
}

/// Address interval `[start, end)`.
///
/// Ordering is lexicographic on `(start, end)`. A zero-size range
/// (`start == end`) is valid and contains no address.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub struct Range {
    start: u64,
    end: u64,
}

impl Range {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a range from a start address and a size.
    ///
    /// Saturates at `u64::MAX` instead of wrapping.
    pub fn from_size(start: u64, size: u64) -> Self {
        Self {
            start,
            end: start.saturating_add(size),
        }
    }

    /// Zero-size range at `addr` (symbol-table entry without a size).
    pub fn empty_at(addr: u64) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    #[inline]
    pub fn start(self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(self) -> u64 {
        self.end
    }

    #[inline]
    pub fn size(self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `addr` lies in `[start, end)`. Always false for zero-size ranges.
    #[inline]
    pub fn contains(self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }

    /// Whether `other` lies entirely inside `self`.
    ///
    /// A zero-size range is inside `self` when its address is in `[start, end]`.
    #[inline]
    pub fn contains_range(self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one address.
    #[inline]
    pub fn intersects(self, other: Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest range covering both, defined only when they overlap or abut.
    pub fn union(self, other: Range) -> Result<Range, RangeError> {
        if self.start > other.end || other.start > self.end {
            return Err(RangeError::Disjoint {
                left: self,
                right: other,
            });
        }
        Ok(Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x})", self.start, self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Wire shape for serde; validation happens in `TryFrom`.
#[derive(serde::Serialize, serde::Deserialize)]
struct RawRange {
    start: u64,
    end: u64,
}

impl TryFrom<RawRange> for Range {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Range::new(raw.start, raw.end)
    }
}

impl From<Range> for RawRange {
    fn from(range: Range) -> Self {
        RawRange {
            start: range.start,
            end: range.end,
        }
    }
}
