//! Deduplicated string storage addressed by byte offset.
//!
//! Strings live in a single arena of NUL-terminated UTF-8 bytes. A
//! [`StringRef`] is the byte offset of a string's first byte, so the arena can
//! be written to disk as-is and references stay valid after decoding.
//!
//! Byte 0 of every pool is a NUL: offset 0 resolves to the empty string and
//! doubles as the "no name" sentinel.

use std::collections::HashMap;

/// Offset of a string inside a [`StringPool`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct StringRef(pub u32);

impl StringRef {
    /// The reserved "no name" offset.
    pub const NONE: Self = Self(0);

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Reference to a source file path (stored in the string pool).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct FileRef(pub StringRef);

impl FileRef {
    /// Unknown file.
    pub const UNKNOWN: Self = Self(StringRef::NONE);

    #[inline]
    pub fn path(self) -> StringRef {
        self.0
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self.0.is_none()
    }
}

/// String lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StringPoolError {
    #[error("invalid string offset {0}")]
    InvalidOffset(u32),
    #[error("string at offset {0} is not valid UTF-8")]
    InvalidUtf8(u32),
    #[error("string region must start and end with a NUL byte")]
    MalformedBlob,
    #[error("string contains a NUL byte")]
    InteriorNul,
    #[error("string pool exceeds {} bytes", u32::MAX)]
    PoolFull,
}

/// Anything that can turn a [`StringRef`] back into text.
///
/// Implemented by the owned [`StringPool`] and by borrowed views over an
/// encoded string region.
pub trait StringLookup {
    fn resolve(&self, sym: StringRef) -> Result<&str, StringPoolError>;

    /// Resolve a file reference to its path.
    fn resolve_file(&self, file: FileRef) -> Result<&str, StringPoolError> {
        self.resolve(file.path())
    }
}

/// Resolve `sym` inside a raw NUL-terminated string region.
///
/// The offset must sit on a string boundary: offset 0 or right after a NUL.
pub fn resolve_in(blob: &[u8], sym: StringRef) -> Result<&str, StringPoolError> {
    let offset = sym.0 as usize;
    if offset >= blob.len() || (offset != 0 && blob[offset - 1] != 0) {
        return Err(StringPoolError::InvalidOffset(sym.0));
    }
    let rest = &blob[offset..];
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(StringPoolError::InvalidOffset(sym.0))?;
    std::str::from_utf8(&rest[..len]).map_err(|_| StringPoolError::InvalidUtf8(sym.0))
}

/// Offset for a string of `len` bytes appended to an arena of `blob_len`
/// bytes. The string and its NUL must end within `u32` range.
pub(crate) fn next_offset(blob_len: usize, len: usize) -> Result<u32, StringPoolError> {
    let offset = u32::try_from(blob_len).map_err(|_| StringPoolError::PoolFull)?;
    u32::try_from(len)
        .ok()
        .and_then(|len| offset.checked_add(len)?.checked_add(1))
        .ok_or(StringPoolError::PoolFull)?;
    Ok(offset)
}

/// String arena with deduplication.
#[derive(Debug, Clone)]
pub struct StringPool {
    /// NUL-terminated strings; always starts with the sentinel NUL.
    blob: Vec<u8>,
    /// Map from content to offset for deduplication.
    lookup: HashMap<Box<str>, StringRef>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        Self {
            blob: vec![0],
            lookup: HashMap::new(),
        }
    }

    /// Intern a string, returning its offset.
    ///
    /// The empty string maps to [`StringRef::NONE`]. Strings are stored
    /// NUL-terminated, so one containing a NUL is rejected.
    pub fn intern(&mut self, s: &str) -> Result<StringRef, StringPoolError> {
        if s.is_empty() {
            return Ok(StringRef::NONE);
        }
        if let Some(&sym) = self.lookup.get(s) {
            return Ok(sym);
        }
        if s.contains('\0') {
            return Err(StringPoolError::InteriorNul);
        }

        let sym = StringRef(next_offset(self.blob.len(), s.len())?);
        self.blob.extend_from_slice(s.as_bytes());
        self.blob.push(0);
        self.lookup.insert(s.into(), sym);
        Ok(sym)
    }

    /// Look up an already-interned string without inserting.
    pub fn get(&self, s: &str) -> Option<StringRef> {
        if s.is_empty() {
            return Some(StringRef::NONE);
        }
        self.lookup.get(s).copied()
    }

    /// Rebuild a pool from an encoded string region.
    ///
    /// Every string is checked for UTF-8 up front; a successful result can
    /// resolve any boundary offset without further validation errors.
    pub fn from_blob(blob: Vec<u8>) -> Result<Self, StringPoolError> {
        if blob.first() != Some(&0) || blob.last() != Some(&0) {
            return Err(StringPoolError::MalformedBlob);
        }

        let mut lookup = HashMap::new();
        let mut offset = 1usize;
        while offset < blob.len() {
            let len = blob[offset..]
                .iter()
                .position(|&b| b == 0)
                .ok_or(StringPoolError::MalformedBlob)?;
            let text = std::str::from_utf8(&blob[offset..offset + len])
                .map_err(|_| StringPoolError::InvalidUtf8(offset as u32))?;
            if !text.is_empty() {
                lookup
                    .entry(text.into())
                    .or_insert(StringRef(offset as u32));
            }
            offset += len + 1;
        }

        Ok(Self { blob, lookup })
    }

    /// Raw arena bytes (the encoded string region).
    pub fn as_bytes(&self) -> &[u8] {
        &self.blob
    }

    /// Number of distinct non-empty strings.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Iterate interned strings in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (StringRef, &str)> {
        let mut offset = 1usize;
        std::iter::from_fn(move || {
            while offset < self.blob.len() {
                let sym = StringRef(offset as u32);
                let text = resolve_in(&self.blob, sym).ok()?;
                offset += text.len() + 1;
                if !text.is_empty() {
                    return Some((sym, text));
                }
            }
            None
        })
    }
}

impl StringLookup for StringPool {
    fn resolve(&self, sym: StringRef) -> Result<&str, StringPoolError> {
        resolve_in(&self.blob, sym)
    }
}
