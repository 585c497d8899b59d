use std::io;

use gsym_core::StringPoolError;

use crate::constants::VERSION;
use crate::header::Sections;

/// Structural problem in store bytes.
///
/// `Clone` so lazily decoded results can be cached and handed out repeatedly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid magic: expected GSYM")]
    InvalidMagic,
    #[error("unsupported version: {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("unsupported byte order marker {0:#06x}")]
    UnsupportedByteOrder(u16),
    #[error("unsupported address size: {0} bytes")]
    UnsupportedAddressSize(u8),
    #[error("file too small: {0} bytes (minimum 64)")]
    FileTooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("{section} section out of bounds (offset {offset}, size {size})")]
    SectionOutOfBounds {
        section: Sections,
        offset: u32,
        size: u32,
    },
    #[error("index size {actual} does not match {count} functions")]
    IndexSizeMismatch { count: u32, actual: u32 },
    #[error("corrupt index entry {index}: {reason}")]
    CorruptIndex { index: usize, reason: &'static str },
    #[error("payload offset {offset} of function {index} is out of bounds")]
    CorruptOffset { index: usize, offset: u32 },
    #[error("string offset {0} does not start a string")]
    InvalidOffset(u32),
    #[error("string at offset {0} is not valid UTF-8")]
    InvalidUtf8(u32),
    #[error("malformed string blob")]
    MalformedStrings,
    #[error("corrupt payload at offset {offset}: {reason}")]
    CorruptPayload { offset: usize, reason: &'static str },
}

impl From<StringPoolError> for FormatError {
    fn from(err: StringPoolError) -> Self {
        match err {
            StringPoolError::InvalidOffset(offset) => FormatError::InvalidOffset(offset),
            StringPoolError::InvalidUtf8(offset) => FormatError::InvalidUtf8(offset),
            // Interning failures; reading never produces them.
            StringPoolError::MalformedBlob
            | StringPoolError::InteriorNul
            | StringPoolError::PoolFull => FormatError::MalformedStrings,
        }
    }
}

/// Store load error.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
