//! Loaded store files.
//!
//! [`Module`] owns the bytes (in memory or memory-mapped) and validates the
//! header, checksum, section layout and address index when loaded. Strings
//! and payload blocks are checked when first touched.

use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::Path;

use gsym_core::{FunctionRecord, Range, StringLookup, StringPoolError, StringRef, resolve_in};

use crate::constants::HEADER_SIZE;
use crate::error::{FormatError, ModuleError};
use crate::header::{Header, Sections};
use crate::index::{AddressSize, IndexView};
use crate::payload;

/// Storage for store bytes.
#[derive(Debug)]
pub enum ByteStorage {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

impl Deref for ByteStorage {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        match self {
            ByteStorage::Owned(bytes) => bytes,
            ByteStorage::Mapped(map) => map,
        }
    }
}

impl ByteStorage {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes)
    }

    /// Read a file into memory.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::Owned(std::fs::read(path)?))
    }

    /// Memory-map a file.
    ///
    /// The file must not be truncated or modified while mapped.
    pub fn map_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        // SAFETY: store files are treated as immutable once written; all
        // reads go through bounds-checked slices.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Self::Mapped(map))
    }
}

/// A validated store file.
#[derive(Debug)]
pub struct Module {
    storage: ByteStorage,
    header: Header,
    addr_size: AddressSize,
}

impl Module {
    /// Load a module from owned bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        Self::from_storage(ByteStorage::from_vec(bytes))
    }

    /// Read a store file into memory and load it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModuleError> {
        let storage = ByteStorage::from_file(path)?;
        Ok(Self::from_storage(storage)?)
    }

    /// Memory-map a store file and load it.
    pub fn map_path(path: impl AsRef<Path>) -> Result<Self, ModuleError> {
        let storage = ByteStorage::map_file(path)?;
        Ok(Self::from_storage(storage)?)
    }

    /// Load a module from storage.
    pub fn from_storage(storage: ByteStorage) -> Result<Self, FormatError> {
        let header = Header::from_bytes(&storage)?;
        let addr_size = header.validate_identity()?;

        if header.total_size as usize != storage.len() {
            return Err(FormatError::SizeMismatch {
                header: header.total_size,
                actual: storage.len(),
            });
        }

        let actual = crc32fast::hash(&storage[HEADER_SIZE..]);
        if actual != header.checksum {
            return Err(FormatError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        header.validate_sections()?;

        let expected = header.function_count as u64 * addr_size.entry_size() as u64;
        if header.index_size as u64 != expected {
            return Err(FormatError::IndexSizeMismatch {
                count: header.function_count,
                actual: header.index_size,
            });
        }

        let module = Self {
            storage,
            header,
            addr_size,
        };

        let strings = module.section(Sections::Strings);
        if strings.first() != Some(&0) || strings.last() != Some(&0) {
            return Err(FormatError::MalformedStrings);
        }

        module.index().validate(header.payload_size)?;

        tracing::debug!(
            functions = header.function_count,
            addr_size = addr_size.width(),
            strings = header.strings_size,
            payload = header.payload_size,
            "loaded symbol store"
        );

        Ok(module)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn address_size(&self) -> AddressSize {
        self.addr_size
    }

    /// Raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.header.function_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn section(&self, section: Sections) -> &[u8] {
        let (offset, size) = self.header.section(section);
        &self.storage[offset as usize..offset as usize + size as usize]
    }

    pub fn index(&self) -> IndexView<'_> {
        IndexView::new(self.section(Sections::Index), self.addr_size, self.len())
    }

    pub fn strings(&self) -> StringsView<'_> {
        StringsView {
            blob: self.section(Sections::Strings),
        }
    }

    pub fn payload(&self) -> &[u8] {
        self.section(Sections::Payload)
    }

    /// Range of function `index`. Panics if out of bounds.
    #[inline]
    pub fn range(&self, index: usize) -> Range {
        self.index().range(index)
    }

    /// Decode and validate the payload block of function `index`.
    ///
    /// Panics if `index >= len()`.
    pub fn decode_function(&self, index: usize) -> Result<FunctionRecord, FormatError> {
        let index_view = self.index();
        let range = index_view.range(index);
        let offset = index_view.payload_offset(index) as usize;
        let result = payload::decode(self.payload(), offset, range, &self.strings());
        if let Err(err) = &result {
            tracing::warn!(index, %range, error = %err, "corrupt function payload");
        }
        result
    }
}

impl StringLookup for Module {
    fn resolve(&self, sym: StringRef) -> Result<&str, StringPoolError> {
        resolve_in(self.section(Sections::Strings), sym)
    }
}

/// View into the string region.
#[derive(Clone, Copy, Debug)]
pub struct StringsView<'a> {
    blob: &'a [u8],
}

impl<'a> StringsView<'a> {
    /// Resolve with the region's lifetime rather than the view's.
    pub fn get(&self, sym: StringRef) -> Result<&'a str, StringPoolError> {
        resolve_in(self.blob, sym)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.blob
    }
}

impl StringLookup for StringsView<'_> {
    fn resolve(&self, sym: StringRef) -> Result<&str, StringPoolError> {
        resolve_in(self.blob, sym)
    }
}
