#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Binary layout of gsym symbol stores.
//!
//! A store file is a 64-byte [`Header`] followed by three 64-byte aligned
//! regions: the address index, the string blob and the function payloads.
//! Everything is little-endian.
//!
//! [`Module`] validates the header, checksum and index on load; payload
//! blocks are decoded on demand through [`Module::decode_function`].
//! [`write`] produces the same layout from records and a string region.

mod constants;
pub mod dump;
mod error;
mod header;
mod index;
mod module;
pub mod payload;
pub mod varint;
mod writer;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod module_tests;
#[cfg(test)]
mod varint_tests;
#[cfg(test)]
mod writer_tests;

pub use constants::{BYTE_ORDER_MARK, HEADER_SIZE, MAGIC, SECTION_ALIGN, VERSION};
pub use error::{FormatError, ModuleError};
pub use header::{Header, Sections, align_up};
pub use index::{AddressSize, IndexEntry, IndexView};
pub use module::{ByteStorage, Module, StringsView};
pub use writer::{WriteError, write};
