#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data model for gsym symbol stores.
//!
//! A store maps address ranges to [`FunctionRecord`]s. Each record names a
//! function through a [`StringRef`] into a shared [`StringPool`] and may carry
//! a [`LineTable`] and an inline call tree ([`InlineNode`]).
//!
//! Everything here is plain owned data; encoding lives in `gsym-format`,
//! merging in `gsym-builder`, lookups in `gsym-query`.

mod function;
mod inline;
mod line_table;
pub mod rank;
mod range;
mod strings;

#[cfg(test)]
mod function_tests;

pub use function::FunctionRecord;
pub use inline::InlineNode;
pub use line_table::{LineEntry, LineTable, LineTableError};
pub use range::{Range, RangeError};
pub use strings::{FileRef, StringLookup, StringPool, StringPoolError, StringRef, resolve_in};
