#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Address lookup for gsym symbol stores.
//!
//! [`QueryEngine`] answers `address → function, line, inline chain` over any
//! [`FunctionSource`]: fully materialized records ([`RecordSource`]) or a
//! loaded module decoded on first touch ([`ModuleSource`]).

mod engine;
mod error;
mod options;
mod resolution;
mod source;

#[cfg(test)]
mod engine_tests;

pub use engine::QueryEngine;
pub use error::LookupError;
pub use options::{LookupOptions, ZeroSizePolicy};
pub use resolution::{Frame, InlineCall, Resolution, SourceLocation};
pub use source::{FunctionSource, ModuleSource, RecordSource};
