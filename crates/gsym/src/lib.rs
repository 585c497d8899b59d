//! gsym: a compact, address-indexed symbol store.
//!
//! Readers hand over raw [`Candidate`]s; [`build`] merges them into an
//! immutable [`Store`] that answers `address → function, line, inline chain`
//! and encodes to a checksummed binary file. [`MappedStore`] queries such a
//! file in place, decoding functions on first touch.
//!
//! # Example
//!
//! ```
//! use gsym::{Candidate, CandidateLine, Range, Store};
//!
//! let candidates = [Candidate::new(Range::new(100, 120).unwrap(), "main")
//!     .with_lines(vec![CandidateLine::new(100, "a.c", 1), CandidateLine::new(110, "a.c", 2)])];
//!
//! let store = gsym::build(&candidates).expect("valid candidates");
//! let bytes = store.encode().expect("fits the format");
//! let decoded = Store::decode(bytes).expect("intact file");
//!
//! let res = decoded.lookup(115).expect("covered address");
//! assert_eq!(res.function, "main");
//! assert_eq!(res.location.unwrap().line, 2);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
mod mapped;
mod store;


pub use error::{Result, StoreError};
pub use mapped::MappedStore;
pub use store::Store;

pub use gsym_builder::{
    Candidate, CandidateInline, CandidateLine, Collector, DiagnosticKind, DiagnosticMessage,
    Diagnostics, EncodeOptions, Severity,
};
pub use gsym_core::{FunctionRecord, Range, RangeError, StringPool};
pub use gsym_format::{AddressSize, FormatError, ModuleError};
pub use gsym_query::{
    Frame, InlineCall, LookupError, LookupOptions, Resolution, SourceLocation, ZeroSizePolicy,
};

/// Build a store from raw candidates, in any order.
pub fn build<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Result<Store> {
    let collector = Collector::new();
    collector.add_candidates(candidates)?;
    Store::build_with(collector)
}
