#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Building gsym symbol stores.
//!
//! Readers feed [`Candidate`]s (or pre-interned records) into a shared
//! [`Collector`]; [`Collector::finish`] merges them into canonical form and
//! [`emit`] encodes the result.

mod candidate;
mod collector;
pub mod construct;
pub mod diagnostics;
mod emit;
mod error;
pub mod merge;

#[cfg(test)]
mod emit_tests;

pub use candidate::{Candidate, CandidateInline, CandidateLine};
pub use collector::{BuildOutput, Collector};
pub use diagnostics::{DiagnosticKind, DiagnosticMessage, Diagnostics, Severity};
pub use emit::{EncodeOptions, StringRemap, compact, emit};
pub use error::BuildError;

/// Build canonical records from raw candidates.
pub fn build<'a>(
    candidates: impl IntoIterator<Item = &'a Candidate>,
) -> Result<BuildOutput, BuildError> {
    let collector = Collector::new();
    collector.add_candidates(candidates)?;
    collector.finish()
}
