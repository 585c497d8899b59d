//! Candidate merging.
//!
//! Every candidate first passes [`construct::normalize_record`], so records
//! added pre-interned obey the same range rules as converted ones.
//! Candidates sharing a start address form a group and collapse to the
//! record ranked highest by [`rank::compare`]. Records with distinct starts
//! are all kept; partial overlaps between them are reported as conflicts.

use gsym_core::{FunctionRecord, Range, StringLookup, rank};

use crate::construct;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::BuildError;

/// Merge candidates into a set with strictly ascending starts.
///
/// All strings in `candidates` must resolve through `strings`.
pub fn merge(
    candidates: Vec<FunctionRecord>,
    strings: &impl StringLookup,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<FunctionRecord>, BuildError> {
    let total = candidates.len();

    let mut candidates: Vec<FunctionRecord> = candidates
        .into_iter()
        .filter_map(|record| {
            if !record.is_valid() {
                diagnostics
                    .report(DiagnosticKind::NamelessCandidate, record.range)
                    .emit();
                return None;
            }
            Some(construct::normalize_record(record, strings, diagnostics))
        })
        .collect();
    candidates.sort();

    let mut kept: Vec<FunctionRecord> = Vec::with_capacity(candidates.len());
    for group in candidates.chunk_by(|a, b| a.start() == b.start()) {
        let Some(winner) = rank::select(group, strings) else {
            continue;
        };
        for loser in group {
            if loser.range == winner.range && loser.has_rich_info() && loser != winner {
                diagnostics
                    .report(DiagnosticKind::DivergentDuplicate, loser.range)
                    .message(format!(
                        "`{}` dropped in favour of `{}`",
                        text(strings, loser),
                        text(strings, winner)
                    ))
                    .emit();
            }
        }
        kept.push(winner.clone());
    }

    let conflicts = report_conflicts(&kept, strings, diagnostics);
    check_sorted(&kept)?;

    tracing::debug!(
        candidates = total,
        kept = kept.len(),
        conflicts,
        "merged candidates"
    );
    Ok(kept)
}

fn text<'a>(strings: &'a impl StringLookup, record: &FunctionRecord) -> &'a str {
    strings.resolve(record.name).unwrap_or("?")
}

/// Report every pair of records that overlap without one containing the
/// other. Nested ranges are legitimate and stay silent.
fn report_conflicts(
    records: &[FunctionRecord],
    strings: &impl StringLookup,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut conflicts = 0;
    // Earlier records whose end still lies past the current start.
    let mut active: Vec<usize> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let current = record.range;
        active.retain(|&j| records[j].end() > current.start());
        for &j in &active {
            let prev = records[j].range;
            if prev.intersects(current) && !prev.contains_range(current) {
                conflicts += 1;
                diagnostics
                    .report(DiagnosticKind::RangeConflict, span(prev, current))
                    .message(format!(
                        "`{}` {prev} and `{}` {current}",
                        text(strings, &records[j]),
                        text(strings, record)
                    ))
                    .emit();
            }
        }
        if !current.is_empty() {
            active.push(i);
        }
    }
    conflicts
}

fn span(a: Range, b: Range) -> Range {
    a.union(b).unwrap_or(a)
}

fn check_sorted(records: &[FunctionRecord]) -> Result<(), BuildError> {
    match records.windows(2).position(|w| w[0].start() >= w[1].start()) {
        Some(i) => Err(BuildError::Unsorted {
            index: i + 1,
            start: records[i + 1].start(),
        }),
        None => Ok(()),
    }
}
