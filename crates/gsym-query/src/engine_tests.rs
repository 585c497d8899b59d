use std::cell::Cell;

use gsym_builder::{Candidate, CandidateInline, CandidateLine, build};
use gsym_core::{FunctionRecord, Range, StringPool};
use gsym_format::FormatError;

use crate::{FunctionSource, LookupError, LookupOptions, QueryEngine, RecordSource, ZeroSizePolicy};

fn r(start: u64, end: u64) -> Range {
    Range::new(start, end).unwrap()
}

fn engine(candidates: &[Candidate]) -> QueryEngine<RecordSource> {
    let output = build(candidates).unwrap();
    QueryEngine::new(RecordSource::new(output.records, output.strings))
}

fn name_at(engine: &QueryEngine<RecordSource>, addr: u64) -> Option<String> {
    engine.lookup(addr).ok().map(|res| res.function)
}

#[test]
fn line_lookup() {
    let engine = engine(&[Candidate::new(r(100, 120), "f").with_lines(vec![
        CandidateLine::new(100, "a.c", 1),
        CandidateLine::new(110, "a.c", 2),
    ])]);

    let line = |addr| engine.lookup(addr).unwrap().location.unwrap().line;
    assert_eq!(line(100), 1);
    assert_eq!(line(105), 1);
    assert_eq!(line(110), 2);
    assert_eq!(line(115), 2);
    assert_eq!(engine.lookup(99), Err(LookupError::NotFound(99)));
    assert_eq!(engine.lookup(120), Err(LookupError::NotFound(120)));
}

#[test]
fn inline_chain_is_innermost_first() {
    let engine = engine(&[Candidate::new(r(1000, 1100), "outer").with_inline(
        CandidateInline::root(r(1000, 1100), "outer").with_children(vec![
            CandidateInline::new(r(1020, 1040), "mid", "o.c", 7).with_children(vec![
                CandidateInline::new(r(1025, 1030), "leaf", "m.h", 3),
            ]),
        ]),
    )]);

    let res = engine.lookup(1027).unwrap();
    let ranges: Vec<Range> = res.inline_chain.iter().map(|c| c.range).collect();
    assert_eq!(ranges, [r(1025, 1030), r(1020, 1040)]);
    assert_eq!(res.function, "outer");
    assert_eq!(res.range, r(1000, 1100));

    assert_eq!(engine.lookup(1022).unwrap().inline_chain.len(), 1);
    assert!(engine.lookup(1050).unwrap().inline_chain.is_empty());
}

#[test]
fn gaps_between_functions_miss() {
    let engine = engine(&[
        Candidate::new(r(0x10, 0x20), "a"),
        Candidate::new(r(0x30, 0x40), "b"),
    ]);
    assert_eq!(name_at(&engine, 0x1f).as_deref(), Some("a"));
    assert_eq!(name_at(&engine, 0x20), None);
    assert_eq!(name_at(&engine, 0x2f), None);
    assert_eq!(name_at(&engine, 0x30).as_deref(), Some("b"));
    assert_eq!(name_at(&engine, 0x0), None);
    assert_eq!(name_at(&engine, u64::MAX), None);
}

#[test]
fn conflicting_ranges_prefer_greater_start_on_equal_size() {
    let engine = engine(&[Candidate::new(r(0, 50), "a"), Candidate::new(r(30, 80), "b")]);
    assert_eq!(name_at(&engine, 10).as_deref(), Some("a"));
    assert_eq!(name_at(&engine, 40).as_deref(), Some("b"));
    assert_eq!(name_at(&engine, 60).as_deref(), Some("b"));
}

#[test]
fn conflicting_ranges_prefer_smaller() {
    let engine = engine(&[Candidate::new(r(0, 40), "small"), Candidate::new(r(30, 100), "big")]);
    assert_eq!(name_at(&engine, 35).as_deref(), Some("small"));
}

#[test]
fn nested_ranges_resolve_innermost() {
    let engine = engine(&[
        Candidate::new(r(0, 100), "outer"),
        Candidate::new(r(10, 20), "inner"),
        Candidate::new(r(40, 60), "second"),
    ]);
    assert_eq!(name_at(&engine, 5).as_deref(), Some("outer"));
    assert_eq!(name_at(&engine, 15).as_deref(), Some("inner"));
    assert_eq!(name_at(&engine, 25).as_deref(), Some("outer"));
    assert_eq!(name_at(&engine, 50).as_deref(), Some("second"));
    assert_eq!(name_at(&engine, 99).as_deref(), Some("outer"));
}

#[test]
fn zero_size_matches_exact_address_only() {
    let engine = engine(&[
        Candidate::new(r(0x1000, 0x1100), "sized"),
        Candidate::new(Range::empty_at(0x1080), "inside"),
        Candidate::new(Range::empty_at(0x2000), "alone"),
    ]);

    assert_eq!(name_at(&engine, 0x1080).as_deref(), Some("sized"));
    assert_eq!(name_at(&engine, 0x2000).as_deref(), Some("alone"));
    assert_eq!(name_at(&engine, 0x2001), None);

    let never = LookupOptions::new().zero_size(ZeroSizePolicy::Never);
    assert_eq!(
        engine.lookup_with(0x2000, &never),
        Err(LookupError::NotFound(0x2000))
    );
    let engine = engine.options(never);
    assert_eq!(engine.get_options().get_zero_size(), ZeroSizePolicy::Never);
    assert_eq!(name_at(&engine, 0x2000), None);
}

#[test]
fn zero_size_resolution_has_no_detail() {
    let engine = engine(&[Candidate::new(Range::empty_at(64), "sym")]);
    let res = engine.lookup(64).unwrap();
    assert_eq!(res.range, Range::empty_at(64));
    assert!(res.location.is_none());
    assert!(!res.is_inlined());
}

#[test]
fn empty_engine_finds_nothing() {
    let engine = engine(&[]);
    assert_eq!(engine.lookup(0), Err(LookupError::NotFound(0)));
    assert_eq!(engine.max_end(), 0);
}

#[test]
fn many_functions_resolve_by_binary_search() {
    let candidates: Vec<Candidate> = (0..1000u64)
        .map(|i| Candidate::new(r(i * 16, i * 16 + 12), format!("f{i}")))
        .collect();
    let engine = engine(&candidates);

    assert_eq!(engine.max_end(), 999 * 16 + 12);
    for i in [0u64, 1, 499, 500, 998, 999] {
        assert_eq!(name_at(&engine, i * 16 + 11), Some(format!("f{i}")));
        assert_eq!(name_at(&engine, i * 16 + 12), None);
    }
}

/// Counts `range` calls made on the wrapped source.
struct Counting {
    inner: RecordSource,
    ranges: Cell<usize>,
}

impl FunctionSource for Counting {
    type Strings = StringPool;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn range(&self, index: usize) -> Range {
        self.ranges.set(self.ranges.get() + 1);
        self.inner.range(index)
    }

    fn function(&self, index: usize) -> Result<&FunctionRecord, FormatError> {
        self.inner.function(index)
    }

    fn strings(&self) -> &StringPool {
        self.inner.strings()
    }
}

fn raw_engine(ranges: impl IntoIterator<Item = Range>) -> QueryEngine<Counting> {
    let mut pool = StringPool::new();
    let name = pool.intern("f").unwrap();
    let records = ranges
        .into_iter()
        .map(|range| FunctionRecord::new(range, name))
        .collect();
    QueryEngine::new(Counting {
        inner: RecordSource::new(records, pool),
        ranges: Cell::new(0),
    })
}

#[test]
fn wide_enclosing_record_keeps_lookups_short() {
    let count = 50_000u64;
    let engine = raw_engine(
        std::iter::once(r(0, 1 << 40)).chain((1..=count).map(|i| Range::from_size(i * 16, 8))),
    );
    let options = LookupOptions::default();

    let cases = [
        (0x10, 1),
        (0x18, 0),
        (0x7a124, 0x7a12),
        (count * 16 + 4, count as usize),
        (count * 16 + 0x100, 0),
        ((1 << 40) - 1, 0),
    ];
    for (addr, expected) in cases {
        engine.source().ranges.set(0);
        assert_eq!(engine.find(addr, &options), Some(expected), "address {addr:#x}");
        let calls = engine.source().ranges.get();
        assert!(calls <= 24, "{calls} range reads for {addr:#x}");
    }
}

/// Smallest containing range, ties to the greater start, else an empty
/// range at exactly `addr`.
fn find_by_scan(ranges: &[Range], addr: u64) -> Option<usize> {
    let containing = ranges
        .iter()
        .enumerate()
        .filter(|(_, range)| range.contains(addr))
        .min_by_key(|&(index, range)| (range.size(), std::cmp::Reverse(index)));
    if let Some((index, _)) = containing {
        return Some(index);
    }
    let last = ranges.iter().rposition(|range| range.start() <= addr)?;
    (ranges[last].is_empty() && ranges[last].start() == addr).then_some(last)
}

#[test]
fn find_agrees_with_full_scan() {
    // Mix of nesting, partial overlap, gaps and empty ranges.
    let ranges: Vec<Range> = (0..300u64)
        .map(|i| Range::from_size(i * 7, (i * 37) % 90 * ((i % 5 != 0) as u64)))
        .collect();
    let engine = raw_engine(ranges.clone());
    let options = LookupOptions::default();

    for addr in 0..300 * 7 + 100 {
        assert_eq!(engine.find(addr, &options), find_by_scan(&ranges, addr), "address {addr}");
    }
}
