use crate::{FileRef, FunctionRecord, InlineNode, LineEntry, LineTable, Range, StringRef};

fn r(start: u64, end: u64) -> Range {
    Range::new(start, end).unwrap()
}

fn lines(entries: &[(u64, u32)]) -> LineTable {
    LineTable::new(
        entries
            .iter()
            .map(|&(a, l)| LineEntry::new(a, FileRef(StringRef(1)), l))
            .collect(),
    )
    .unwrap()
}

#[test]
fn validity_is_name_presence() {
    assert!(!FunctionRecord::new(r(0, 10), StringRef::NONE).is_valid());
    assert!(FunctionRecord::new(Range::empty_at(0), StringRef(5)).is_valid());
}

#[test]
fn rich_info_flags() {
    let plain = FunctionRecord::new(r(0, 10), StringRef(1));
    assert!(!plain.has_rich_info());
    assert!(plain.clone().with_line_table(lines(&[(0, 1)])).has_rich_info());
    assert!(
        plain
            .with_inline_tree(InlineNode::root(r(0, 10), StringRef(1)))
            .has_rich_info()
    );
}

#[test]
fn ordering_range_first() {
    let a = FunctionRecord::new(r(0, 10), StringRef(9)).with_line_table(lines(&[(0, 1)]));
    let b = FunctionRecord::new(r(0, 20), StringRef(1));
    assert!(a < b);
}

#[test]
fn ordering_inline_presence_then_lines() {
    let plain = FunctionRecord::new(r(0, 10), StringRef(1));
    let lined = plain.clone().with_line_table(lines(&[(0, 1)]));
    let inlined = plain
        .clone()
        .with_inline_tree(InlineNode::root(r(0, 10), StringRef(1)));

    let mut records = vec![inlined.clone(), lined.clone(), plain.clone()];
    records.sort();
    assert_eq!(records, vec![plain, lined, inlined]);
}

#[test]
fn ordering_is_consistent_with_eq() {
    let a = FunctionRecord::new(r(0, 10), StringRef(1));
    let b = FunctionRecord::new(r(0, 10), StringRef(2));
    assert_ne!(a, b);
    assert_ne!(a.cmp(&b), std::cmp::Ordering::Equal);
}

#[test]
fn lookup_helpers() {
    let tree = InlineNode::root(r(100, 120), StringRef(1)).with_children(vec![InlineNode::new(
        r(104, 108),
        StringRef(2),
        FileRef(StringRef(3)),
        7,
    )]);
    let record = FunctionRecord::new(r(100, 120), StringRef(1))
        .with_line_table(lines(&[(100, 1), (110, 2)]))
        .with_inline_tree(tree);

    assert_eq!(record.lookup_line(105).map(|e| e.line), Some(1));
    assert_eq!(record.inline_chain(105).len(), 1);
    assert!(record.inline_chain(112).is_empty());
    assert!(FunctionRecord::new(r(0, 1), StringRef(1)).lookup_line(0).is_none());
}
