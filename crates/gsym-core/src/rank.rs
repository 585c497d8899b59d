//! Canonical-record selection policy.
//!
//! When several candidates claim the same start address, the merger keeps the
//! one ranked highest here. Independent of `FunctionRecord::cmp`, which only
//! orders the index.
//!
//! Strings are compared by content, not by offset, so the winner does not
//! depend on the order in which readers interned their strings.

use std::cmp::Ordering;

use crate::function::FunctionRecord;
use crate::inline::InlineNode;
use crate::line_table::LineTable;
use crate::strings::{FileRef, StringLookup, StringRef};

/// Compare two candidates; `Greater` means `a` is preferred.
///
/// Criteria, most significant first:
/// 1. inline tree present
/// 2. line table, lexicographically (absent < present, then element-wise)
/// 3. more inline nodes
/// 4. larger range
/// 5. name
/// 6. inline tree structure
pub fn compare(a: &FunctionRecord, b: &FunctionRecord, strings: &impl StringLookup) -> Ordering {
    a.inline_tree
        .is_some()
        .cmp(&b.inline_tree.is_some())
        .then_with(|| compare_lines(a.line_table.as_ref(), b.line_table.as_ref(), strings))
        .then_with(|| inline_nodes(a).cmp(&inline_nodes(b)))
        .then_with(|| a.range.size().cmp(&b.range.size()))
        .then_with(|| text(strings, a.name).cmp(text(strings, b.name)))
        .then_with(|| match (&a.inline_tree, &b.inline_tree) {
            (Some(x), Some(y)) => compare_inline(x, y, strings),
            _ => Ordering::Equal,
        })
}

/// Highest-ranked record of a non-empty group.
pub fn select<'a>(
    group: &'a [FunctionRecord],
    strings: &impl StringLookup,
) -> Option<&'a FunctionRecord> {
    group.iter().max_by(|a, b| compare(a, b, strings))
}

fn inline_nodes(record: &FunctionRecord) -> usize {
    record
        .inline_tree
        .as_ref()
        .map_or(0, InlineNode::node_count)
}

fn text(strings: &impl StringLookup, sym: StringRef) -> &str {
    strings.resolve(sym).unwrap_or("")
}

fn file(strings: &impl StringLookup, file: FileRef) -> &str {
    text(strings, file.path())
}

fn compare_lines(
    a: Option<&LineTable>,
    b: Option<&LineTable>,
    strings: &impl StringLookup,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                let ord = x
                    .address
                    .cmp(&y.address)
                    .then_with(|| file(strings, x.file).cmp(file(strings, y.file)))
                    .then_with(|| x.line.cmp(&y.line));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        }
    }
}

fn compare_inline(a: &InlineNode, b: &InlineNode, strings: &impl StringLookup) -> Ordering {
    let ord = a
        .range
        .cmp(&b.range)
        .then_with(|| text(strings, a.name).cmp(text(strings, b.name)))
        .then_with(|| file(strings, a.call_file).cmp(file(strings, b.call_file)))
        .then_with(|| a.call_line.cmp(&b.call_line));
    if ord != Ordering::Equal {
        return ord;
    }
    for (x, y) in a.children.iter().zip(b.children.iter()) {
        let ord = compare_inline(x, y, strings);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.children.len().cmp(&b.children.len())
}
