//! Candidate → `FunctionRecord` conversion.
//!
//! Salvages what it can: bad line entries and escaping inline subtrees are
//! dropped with a diagnostic, the rest of the record survives. Records built
//! elsewhere go through the same rules in [`normalize_record`].

use gsym_core::{
    FileRef, FunctionRecord, InlineNode, LineEntry, LineTable, Range, StringLookup,
    StringPoolError, StringRef,
};
use gsym_format::payload::MAX_INLINE_DEPTH;

use crate::candidate::{Candidate, CandidateInline, CandidateLine};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Convert `candidate`, interning its strings through `intern`.
///
/// Returns `None` for nameless candidates and for candidates carrying a
/// string with a NUL byte.
pub fn build_record(
    candidate: &Candidate,
    intern: &mut impl FnMut(&str) -> Result<StringRef, StringPoolError>,
    diagnostics: &mut Diagnostics,
) -> Result<Option<FunctionRecord>, StringPoolError> {
    let range = candidate.range;
    if candidate.name.is_empty() {
        diagnostics
            .report(DiagnosticKind::NamelessCandidate, range)
            .emit();
        return Ok(None);
    }
    if let Some(text) = find_nul(candidate) {
        diagnostics
            .report(DiagnosticKind::InvalidString, range)
            .message(format!("{text:?}"))
            .emit();
        return Ok(None);
    }

    let mut record = FunctionRecord::new(range, intern(&candidate.name)?);
    if let Some(lines) = &candidate.lines {
        record.line_table = build_line_table(range, lines, intern, diagnostics)?;
    }
    if let Some(root) = &candidate.inline {
        record.inline_tree = build_inline_tree(range, root, intern, diagnostics)?;
    }
    Ok(Some(record))
}

fn find_nul(candidate: &Candidate) -> Option<&str> {
    fn in_node(node: &CandidateInline) -> Option<&str> {
        [node.name.as_str(), node.call_file.as_str()]
            .into_iter()
            .find(|s| s.contains('\0'))
            .or_else(|| node.children.iter().find_map(in_node))
    }

    std::iter::once(candidate.name.as_str())
        .chain(candidate.lines.iter().flatten().map(|l| l.file.as_str()))
        .find(|s| s.contains('\0'))
        .or_else(|| candidate.inline.as_ref().and_then(in_node))
}

/// Sort, coalesce (last-wins) and range-check line entries.
///
/// An empty result is `None`.
pub fn build_line_table(
    range: Range,
    lines: &[CandidateLine],
    intern: &mut impl FnMut(&str) -> Result<StringRef, StringPoolError>,
    diagnostics: &mut Diagnostics,
) -> Result<Option<LineTable>, StringPoolError> {
    let mut kept: Vec<&CandidateLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if range.contains(line.address) {
            kept.push(line);
        } else {
            report_stray_line(diagnostics, range, &line.file, line.line, line.address);
        }
    }

    // Stable, so among equal addresses arrival order is preserved and the
    // last one wins below.
    kept.sort_by_key(|line| line.address);

    let mut entries: Vec<LineEntry> = Vec::with_capacity(kept.len());
    for line in kept {
        let entry = LineEntry::new(line.address, FileRef(intern(&line.file)?), line.line);
        match entries.last_mut() {
            Some(last) if last.address == entry.address => *last = entry,
            _ => entries.push(entry),
        }
    }

    if entries.is_empty() {
        return Ok(None);
    }
    Ok(LineTable::new(entries).ok())
}

/// Validate and intern an inline tree rooted inside `range`.
///
/// A root escaping the function drops the whole tree.
pub fn build_inline_tree(
    range: Range,
    root: &CandidateInline,
    intern: &mut impl FnMut(&str) -> Result<StringRef, StringPoolError>,
    diagnostics: &mut Diagnostics,
) -> Result<Option<InlineNode>, StringPoolError> {
    if !range.contains_range(root.range) {
        report_stray_root(diagnostics, range, root.range);
        return Ok(None);
    }
    Ok(Some(build_node(root, 1, intern, diagnostics)?))
}

fn build_node(
    node: &CandidateInline,
    depth: usize,
    intern: &mut impl FnMut(&str) -> Result<StringRef, StringPoolError>,
    diagnostics: &mut Diagnostics,
) -> Result<InlineNode, StringPoolError> {
    let mut children: Vec<&CandidateInline> = node.children.iter().collect();
    children.sort_by_key(|child| child.range);

    let mut built: Vec<InlineNode> = Vec::with_capacity(children.len());
    for child in children {
        let prev = built.last().map(|prev| prev.range);
        if let Some(reason) = reject_child(node.range, prev, child.range, depth) {
            diagnostics
                .report(DiagnosticKind::MalformedInlineRange, child.range)
                .message(format!("`{}` {reason}", child.name))
                .emit();
            continue;
        }
        built.push(build_node(child, depth + 1, intern, diagnostics)?);
    }

    Ok(InlineNode::new(
        node.range,
        intern(&node.name)?,
        FileRef(intern(&node.call_file)?),
        node.call_line,
    )
    .with_children(built))
}

/// Apply the construction rules to a record whose strings are already
/// interned in `strings`.
///
/// Out-of-range line entries are dropped; inline children that escape their
/// parent, overlap an earlier sibling or nest too deep are dropped with their
/// subtrees. A record that passes unchanged produces no diagnostics.
pub fn normalize_record(
    mut record: FunctionRecord,
    strings: &impl StringLookup,
    diagnostics: &mut Diagnostics,
) -> FunctionRecord {
    let range = record.range;

    if let Some(lines) = record.line_table.take() {
        let mut kept = Vec::with_capacity(lines.len());
        for entry in &lines {
            if range.contains(entry.address) {
                kept.push(*entry);
            } else {
                let file = strings.resolve_file(entry.file).unwrap_or("?");
                report_stray_line(diagnostics, range, file, entry.line, entry.address);
            }
        }
        // A subsequence of an ascending table is still ascending.
        if !kept.is_empty() {
            record.line_table = LineTable::new(kept).ok();
        }
    }

    if let Some(root) = record.inline_tree.take() {
        if range.contains_range(root.range) {
            record.inline_tree = Some(normalize_node(root, 1, strings, diagnostics));
        } else {
            report_stray_root(diagnostics, range, root.range);
        }
    }

    record
}

fn normalize_node(
    mut node: InlineNode,
    depth: usize,
    strings: &impl StringLookup,
    diagnostics: &mut Diagnostics,
) -> InlineNode {
    let mut children = std::mem::take(&mut node.children);
    children.sort_by_key(|child| child.range);

    let mut kept: Vec<InlineNode> = Vec::with_capacity(children.len());
    for child in children {
        let prev = kept.last().map(|prev| prev.range);
        if let Some(reason) = reject_child(node.range, prev, child.range, depth) {
            let name = strings.resolve(child.name).unwrap_or("?");
            diagnostics
                .report(DiagnosticKind::MalformedInlineRange, child.range)
                .message(format!("`{name}` {reason}"))
                .emit();
            continue;
        }
        kept.push(normalize_node(child, depth + 1, strings, diagnostics));
    }
    node.children = kept;
    node
}

/// Why `child` cannot be placed under `parent`, whose level is `depth` (the
/// root is level 1), after the accepted sibling `prev`.
fn reject_child(parent: Range, prev: Option<Range>, child: Range, depth: usize) -> Option<String> {
    if !parent.contains_range(child) {
        return Some(format!("escapes parent {parent}"));
    }
    if let Some(prev) = prev
        && (prev.end() > child.start() || prev == child)
    {
        return Some(format!("overlaps sibling {prev}"));
    }
    if depth >= MAX_INLINE_DEPTH {
        return Some(format!("nests deeper than {MAX_INLINE_DEPTH} levels"));
    }
    None
}

fn report_stray_line(
    diagnostics: &mut Diagnostics,
    range: Range,
    file: &str,
    line: u32,
    address: u64,
) {
    diagnostics
        .report(DiagnosticKind::LineEntryOutOfRange, range)
        .message(format!("{file}:{line} at {address:#x}"))
        .emit();
}

fn report_stray_root(diagnostics: &mut Diagnostics, range: Range, root: Range) {
    diagnostics
        .report(DiagnosticKind::MalformedInlineRange, root)
        .message(format!("inline root escapes function {range}"))
        .emit();
}
