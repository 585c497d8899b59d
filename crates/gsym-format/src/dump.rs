//! Human-readable store dump for debugging and tests.

use std::fmt::Write as _;

use gsym_core::{FunctionRecord, InlineNode, StringLookup, StringRef};

use crate::module::{Module, StringsView};

/// Generate a human-readable dump of a store module.
///
/// Functions whose payload fails to decode are listed with the error instead
/// of their details.
pub fn dump(module: &Module) -> String {
    let mut out = String::new();
    dump_header(&mut out, module);
    dump_strings(&mut out, &module.strings());
    dump_functions(&mut out, module);
    out
}

fn dump_header(out: &mut String, module: &Module) {
    let header = module.header();
    out.push_str("[header]\n");
    writeln!(out, "version = {}", header.version).unwrap();
    writeln!(out, "addr_size = {}", module.address_size().width()).unwrap();
    writeln!(out, "functions = {}", header.function_count).unwrap();
    out.push('\n');
}

fn dump_strings(out: &mut String, strings: &StringsView<'_>) {
    out.push_str("[strings]\n");
    let blob = strings.as_bytes();
    let width = width_for(blob.len());
    let mut offset = 1usize;
    while offset < blob.len() {
        let Ok(text) = strings.get(StringRef(offset as u32)) else {
            writeln!(out, "S{offset:0width$} <invalid>").unwrap();
            break;
        };
        writeln!(out, "S{offset:0width$} {text:?}").unwrap();
        offset += text.len() + 1;
    }
    out.push('\n');
}

fn dump_functions(out: &mut String, module: &Module) {
    out.push_str("[functions]\n");
    let width = width_for(module.len());
    let strings = module.strings();
    for index in 0..module.len() {
        match module.decode_function(index) {
            Ok(record) => dump_function(out, index, width, &record, &strings),
            Err(err) => {
                let range = module.range(index);
                writeln!(out, "F{index:0width$} {range} ; error: {err}").unwrap();
            }
        }
    }
}

fn dump_function(
    out: &mut String,
    index: usize,
    width: usize,
    record: &FunctionRecord,
    strings: &impl StringLookup,
) {
    let name = text(strings, record.name);
    writeln!(out, "F{index:0width$} {} {name}", record.range).unwrap();

    if let Some(lines) = &record.line_table {
        for entry in lines {
            let file = text(strings, entry.file.path());
            writeln!(out, "  line {:#x} {file}:{}", entry.address, entry.line).unwrap();
        }
    }

    if let Some(root) = &record.inline_tree {
        for child in &root.children {
            dump_inline(out, child, 1, strings);
        }
    }
}

fn dump_inline(out: &mut String, node: &InlineNode, depth: usize, strings: &impl StringLookup) {
    let indent = "  ".repeat(depth);
    let name = text(strings, node.name);
    let file = text(strings, node.call_file.path());
    writeln!(
        out,
        "{indent}inline {} {name} @ {file}:{}",
        node.range, node.call_line
    )
    .unwrap();
    for child in &node.children {
        dump_inline(out, child, depth + 1, strings);
    }
}

fn text(strings: &impl StringLookup, sym: StringRef) -> &str {
    strings.resolve(sym).unwrap_or("?")
}

/// Digits needed to display numbers below `count`.
fn width_for(count: usize) -> usize {
    let mut width = 1;
    let mut n = count.saturating_sub(1) / 10;
    while n > 0 {
        width += 1;
        n /= 10;
    }
    width
}
