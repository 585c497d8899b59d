//! Function payload blocks.
//!
//! Block layout:
//! - name: u32 string offset
//! - line flag: u8 (0 = none, 1 = present)
//!   - count: uleb
//!   - per entry: address delta (uleb; the first relative to the function
//!     start), file (uleb string offset), line (first absolute uleb, then a
//!     sleb delta from the previous line)
//! - inline flag: u8
//!   - root node, recursively: start delta from the parent start (the root's
//!     parent is the function start), size, name, call file, call line,
//!     child count, children (all uleb)

use gsym_core::{
    FileRef, FunctionRecord, InlineNode, LineEntry, LineTable, Range, StringLookup, StringRef,
};

use crate::error::FormatError;
use crate::varint::{Reader, write_sleb, write_uleb};

/// Nesting limit for inline trees, counting the root as one level.
pub const MAX_INLINE_DEPTH: usize = 128;

/// Why `record` cannot round-trip through [`encode`] and [`decode`], if it
/// cannot.
pub fn check(record: &FunctionRecord) -> Result<(), &'static str> {
    if record.name.is_none() {
        return Err("function has no name");
    }
    if let Some(lines) = &record.line_table {
        if lines.is_empty() {
            return Err("empty line table");
        }
        if lines.iter().any(|entry| !record.range.contains(entry.address)) {
            return Err("line address outside function");
        }
    }
    if let Some(root) = &record.inline_tree {
        if !record.range.contains_range(root.range) || !root.is_well_formed() {
            return Err("inline tree not nested");
        }
        if root.depth() > MAX_INLINE_DEPTH {
            return Err("inline tree too deep");
        }
    }
    Ok(())
}

/// Append the block for `record` to `out`.
///
/// `record` must pass [`check`].
pub fn encode(record: &FunctionRecord, out: &mut Vec<u8>) {
    let start = record.start();
    out.extend_from_slice(&record.name.get().to_le_bytes());

    match &record.line_table {
        Some(lines) => {
            out.push(1);
            write_uleb(out, lines.len() as u64);
            let mut prev_addr = start;
            let mut prev_line: Option<u32> = None;
            for entry in lines {
                debug_assert!(entry.address >= prev_addr);
                write_uleb(out, entry.address.saturating_sub(prev_addr));
                write_uleb(out, entry.file.path().get() as u64);
                match prev_line {
                    None => write_uleb(out, entry.line as u64),
                    Some(prev) => write_sleb(out, entry.line as i64 - prev as i64),
                }
                prev_addr = entry.address;
                prev_line = Some(entry.line);
            }
        }
        None => out.push(0),
    }

    match &record.inline_tree {
        Some(root) => {
            out.push(1);
            encode_node(root, start, out);
        }
        None => out.push(0),
    }
}

fn encode_node(node: &InlineNode, parent_start: u64, out: &mut Vec<u8>) {
    debug_assert!(node.range.start() >= parent_start);
    write_uleb(out, node.range.start().saturating_sub(parent_start));
    write_uleb(out, node.range.size());
    write_uleb(out, node.name.get() as u64);
    write_uleb(out, node.call_file.path().get() as u64);
    write_uleb(out, node.call_line as u64);
    write_uleb(out, node.children.len() as u64);
    for child in &node.children {
        encode_node(child, node.range.start(), out);
    }
}

/// Decode the block at `offset` in `payload` for a function covering `range`.
///
/// Every string reference is resolved against `strings`, line entries must be
/// strictly ascending inside `range`, and the inline tree must be nested
/// inside `range`.
pub fn decode(
    payload: &[u8],
    offset: usize,
    range: Range,
    strings: &impl StringLookup,
) -> Result<FunctionRecord, FormatError> {
    let mut decoder = Decoder {
        reader: Reader::new(payload, offset),
        strings,
    };

    let name = StringRef(decoder.read(Reader::u32_le, "truncated name")?);
    if name.is_none() {
        return Err(decoder.corrupt("function has no name"));
    }
    decoder.string(name)?;

    let mut record = FunctionRecord::new(range, name);

    match decoder.read(Reader::u8, "truncated line flag")? {
        0 => {}
        1 => record.line_table = Some(decoder.lines(range)?),
        _ => return Err(decoder.corrupt("invalid line flag")),
    }

    match decoder.read(Reader::u8, "truncated inline flag")? {
        0 => {}
        1 => {
            let root = decoder.node(range.start(), 0)?;
            if !range.contains_range(root.range) || !root.is_well_formed() {
                return Err(decoder.corrupt("inline tree not nested"));
            }
            record.inline_tree = Some(root);
        }
        _ => return Err(decoder.corrupt("invalid inline flag")),
    }

    Ok(record)
}

struct Decoder<'a, S> {
    reader: Reader<'a>,
    strings: &'a S,
}

impl<'a, S: StringLookup> Decoder<'a, S> {
    fn corrupt(&self, reason: &'static str) -> FormatError {
        FormatError::CorruptPayload {
            offset: self.reader.position(),
            reason,
        }
    }

    fn read<T>(
        &mut self,
        f: impl FnOnce(&mut Reader<'a>) -> Option<T>,
        reason: &'static str,
    ) -> Result<T, FormatError> {
        match f(&mut self.reader) {
            Some(v) => Ok(v),
            None => Err(self.corrupt(reason)),
        }
    }

    fn string(&self, sym: StringRef) -> Result<(), FormatError> {
        self.strings.resolve(sym)?;
        Ok(())
    }

    fn string_ref(&mut self) -> Result<StringRef, FormatError> {
        let sym = StringRef(self.read(Reader::uleb_u32, "bad string offset")?);
        self.string(sym)?;
        Ok(sym)
    }

    fn lines(&mut self, range: Range) -> Result<LineTable, FormatError> {
        let count = self.read(Reader::uleb, "truncated line count")?;
        if count == 0 {
            return Err(self.corrupt("empty line table"));
        }
        // Each entry takes at least three bytes.
        if count > (self.reader.remaining() / 3) as u64 {
            return Err(self.corrupt("line count exceeds payload"));
        }

        let mut entries = Vec::with_capacity(count as usize);
        let mut addr = range.start();
        let mut line = 0u32;
        for i in 0..count {
            let delta = self.read(Reader::uleb, "truncated line address")?;
            if i > 0 && delta == 0 {
                return Err(self.corrupt("line addresses not strictly ascending"));
            }
            addr = match addr.checked_add(delta) {
                Some(a) if range.contains(a) => a,
                _ => return Err(self.corrupt("line address outside function")),
            };
            let file = FileRef(self.string_ref()?);
            line = if i == 0 {
                self.read(Reader::uleb_u32, "bad line number")?
            } else {
                let delta = self.read(Reader::sleb, "bad line delta")?;
                match u32::try_from(line as i64 + delta) {
                    Ok(l) => l,
                    Err(_) => return Err(self.corrupt("line number out of range")),
                }
            };
            entries.push(LineEntry::new(addr, file, line));
        }

        LineTable::new(entries).map_err(|_| self.corrupt("line addresses not strictly ascending"))
    }

    fn node(&mut self, parent_start: u64, depth: usize) -> Result<InlineNode, FormatError> {
        if depth >= MAX_INLINE_DEPTH {
            return Err(self.corrupt("inline tree too deep"));
        }
        let delta = self.read(Reader::uleb, "truncated inline start")?;
        let size = self.read(Reader::uleb, "truncated inline size")?;
        let range = parent_start
            .checked_add(delta)
            .and_then(|start| Some((start, start.checked_add(size)?)))
            .and_then(|(start, end)| Range::new(start, end).ok());
        let Some(range) = range else {
            return Err(self.corrupt("inline range overflows"));
        };
        let name = self.string_ref()?;
        let call_file = FileRef(self.string_ref()?);
        let call_line = self.read(Reader::uleb_u32, "bad call line")?;

        let count = self.read(Reader::uleb, "truncated child count")?;
        // Each child takes at least six bytes.
        if count > (self.reader.remaining() / 6) as u64 {
            return Err(self.corrupt("child count exceeds payload"));
        }
        let mut children = Vec::with_capacity(count as usize);
        for _ in 0..count {
            children.push(self.node(range.start(), depth + 1)?);
        }

        Ok(InlineNode::new(range, name, call_file, call_line).with_children(children))
    }
}
