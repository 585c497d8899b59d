//! Store emission.
//!
//! Records are first compacted onto a fresh string pool interned in output
//! order, so equal record sets always produce identical bytes.

use std::collections::HashMap;

use gsym_core::{
    FileRef, FunctionRecord, InlineNode, LineEntry, LineTable, StringLookup, StringPool,
    StringPoolError, StringRef,
};
use gsym_format::AddressSize;

use crate::error::BuildError;

/// Encoding configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// `None` picks the narrowest width that fits every end address.
    pub address_size: Option<AddressSize>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a fixed index address width.
    pub fn address_size(mut self, size: AddressSize) -> Self {
        self.address_size = Some(size);
        self
    }

    pub fn resolve_address_size(&self, records: &[FunctionRecord]) -> AddressSize {
        self.address_size.unwrap_or_else(|| {
            let max_end = records.iter().map(FunctionRecord::end).max().unwrap_or(0);
            AddressSize::for_max_address(max_end)
        })
    }
}

/// Re-interns strings from a source pool into a fresh one on first use.
pub struct StringRemap<'a, S> {
    source: &'a S,
    mapping: HashMap<StringRef, StringRef>,
    pool: StringPool,
}

impl<'a, S: StringLookup> StringRemap<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            mapping: HashMap::new(),
            pool: StringPool::new(),
        }
    }

    pub fn get_or_intern(&mut self, sym: StringRef) -> Result<StringRef, StringPoolError> {
        if sym.is_none() {
            return Ok(StringRef::NONE);
        }
        if let Some(&mapped) = self.mapping.get(&sym) {
            return Ok(mapped);
        }
        let mapped = self.pool.intern(self.source.resolve(sym)?)?;
        self.mapping.insert(sym, mapped);
        Ok(mapped)
    }

    fn file(&mut self, file: FileRef) -> Result<FileRef, StringPoolError> {
        Ok(FileRef(self.get_or_intern(file.path())?))
    }

    pub fn remap_record(&mut self, record: &FunctionRecord) -> Result<FunctionRecord, StringPoolError> {
        let mut out = FunctionRecord::new(record.range, self.get_or_intern(record.name)?);
        if let Some(lines) = &record.line_table {
            let mut entries = Vec::with_capacity(lines.len());
            for entry in lines {
                entries.push(LineEntry::new(entry.address, self.file(entry.file)?, entry.line));
            }
            // Same addresses, same order: cannot fail.
            out.line_table = LineTable::new(entries).ok();
        }
        if let Some(root) = &record.inline_tree {
            out.inline_tree = Some(self.remap_node(root)?);
        }
        Ok(out)
    }

    fn remap_node(&mut self, node: &InlineNode) -> Result<InlineNode, StringPoolError> {
        let name = self.get_or_intern(node.name)?;
        let call_file = self.file(node.call_file)?;
        let children = node
            .children
            .iter()
            .map(|child| self.remap_node(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InlineNode::new(node.range, name, call_file, node.call_line).with_children(children))
    }

    pub fn finish(self) -> StringPool {
        self.pool
    }
}

/// Move `records` onto a pool holding only the strings they use.
pub fn compact(
    records: Vec<FunctionRecord>,
    strings: &impl StringLookup,
) -> Result<(Vec<FunctionRecord>, StringPool), BuildError> {
    let mut remap = StringRemap::new(strings);
    let records = records
        .iter()
        .map(|record| remap.remap_record(record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((records, remap.finish()))
}

/// Encode canonical records. `strings` must be the pool they reference.
pub fn emit(
    records: &[FunctionRecord],
    strings: &StringPool,
    options: &EncodeOptions,
) -> Result<Vec<u8>, BuildError> {
    let addr_size = options.resolve_address_size(records);
    let bytes = gsym_format::write(records, strings.as_bytes(), addr_size)?;
    tracing::debug!(
        functions = records.len(),
        addr_size = addr_size.width(),
        bytes = bytes.len(),
        "encoded store"
    );
    Ok(bytes)
}
