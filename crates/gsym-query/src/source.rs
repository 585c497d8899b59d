//! Record sources the engine can query.

use std::sync::OnceLock;

use gsym_core::{FunctionRecord, Range, StringLookup, StringPool};
use gsym_format::{FormatError, Module};

/// Sorted function records addressable by index.
///
/// Starts must be strictly ascending in index order.
pub trait FunctionSource {
    type Strings: StringLookup;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range of record `index`; cheap, no payload decoding.
    fn range(&self, index: usize) -> Range;

    /// Full record `index`, decoding it if needed.
    fn function(&self, index: usize) -> Result<&FunctionRecord, FormatError>;

    fn strings(&self) -> &Self::Strings;
}

/// Fully materialized records and their string pool.
#[derive(Debug, Clone, Default)]
pub struct RecordSource {
    records: Vec<FunctionRecord>,
    strings: StringPool,
}

impl RecordSource {
    pub fn new(records: Vec<FunctionRecord>, strings: StringPool) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].start() < w[1].start()));
        Self { records, strings }
    }

    pub fn records(&self) -> &[FunctionRecord] {
        &self.records
    }

    pub fn pool(&self) -> &StringPool {
        &self.strings
    }
}

impl FunctionSource for RecordSource {
    type Strings = StringPool;

    fn len(&self) -> usize {
        self.records.len()
    }

    fn range(&self, index: usize) -> Range {
        self.records[index].range
    }

    fn function(&self, index: usize) -> Result<&FunctionRecord, FormatError> {
        Ok(&self.records[index])
    }

    fn strings(&self) -> &StringPool {
        &self.strings
    }
}

/// A loaded module whose payloads are decoded on first touch.
///
/// Each slot is initialized at most once, so concurrent first lookups of
/// the same function agree on the result, including a decode error.
#[derive(Debug)]
pub struct ModuleSource {
    module: Module,
    cache: Box<[OnceLock<Result<FunctionRecord, FormatError>>]>,
}

impl ModuleSource {
    pub fn new(module: Module) -> Self {
        let cache = (0..module.len()).map(|_| OnceLock::new()).collect();
        Self { module, cache }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Number of payloads decoded so far.
    pub fn materialized(&self) -> usize {
        self.cache.iter().filter(|slot| slot.get().is_some()).count()
    }
}

impl FunctionSource for ModuleSource {
    type Strings = Module;

    fn len(&self) -> usize {
        self.module.len()
    }

    fn range(&self, index: usize) -> Range {
        self.module.range(index)
    }

    fn function(&self, index: usize) -> Result<&FunctionRecord, FormatError> {
        self.cache[index]
            .get_or_init(|| {
                tracing::trace!(index, "materializing function");
                self.module.decode_function(index)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn strings(&self) -> &Module {
        &self.module
    }
}
