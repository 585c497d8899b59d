//! The eager, fully materialized store.

use gsym_builder::{BuildOutput, Collector, Diagnostics, EncodeOptions, emit};
use gsym_core::{FunctionRecord, StringPool};
use gsym_format::{FormatError, Module};
use gsym_query::{LookupError, LookupOptions, QueryEngine, RecordSource, Resolution};

use crate::error::Result;

/// An immutable symbol store held entirely in memory.
///
/// Constructed by [`build`](crate::build), [`Store::build_with`] or
/// [`Store::decode`]. Shared references may be used from any number of
/// threads.
#[derive(Debug)]
pub struct Store {
    engine: QueryEngine<RecordSource>,
    diagnostics: Diagnostics,
}

impl Store {
    /// Merge everything a collector gathered.
    pub fn build_with(collector: Collector) -> Result<Self> {
        let BuildOutput {
            records,
            strings,
            diagnostics,
        } = collector.finish()?;
        Ok(Self::from_parts(records, strings, diagnostics))
    }

    /// Decode an encoded store, validating every function up front.
    pub fn decode(bytes: Vec<u8>) -> Result<Self> {
        let module = Module::from_bytes(bytes)?;
        let mut records = Vec::with_capacity(module.len());
        for index in 0..module.len() {
            records.push(module.decode_function(index)?);
        }
        let strings = StringPool::from_blob(module.strings().as_bytes().to_vec())
            .map_err(FormatError::from)?;
        tracing::debug!(functions = records.len(), "decoded store");
        Ok(Self::from_parts(records, strings, Diagnostics::new()))
    }

    fn from_parts(
        records: Vec<FunctionRecord>,
        strings: StringPool,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            engine: QueryEngine::new(RecordSource::new(records, strings)),
            diagnostics,
        }
    }

    /// Set the default lookup options.
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.engine = self.engine.options(options);
        self
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&EncodeOptions::default())
    }

    pub fn encode_with(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        Ok(emit(self.functions(), self.strings(), options)?)
    }

    pub fn lookup(&self, addr: u64) -> std::result::Result<Resolution, LookupError> {
        self.engine.lookup(addr)
    }

    pub fn lookup_with(
        &self,
        addr: u64,
        options: &LookupOptions,
    ) -> std::result::Result<Resolution, LookupError> {
        self.engine.lookup_with(addr, options)
    }

    /// Anomalies salvaged while building. Empty for decoded stores.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Canonical records, by strictly ascending start address.
    pub fn functions(&self) -> &[FunctionRecord] {
        self.engine.source().records()
    }

    pub fn strings(&self) -> &StringPool {
        self.engine.source().pool()
    }

    pub fn len(&self) -> usize {
        self.functions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions().is_empty()
    }

    /// One past the highest covered address; 0 when empty.
    pub fn max_end(&self) -> u64 {
        self.engine.max_end()
    }

    /// Human-readable listing of the encoded form.
    pub fn dump(&self) -> Result<String> {
        let module = Module::from_bytes(self.encode()?)?;
        Ok(gsym_format::dump::dump(&module))
    }
}
