//! The lazy store queried in place over encoded bytes.

use std::path::Path;

use gsym_format::Module;
use gsym_query::{LookupError, LookupOptions, ModuleSource, QueryEngine, Resolution};

use crate::error::Result;

/// An encoded store whose functions are decoded on first lookup.
///
/// Header and index are validated at load. A corrupt function payload
/// surfaces as [`LookupError::Decode`] from the lookups that reach it.
#[derive(Debug)]
pub struct MappedStore {
    engine: QueryEngine<ModuleSource>,
}

impl MappedStore {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::from_module(Module::from_bytes(bytes)?))
    }

    /// Memory-map a store file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_module(Module::map_path(path)?))
    }

    /// Read a store file into memory.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_module(Module::from_path(path)?))
    }

    fn from_module(module: Module) -> Self {
        Self {
            engine: QueryEngine::new(ModuleSource::new(module)),
        }
    }

    /// Set the default lookup options.
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.engine = self.engine.options(options);
        self
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

    pub fn module(&self) -> &Module {
        self.engine.source().module()
    }

    pub fn len(&self) -> usize {
        self.module().len()
    }

    pub fn is_empty(&self) -> bool {
        self.module().is_empty()
    }

    /// Number of functions decoded so far.
    pub fn materialized(&self) -> usize {
        self.engine.source().materialized()
    }

    pub fn max_end(&self) -> u64 {
        self.engine.max_end()
    }

    pub fn dump(&self) -> String {
        gsym_format::dump::dump(self.module())
    }
}
