use gsym_builder::BuildError;
use gsym_format::{FormatError, ModuleError};

/// Errors from building, encoding or loading a store.
///
/// Lookup misses are not errors here; they come back as
/// [`LookupError`](gsym_query::LookupError).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Module(#[from] ModuleError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
