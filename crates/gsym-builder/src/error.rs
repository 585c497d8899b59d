use gsym_core::StringPoolError;
use gsym_format::WriteError;

/// Internal failure while building or emitting a store.
///
/// Reader-side anomalies never end up here; they become diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("record {index} at {start:#x} does not start after its predecessor")]
    Unsorted { index: usize, start: u64 },
    #[error("string pool: {0}")]
    Strings(#[from] StringPoolError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
