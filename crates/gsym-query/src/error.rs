use gsym_format::FormatError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The ordinary miss: no function covers the address.
    #[error("no function contains address {0:#x}")]
    NotFound(u64),
    /// The covering function's payload failed to decode.
    #[error(transparent)]
    Decode(#[from] FormatError),
}
