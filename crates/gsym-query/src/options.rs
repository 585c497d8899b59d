/// How zero-size ranges (symbols without a known size) take part in lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroSizePolicy {
    /// Match a query for exactly the range's address, unless a sized range
    /// already contains it.
    #[default]
    ExactMatch,
    /// Never match.
    Never,
}

/// Lookup configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub(crate) zero_size: ZeroSizePolicy,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero-size range policy.
    pub fn zero_size(mut self, policy: ZeroSizePolicy) -> Self {
        self.zero_size = policy;
        self
    }

    pub fn get_zero_size(&self) -> ZeroSizePolicy {
        self.zero_size
    }
}
