//! Thread-safe candidate collection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use gsym_core::{FunctionRecord, StringPool, StringPoolError, StringRef};

use crate::candidate::Candidate;
use crate::construct;
use crate::diagnostics::Diagnostics;
use crate::emit::compact;
use crate::error::BuildError;
use crate::merge::merge;

/// Shared sink for reader threads.
///
/// Readers intern strings and append records concurrently; [`finish`]
/// merges everything single-threaded. The result does not depend on the
/// order in which records arrived.
///
/// [`finish`]: Collector::finish
#[derive(Debug, Default)]
pub struct Collector {
    strings: Mutex<StringPool>,
    records: Mutex<Vec<FunctionRecord>>,
    diagnostics: Mutex<Diagnostics>,
}

/// Canonical records plus the string pool they reference.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Sorted by strictly ascending start address.
    pub records: Vec<FunctionRecord>,
    /// Holds exactly the strings `records` use, in first-use order.
    pub strings: StringPool,
    pub diagnostics: Diagnostics,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Guarded data is append-only, so a panicked writer leaves it usable.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, s: &str) -> Result<StringRef, StringPoolError> {
        lock(&self.strings).intern(s)
    }

    /// Append an already-interned record. Its strings must come from
    /// [`intern`](Self::intern) on this collector. Ranges are checked at
    /// [`finish`](Self::finish), not here.
    pub fn add(&self, record: FunctionRecord) {
        lock(&self.records).push(record);
    }

    pub fn extend(&self, records: impl IntoIterator<Item = FunctionRecord>) {
        lock(&self.records).extend(records);
    }

    /// Convert and append one raw candidate. Returns whether a record was kept.
    pub fn add_candidate(&self, candidate: &Candidate) -> Result<bool, BuildError> {
        Ok(self.add_candidates(std::slice::from_ref(candidate))? == 1)
    }

    /// Convert and append a batch, taking each lock once. Returns the number
    /// of records kept.
    ///
    /// Fails only when the string pool is full; records converted before
    /// that point are discarded with the batch.
    pub fn add_candidates<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a Candidate>,
    ) -> Result<usize, BuildError> {
        let mut local = Diagnostics::new();
        let mut built: Vec<FunctionRecord> = Vec::new();
        {
            let mut pool = lock(&self.strings);
            let mut intern = |s: &str| pool.intern(s);
            for candidate in candidates {
                if let Some(record) = construct::build_record(candidate, &mut intern, &mut local)? {
                    built.push(record);
                }
            }
        }

        if !local.is_empty() {
            lock(&self.diagnostics).extend(local);
        }
        let kept = built.len();
        self.extend(built);
        Ok(kept)
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge collected records into canonical form.
    pub fn finish(self) -> Result<BuildOutput, BuildError> {
        let strings = self
            .strings
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let records = self
            .records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut diagnostics = self
            .diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let merged = merge(records, &strings, &mut diagnostics)?;
        let (records, strings) = compact(merged, &strings)?;
        diagnostics.sort();

        tracing::debug!(
            records = records.len(),
            strings = strings.len(),
            diagnostics = diagnostics.len(),
            "build finished"
        );

        Ok(BuildOutput {
            records,
            strings,
            diagnostics,
        })
    }
}
