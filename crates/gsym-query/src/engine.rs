//! The lookup engine.

use gsym_core::{FunctionRecord, StringLookup, StringRef};
use gsym_format::FormatError;

use crate::error::LookupError;
use crate::options::{LookupOptions, ZeroSizePolicy};
use crate::resolution::{InlineCall, Resolution, SourceLocation};
use crate::source::FunctionSource;

/// Answers address lookups over a [`FunctionSource`].
///
/// Every record links back to the latest earlier record still open at its
/// start. A lookup is one binary search followed by a walk along those
/// links, which visits only records that could enclose the address.
#[derive(Debug)]
pub struct QueryEngine<S> {
    source: S,
    links: Vec<Link>,
    max_end: u64,
    options: LookupOptions,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    /// Greatest earlier index whose range ends past this record's start.
    prev: Option<usize>,
    /// Max end over every record reachable through `prev`; 0 without one.
    reach: u64,
}

impl<S: FunctionSource> QueryEngine<S> {
    pub fn new(source: S) -> Self {
        let mut links: Vec<Link> = Vec::with_capacity(source.len());
        let mut max_end = 0u64;
        // Non-empty records not yet closed by a later start, as (index, end).
        let mut open: Vec<(usize, u64)> = Vec::new();
        for index in 0..source.len() {
            let range = source.range(index);
            max_end = max_end.max(range.end());
            while open.last().is_some_and(|&(_, end)| end <= range.start()) {
                open.pop();
            }
            let link = match open.last() {
                Some(&(prev, end)) => Link {
                    prev: Some(prev),
                    reach: end.max(links[prev].reach),
                },
                None => Link {
                    prev: None,
                    reach: 0,
                },
            };
            links.push(link);
            if !range.is_empty() {
                open.push((index, range.end()));
            }
        }
        Self {
            source,
            links,
            max_end,
            options: LookupOptions::default(),
        }
    }

    /// Set the default lookup options.
    pub fn options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn get_options(&self) -> LookupOptions {
        self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// One past the highest end address; 0 when empty.
    pub fn max_end(&self) -> u64 {
        self.max_end
    }

    pub fn lookup(&self, addr: u64) -> Result<Resolution, LookupError> {
        self.lookup_with(addr, &self.options)
    }

    pub fn lookup_with(
        &self,
        addr: u64,
        options: &LookupOptions,
    ) -> Result<Resolution, LookupError> {
        let index = self.find(addr, options).ok_or(LookupError::NotFound(addr))?;
        let record = self.source.function(index)?;
        Ok(self.resolve(addr, record)?)
    }

    /// Index of the record answering `addr`.
    ///
    /// Among containing ranges the smallest wins, ties going to the greater
    /// start. A zero-size range at exactly `addr` is the fallback when
    /// nothing contains it.
    pub fn find(&self, addr: u64, options: &LookupOptions) -> Option<usize> {
        let upper = self.upper_bound(addr);
        let last = upper.checked_sub(1)?;

        // Starts decrease along the walk, so equal sizes keep the first seen.
        let mut best: Option<(usize, u64)> = None;
        let mut next = Some(last);
        while let Some(index) = next {
            let range = self.source.range(index);
            if range.contains(addr) && best.is_none_or(|(_, size)| range.size() < size) {
                best = Some((index, range.size()));
            }
            let link = self.links[index];
            if link.reach <= addr {
                break;
            }
            next = link.prev;
        }

        if let Some((index, _)) = best {
            return Some(index);
        }

        let range = self.source.range(last);
        let exact = options.zero_size == ZeroSizePolicy::ExactMatch
            && range.is_empty()
            && range.start() == addr;
        exact.then_some(last)
    }

    /// Number of records starting at or before `addr`.
    fn upper_bound(&self, addr: u64) -> usize {
        let (mut lo, mut hi) = (0, self.source.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.source.range(mid).start() <= addr {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    fn resolve(&self, addr: u64, record: &FunctionRecord) -> Result<Resolution, FormatError> {
        let strings = self.source.strings();
        let text = |sym: StringRef| -> Result<String, FormatError> {
            Ok(strings.resolve(sym)?.to_owned())
        };

        let location = match record.lookup_line(addr) {
            Some(entry) => Some(SourceLocation {
                file: text(entry.file.path())?,
                line: entry.line,
            }),
            None => None,
        };

        let mut inline_chain = Vec::new();
        for node in record.inline_chain(addr) {
            let call_site = if node.call_file.is_unknown() && node.call_line == 0 {
                None
            } else {
                Some(SourceLocation {
                    file: text(node.call_file.path())?,
                    line: node.call_line,
                })
            };
            inline_chain.push(InlineCall {
                name: text(node.name)?,
                range: node.range,
                call_site,
            });
        }

        Ok(Resolution {
            address: addr,
            function: text(record.name)?,
            range: record.range,
            location,
            inline_chain,
        })
    }
}
