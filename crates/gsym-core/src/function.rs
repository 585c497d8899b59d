//! Function records: the unit entity of a symbol store.

use std::cmp::Ordering;

use crate::inline::InlineNode;
use crate::line_table::{LineEntry, LineTable};
use crate::range::Range;
use crate::strings::StringRef;

/// Everything known about one contiguous address range.
///
/// A function split across several ranges is stored as several records that
/// share a name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FunctionRecord {
    pub range: Range,
    pub name: StringRef,
    pub line_table: Option<LineTable>,
    pub inline_tree: Option<InlineNode>,
}

impl FunctionRecord {
    pub fn new(range: Range, name: StringRef) -> Self {
        Self {
            range,
            name,
            line_table: None,
            inline_tree: None,
        }
    }

    pub fn with_line_table(mut self, lines: LineTable) -> Self {
        self.line_table = Some(lines);
        self
    }

    pub fn with_inline_tree(mut self, tree: InlineNode) -> Self {
        self.inline_tree = Some(tree);
        self
    }

    /// Symbol tables may yield entries with neither size nor lines, so the
    /// name is the only field that tells a real record from a blank one.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.name.is_none()
    }

    /// Whether this record carries more than a name and a range.
    #[inline]
    pub fn has_rich_info(&self) -> bool {
        self.line_table.is_some() || self.inline_tree.is_some()
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.range.start()
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.range.end()
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.range.size()
    }

    /// Line entry covering `addr`, if the record has a line table.
    pub fn lookup_line(&self, addr: u64) -> Option<&LineEntry> {
        self.line_table.as_ref()?.lookup(addr)
    }

    /// Inlined calls active at `addr`, innermost first.
    pub fn inline_chain(&self, addr: u64) -> Vec<&InlineNode> {
        self.inline_tree
            .as_ref()
            .map(|tree| tree.lookup_chain(addr))
            .unwrap_or_default()
    }
}

impl PartialOrd for FunctionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Range first; on equal ranges a record without an inline tree orders below
/// one with it, then line tables compare lexicographically (absent first).
///
/// The trailing name and inline-tree comparisons only keep the order
/// consistent with `Eq`.
impl Ord for FunctionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range
            .cmp(&other.range)
            .then_with(|| {
                self.inline_tree
                    .is_some()
                    .cmp(&other.inline_tree.is_some())
            })
            .then_with(|| self.line_table.cmp(&other.line_table))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.inline_tree.cmp(&other.inline_tree))
    }
}
