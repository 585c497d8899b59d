//! Inline call-site trees.
//!
//! The root node of a function's tree spans the function itself and has no
//! call site. Every descendant is a call that the compiler inlined into its
//! parent, with `call_file:call_line` naming the call site inside the parent.

use crate::range::Range;
use crate::strings::{FileRef, StringRef};

/// Ordering is structural (range, name, call site, children) and only serves
/// to keep [`FunctionRecord`](crate::FunctionRecord) ordering total.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct InlineNode {
    pub range: Range,
    pub name: StringRef,
    pub call_file: FileRef,
    pub call_line: u32,
    /// Sorted by range, non-overlapping, each inside `range`.
    pub children: Vec<InlineNode>,
}

impl InlineNode {
    pub fn new(range: Range, name: StringRef, call_file: FileRef, call_line: u32) -> Self {
        Self {
            range,
            name,
            call_file,
            call_line,
            children: Vec::new(),
        }
    }

    /// Root node for a function: no call site.
    pub fn root(range: Range, name: StringRef) -> Self {
        Self::new(range, name, FileRef::UNKNOWN, 0)
    }

    pub fn with_children(mut self, children: Vec<InlineNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(InlineNode::node_count).sum::<usize>()
    }

    /// Maximum nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(InlineNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Whether every child is sorted, disjoint from its siblings, and contained
    /// in its parent, recursively.
    pub fn is_well_formed(&self) -> bool {
        let contained = self
            .children
            .iter()
            .all(|c| self.range.contains_range(c.range));
        let disjoint = self
            .children
            .windows(2)
            .all(|w| w[0].range.end() <= w[1].range.start() && w[0].range < w[1].range);
        contained && disjoint && self.children.iter().all(InlineNode::is_well_formed)
    }

    /// Inlined calls active at `addr`, innermost first.
    ///
    /// The root itself is never part of the chain; an address outside the
    /// root yields an empty chain.
    pub fn lookup_chain(&self, addr: u64) -> Vec<&InlineNode> {
        let mut chain = Vec::new();
        if !self.range.contains(addr) {
            return chain;
        }
        let mut node = self;
        while let Some(child) = node.child_containing(addr) {
            chain.push(child);
            node = child;
        }
        chain.reverse();
        chain
    }

    fn child_containing(&self, addr: u64) -> Option<&InlineNode> {
        let idx = self
            .children
            .partition_point(|c| c.range.start() <= addr)
            .checked_sub(1)?;
        let child = &self.children[idx];
        child.range.contains(addr).then_some(child)
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a InlineNode, usize)) {
        fn go<'a>(node: &'a InlineNode, depth: usize, f: &mut impl FnMut(&'a InlineNode, usize)) {
            f(node, depth);
            for child in &node.children {
                go(child, depth + 1, f);
            }
        }
        go(self, 0, f);
    }
}
