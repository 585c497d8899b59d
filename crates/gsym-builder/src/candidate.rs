//! Raw candidate records as handed over by debug-info readers.
//!
//! Candidates carry strings by value; the collector interns them.

use gsym_core::Range;
use serde::{Deserialize, Serialize};

/// One reader's view of a function range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub range: Range,
    pub name: String,
    /// Line entries in any order; duplicates resolve last-wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<CandidateLine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<CandidateInline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLine {
    pub address: u64,
    pub file: String,
    pub line: u32,
}

/// Inline call-site node. The root stands for the function itself and has no
/// call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInline {
    pub range: Range,
    pub name: String,
    #[serde(default)]
    pub call_file: String,
    #[serde(default)]
    pub call_line: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CandidateInline>,
}

impl Candidate {
    pub fn new(range: Range, name: impl Into<String>) -> Self {
        Self {
            range,
            name: name.into(),
            lines: None,
            inline: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<CandidateLine>) -> Self {
        self.lines = Some(lines);
        self
    }

    pub fn with_inline(mut self, root: CandidateInline) -> Self {
        self.inline = Some(root);
        self
    }

    /// Parse a JSON array of candidates.
    pub fn list_from_json(json: &str) -> Result<Vec<Candidate>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl CandidateLine {
    pub fn new(address: u64, file: impl Into<String>, line: u32) -> Self {
        Self {
            address,
            file: file.into(),
            line,
        }
    }
}

impl CandidateInline {
    pub fn new(
        range: Range,
        name: impl Into<String>,
        call_file: impl Into<String>,
        call_line: u32,
    ) -> Self {
        Self {
            range,
            name: name.into(),
            call_file: call_file.into(),
            call_line,
            children: Vec::new(),
        }
    }

    pub fn root(range: Range, name: impl Into<String>) -> Self {
        Self::new(range, name, "", 0)
    }

    pub fn with_children(mut self, children: Vec<CandidateInline>) -> Self {
        self.children = children;
        self
    }
}
