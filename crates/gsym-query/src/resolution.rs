//! Lookup results.

use std::fmt;

use gsym_core::Range;

/// A file and line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One inlined call active at the looked-up address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCall {
    /// Name of the inlined function.
    pub name: String,
    pub range: Range,
    /// Where the caller invoked it; `None` when the reader recorded no site.
    pub call_site: Option<SourceLocation>,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub address: u64,
    /// Name of the enclosing (outermost) function.
    pub function: String,
    pub range: Range,
    /// From the line table, if the function has one.
    pub location: Option<SourceLocation>,
    /// Innermost first; does not include the enclosing function.
    pub inline_chain: Vec<InlineCall>,
}

/// A symbolizer frame: one function and where execution is inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub function: &'a str,
    pub location: Option<&'a SourceLocation>,
}

impl Resolution {
    /// Expand into frames, innermost first, ending with the enclosing function.
    ///
    /// The innermost frame sits at the line-table location; every outer frame
    /// sits at the call site of the frame just inside it.
    pub fn frames(&self) -> Vec<Frame<'_>> {
        let mut frames = Vec::with_capacity(self.inline_chain.len() + 1);
        let mut location = self.location.as_ref();
        for call in &self.inline_chain {
            frames.push(Frame {
                function: &call.name,
                location,
            });
            location = call.call_site.as_ref();
        }
        frames.push(Frame {
            function: &self.function,
            location,
        });
        frames
    }

    /// Format the frames for display, numbering the first as `frame_num`.
    pub fn format(&self, frame_num: usize) -> String {
        let mut lines = Vec::new();
        for (idx, frame) in self.frames().iter().enumerate() {
            let prefix = if idx == 0 {
                format!("#{frame_num:<2}")
            } else {
                "   ".to_string()
            };
            lines.push(format!("{prefix} {:#018x} {}", self.address, frame.function));
            if let Some(location) = frame.location {
                lines.push(format!("{:22}at {location}", ""));
            }
        }
        lines.join("\n")
    }

    /// Whether the address lies in inlined code.
    pub fn is_inlined(&self) -> bool {
        !self.inline_chain.is_empty()
    }
}
