use gsym_core::Range;

/// Anomalies found while turning reader output into canonical records.
///
/// All of them are recoverable: the offending piece is dropped or kept as
/// is, and the build carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Construction
    NamelessCandidate,
    InvalidString,
    LineEntryOutOfRange,
    MalformedInlineRange,

    // Merge
    DivergentDuplicate,
    RangeConflict,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::NamelessCandidate => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Short kebab-case identifier used in rendered output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NamelessCandidate => "nameless-candidate",
            Self::InvalidString => "invalid-string",
            Self::LineEntryOutOfRange => "line-out-of-range",
            Self::MalformedInlineRange => "malformed-inline-range",
            Self::DivergentDuplicate => "divergent-duplicate",
            Self::RangeConflict => "range-conflict",
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::NamelessCandidate => "candidate without a name discarded",
            Self::InvalidString => "candidate with a NUL byte in a string discarded",
            Self::LineEntryOutOfRange => "line entry outside function range dropped",
            Self::MalformedInlineRange => "inline subtree dropped",
            Self::DivergentDuplicate => "rich duplicate differs from the kept record",
            Self::RangeConflict => "ranges overlap without nesting",
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → `"{fallback}: {detail}"`
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => format!("{}: {}", self.fallback_message(), detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Address span the diagnostic is about.
    pub(crate) range: Range,
    pub(crate) message: String,
    pub(crate) severity: Severity,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: Range) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            severity: kind.default_severity(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}]: {} at {}",
            self.severity,
            self.kind.code(),
            self.message,
            self.range
        )
    }
}
