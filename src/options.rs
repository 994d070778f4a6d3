//! Module with the option types that control a single scan call.
//!
//! The three option groups are orthogonal; a [`MatchOptions`] value combines one choice
//! from each group.

/// Which matches of a scanned string are reported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    /// Stop after the first match of the string.
    #[default]
    First,
    /// Scan the whole string and keep only the match with the smallest distance.
    /// On ties the earliest match wins.
    Best,
    /// Report one match per run of candidate end positions.
    All,
}

/// How bytes outside of the DNA/RNA alphabet are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NonDnaPolicy {
    /// An illegal byte ends the scan of the current string.
    #[default]
    Fail,
    /// An illegal byte is folded to `N`.
    Convert,
    /// An illegal byte is skipped without advancing the DFA.
    Ignore,
}

/// How the input string is framed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The scan stops at the first newline.
    #[default]
    Lines,
    /// Newlines are skipped like whitespace and the whole string is scanned.
    Stream,
}

/// The options of a single scan call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// The reporting mode.
    pub reporting: Reporting,
    /// The non-DNA byte policy.
    pub non_dna: NonDnaPolicy,
    /// The input framing.
    pub framing: Framing,
}

impl MatchOptions {
    /// Create options with the default of every group (`First`, `Fail`, `Lines`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reporting mode.
    pub fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    /// Set the non-DNA byte policy.
    pub fn with_non_dna(mut self, non_dna: NonDnaPolicy) -> Self {
        self.non_dna = non_dna;
        self
    }

    /// Set the input framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}
