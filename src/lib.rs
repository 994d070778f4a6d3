#![forbid(missing_docs)]
//! # `seqscan`
//! The `seqscan` crate is a streaming approximate pattern matcher for DNA/RNA
//! sequence data. A pattern expression over `ACGTUN` with optional bracket groups
//! (e.g. `AC[AT]G`) is matched against arbitrary text within a maximum Levenshtein
//! distance, reporting every substring that aligns to the pattern within that
//! distance.
//!
//! The matcher drives a deterministic finite automaton whose states are alignment
//! rows of the Needleman-Wunsch matrix, truncated at the distance threshold. States
//! are materialised lazily while text is scanned and deduplicated through a trie of
//! compressed rows, so the automaton stays small in practice and construction work is
//! shared across scan calls. An optional memory budget caps the growth; when it is
//! reached the matcher transparently degrades to recomputing rows per step at lower
//! throughput.

/// Module with error definitions.
mod errors;
pub use errors::{PatternErrorKind, Result, SeqscanError, SeqscanErrorKind};

/// The module with internal implementation details.
mod internal;
pub(crate) use internal::MatcherImpl;

/// Module that provides a line-oriented file scanner.
mod line_scanner;
pub use line_scanner::LineScanner;

/// Module that provides an iterator over staged matches.
mod match_iter;
pub use match_iter::Matches;

/// Module that provides a Match type.
mod match_type;
pub use match_type::Match;

/// The module with the matcher.
mod matcher;
pub use matcher::Matcher;

/// The module with the matcher builder.
mod matcher_builder;
pub use matcher_builder::MatcherBuilder;

/// Module with the scan option types.
mod options;
pub use options::{Framing, MatchOptions, NonDnaPolicy, Reporting};
