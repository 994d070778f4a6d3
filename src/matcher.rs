use crate::{MatchOptions, Matches, MatcherImpl, Result};

/// An approximate matcher for one pattern and distance threshold.
///
/// The matcher owns two lazily built DFAs: the forward DFA that detects where a match
/// ends and a reverse DFA, built from the reversed pattern, that recovers where it
/// starts. Both grow while strings are scanned and are only released when the matcher
/// is dropped, so reusing one matcher across many strings amortises the construction
/// work.
///
/// A matcher is a stateful, single-threaded value: every scan call mutates the DFAs,
/// the staged match buffer and the cached line buffer. Use one matcher per task, or
/// wrap access in external mutual exclusion.
///
/// ```
/// use seqscan::{Matcher, MatchOptions, Reporting};
///
/// let mut matcher = Matcher::new("AC[GT]T", 1)?;
/// let options = MatchOptions::new().with_reporting(Reporting::All);
/// let count = matcher.match_string("GGACGTGG", options)?;
/// assert_eq!(count, 1);
/// let hit = matcher.match_iter().next().unwrap();
/// assert_eq!((hit.start(), hit.end(), hit.distance()), (2, 6, 0));
/// # Ok::<(), seqscan::SeqscanError>(())
/// ```
#[derive(Debug)]
pub struct Matcher {
    pub(crate) inner: MatcherImpl,
}

impl Matcher {
    /// Create a matcher with an unbounded memory budget.
    ///
    /// The pattern is an expression over `ACGTUN` with optional bracket groups;
    /// `distance` is the maximum Levenshtein distance and must be smaller than the
    /// number of matching positions of the pattern.
    pub fn new(pattern: &str, distance: usize) -> Result<Self> {
        Ok(Matcher {
            inner: MatcherImpl::try_new(pattern, distance, 0)?,
        })
    }

    /// Scan a string and stage its matches according to `options`.
    ///
    /// Returns the number of staged matches. The string is copied into the matcher's
    /// line buffer first, so [`Matcher::last_string`] returns it until the next scan.
    pub fn match_string(&mut self, data: &str, options: MatchOptions) -> Result<usize> {
        self.inner.match_string(data, options)
    }

    /// Get the matches staged by the most recent scan, in left-to-right order.
    pub fn matches(&self) -> &[crate::Match] {
        self.inner.matches()
    }

    /// Returns an iterator over the matches staged by the most recent scan.
    pub fn match_iter(&self) -> Matches<'_> {
        Matches::new(self.inner.matches())
    }

    /// Get the most recently scanned string.
    pub fn last_string(&self) -> &str {
        self.inner.last_string()
    }

    /// The number of matching positions of the compiled pattern.
    pub fn pattern_len(&self) -> usize {
        self.inner.pattern_len()
    }

    /// The maximum Levenshtein distance of this matcher.
    pub fn distance(&self) -> usize {
        self.inner.distance()
    }

    /// The approximate memory consumed by both DFAs and their tries.
    pub fn memory_footprint(&self) -> usize {
        self.inner.memory_footprint()
    }

    /// The numbers of materialised states of the forward and reverse DFA.
    pub fn state_counts(&self) -> (usize, usize) {
        self.inner.state_counts()
    }

    /// The numbers of allocated trie nodes of the forward and reverse DFA.
    pub fn trie_node_counts(&self) -> (usize, usize) {
        self.inner.trie_node_counts()
    }

    /// Render the materialised part of the forward DFA to the graphviz dot format.
    #[cfg(feature = "dot_writer")]
    pub fn write_forward_dot<W: std::io::Write>(&self, label: &str, output: &mut W) {
        crate::internal::dot::dfa_render(self.inner.forward_dfa(), label, output);
    }
}
