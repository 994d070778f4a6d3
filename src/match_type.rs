#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A match in the scanned string.
///
/// `start..end` is a half-open byte interval into the scanned string; the distance is
/// the Levenshtein distance between the matched substring and the pattern. The
/// interval length therefore lies within the distance of the pattern length, not
/// necessarily equal to it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    /// The start offset of the match, inclusive.
    start: usize,
    /// The end offset of the match, exclusive.
    end: usize,
    /// The matching distance.
    distance: usize,
}

impl Match {
    /// Create a new match.
    pub fn new(start: usize, end: usize, distance: usize) -> Self {
        Self {
            start,
            end,
            distance,
        }
    }

    /// Get the start of the match.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the matched interval as range.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Get the length of the matched interval.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the matched interval is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Get the matching distance.
    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}:{}", self.start, self.end, self.distance)
    }
}
