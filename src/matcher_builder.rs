use crate::{Matcher, MatcherImpl, Result};

/// A builder for creating a [`Matcher`].
///
/// The builder carries the settings that are fixed for the lifetime of a matcher; the
/// per-scan settings live in [`crate::MatchOptions`].
#[derive(Debug, Clone, Default)]
pub struct MatcherBuilder {
    memory_limit: usize,
}

impl MatcherBuilder {
    /// Creates a new matcher builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the memory consumed by the DFAs and their tries to the given number of
    /// bytes, 0 meaning unbounded.
    ///
    /// A matcher whose limit is reached keeps producing correct results: it stops
    /// materialising states and recomputes alignment rows on every step instead.
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Builds the matcher for the given pattern and distance threshold.
    pub fn build(self, pattern: &str, distance: usize) -> Result<Matcher> {
        Ok(Matcher {
            inner: MatcherImpl::try_new(pattern, distance, self.memory_limit)?,
        })
    }
}
