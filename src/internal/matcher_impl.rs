//! The scanning engine.
//!
//! The engine owns the forward DFA, the reverse DFA built from the reversed pattern,
//! the staged match buffer and the cached line buffer. A scan feeds translated symbol
//! classes into the forward DFA and watches the last-column distance: a run of
//! positions with non-increasing distance is a set of candidate match ends sharing a
//! best distance, and exactly one hit is emitted when the distance rises out of the
//! run. The start of the hit is recovered by driving the reverse DFA backwards from
//! the end position until it reaches the run's distance.

use log::trace;

use crate::errors::{Result, SeqscanErrorKind};
use crate::options::{Framing, MatchOptions, NonDnaPolicy, Reporting};
use crate::Match;

use super::dfa::{Dfa, ROOT};
use super::keys::{compile_pattern, PositionKey};
use super::translate::{ILLEGAL, NBASES, NEWLINE, TERMINATOR, TRANSLATE_CONVERT, TRANSLATE_IGNORE};

const INITIAL_MATCH_STACK_SIZE: usize = 16;

/// The engine behind [`crate::Matcher`].
#[derive(Debug)]
pub(crate) struct MatcherImpl {
    tau: usize,
    width: usize,
    keys: Vec<PositionKey>,
    rkeys: Vec<PositionKey>,
    dfa: Dfa,
    rdfa: Dfa,
    hits: Vec<Match>,
    line: String,
}

impl MatcherImpl {
    /// Compile the pattern and set up the forward and reverse DFAs.
    pub(crate) fn try_new(pattern: &str, distance: usize, max_memory: usize) -> Result<Self> {
        if distance >= u16::MAX as usize {
            return Err(SeqscanErrorKind::InvalidDistance(distance).into());
        }
        let keys = compile_pattern(pattern)?;
        let width = keys.len();
        if distance >= width {
            return Err(SeqscanErrorKind::PatternTooShort {
                len: width,
                distance,
            }
            .into());
        }
        let rkeys: Vec<PositionKey> = keys.iter().rev().copied().collect();
        let dfa = Dfa::new(width, distance, max_memory)?;
        let rdfa = Dfa::new(width, distance, max_memory)?;
        trace!("compiled pattern '{pattern}' into {width} position keys, distance {distance}");
        Ok(MatcherImpl {
            tau: distance,
            width,
            keys,
            rkeys,
            dfa,
            rdfa,
            hits: Vec::with_capacity(INITIAL_MATCH_STACK_SIZE),
            line: String::new(),
        })
    }

    /// The number of matching positions of the compiled pattern.
    pub(crate) fn pattern_len(&self) -> usize {
        self.width
    }

    /// The distance threshold.
    pub(crate) fn distance(&self) -> usize {
        self.tau
    }

    /// The staged hits of the most recent scan, in left-to-right order.
    pub(crate) fn matches(&self) -> &[Match] {
        &self.hits
    }

    /// The most recently scanned string.
    pub(crate) fn last_string(&self) -> &str {
        &self.line
    }

    /// The memory consumed by both DFAs and their tries.
    pub(crate) fn memory_footprint(&self) -> usize {
        self.dfa.byte_size() + self.rdfa.byte_size()
    }

    /// The vertex counts of the forward and reverse DFA.
    pub(crate) fn state_counts(&self) -> (usize, usize) {
        (self.dfa.vertex_count(), self.rdfa.vertex_count())
    }

    /// The trie node counts of the forward and reverse DFA.
    pub(crate) fn trie_node_counts(&self) -> (usize, usize) {
        (self.dfa.trie_node_count(), self.rdfa.trie_node_count())
    }

    #[cfg(feature = "dot_writer")]
    pub(crate) fn forward_dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Scan `data`, stage the hits according to `options` and return the hit count.
    pub(crate) fn match_string(&mut self, data: &str, options: MatchOptions) -> Result<usize> {
        self.line.clear();
        self.line.push_str(data);
        let line = std::mem::take(&mut self.line);
        let result = self.scan(line.as_bytes(), options);
        self.line = line;
        result?;
        trace!("scan of {} bytes staged {} hits", data.len(), self.hits.len());
        Ok(self.hits.len())
    }

    fn scan(&mut self, data: &[u8], options: MatchOptions) -> Result<()> {
        let best = options.reporting == Reporting::Best;
        let all = best || options.reporting == Reporting::All;
        let ignore = options.non_dna == NonDnaPolicy::Ignore;
        let stream = options.framing == Framing::Stream;
        let translate: &[u8; 256] = match options.non_dna {
            NonDnaPolicy::Convert => &TRANSLATE_CONVERT,
            _ => &TRANSLATE_IGNORE,
        };

        self.hits.clear();

        let len = data.len();
        let cap = (self.tau + 1) as u32;
        let mut best_distance = cap;
        let mut streak_distance = cap;
        let mut staged = false;
        let mut current = ROOT;
        let mut end_scan = false;

        for i in 0..=len {
            let class = if i == len {
                TERMINATOR
            } else {
                translate[data[i] as usize]
            };

            let mut distance = cap;
            let mut min_to_match = 0usize;
            if (class as usize) < NBASES {
                current = self.dfa.step(current, class as usize, &self.keys)?;
                let descriptor = self.dfa.descriptor(current);
                distance = descriptor.distance as u32;
                min_to_match = descriptor.min_to_match as usize;
            } else if class == NEWLINE && stream {
                continue;
            } else if class == ILLEGAL && ignore {
                continue;
            } else {
                // Terminator, newline under line framing, or illegal under the fail
                // policy: flush a pending run and stop.
                end_scan = true;
            }

            // Not enough input left to ever reach the threshold again.
            if (len - i).saturating_sub(1) < min_to_match {
                distance = cap;
                end_scan = true;
            }

            // A non-rising distance re-arms emission for the current run.
            if streak_distance >= distance {
                staged = false;
            }

            // The distance rises out of a run whose best is below the threshold:
            // emit exactly one hit for the run.
            if streak_distance <= self.tau as u32
                && streak_distance < distance
                && !staged
                && (!best || streak_distance < best_distance)
            {
                staged = true;
                let start = self.find_start(data, i, streak_distance, translate)?;
                let hit = Match::new(start, i, streak_distance as usize);
                if best {
                    self.hits.clear();
                    self.hits.push(hit);
                    best_distance = streak_distance;
                } else {
                    self.hits.push(hit);
                }
                if !all {
                    end_scan = true;
                }
            }

            if end_scan {
                break;
            }
            streak_distance = distance;
        }

        Ok(())
    }

    /// Recover the start of a match ending at `end` with distance `run_distance` by
    /// driving the reverse DFA backwards until it reaches that distance.
    fn find_start(
        &mut self,
        data: &[u8],
        end: usize,
        run_distance: u32,
        translate: &[u8; 256],
    ) -> Result<usize> {
        let mut consumed = 0usize;
        let mut node = ROOT;
        let mut distance = (self.tau + 1) as u32;
        while distance > run_distance && consumed < end {
            consumed += 1;
            let class = translate[data[end - consumed] as usize];
            // Skipped bytes stay inside the interval but do not advance the DFA.
            if (class as usize) < NBASES {
                node = self.rdfa.step(node, class as usize, &self.rkeys)?;
                distance = self.rdfa.descriptor(node).distance as u32;
            }
        }
        if distance > run_distance {
            // The forward pass guarantees an alignment within the consumed prefix.
            debug_assert!(
                false,
                "reverse recovery failed to reach distance {run_distance} at offset {end}"
            );
            return Err(SeqscanErrorKind::InternalTrieFault.into());
        }
        Ok(end - consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(matcher: &MatcherImpl) -> Vec<(usize, usize, usize)> {
        matcher
            .matches()
            .iter()
            .map(|m| (m.start(), m.end(), m.distance()))
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut matcher = MatcherImpl::try_new("ACGT", 0, 0).unwrap();
        let options = MatchOptions::new().with_reporting(Reporting::All);
        let count = matcher.match_string("TTACGTTT", options).unwrap();
        assert_eq!(count, 1);
        assert_eq!(hits(&matcher), vec![(2, 6, 0)]);
    }

    #[test]
    fn test_best_of_line() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut matcher = MatcherImpl::try_new("ACGT", 1, 0).unwrap();
        let options = MatchOptions::new().with_reporting(Reporting::Best);
        let count = matcher.match_string("TTACCTTT", options).unwrap();
        assert_eq!(count, 1);
        assert_eq!(hits(&matcher), vec![(2, 6, 1)]);
    }

    #[test]
    fn test_last_string() {
        let mut matcher = MatcherImpl::try_new("ACGT", 0, 0).unwrap();
        matcher.match_string("GGACGTGG", MatchOptions::new()).unwrap();
        assert_eq!(matcher.last_string(), "GGACGTGG");
    }

    #[test]
    fn test_match_buffer_cleared_per_scan() {
        let mut matcher = MatcherImpl::try_new("ACGT", 0, 0).unwrap();
        let options = MatchOptions::new().with_reporting(Reporting::All);
        assert_eq!(matcher.match_string("ACGT", options).unwrap(), 1);
        assert_eq!(matcher.match_string("TTTT", options).unwrap(), 0);
        assert!(matcher.matches().is_empty());
    }
}
