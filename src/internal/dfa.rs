//! The lazy DFA.
//!
//! Each vertex of the DFA represents one alignment row of the pattern against the text
//! read so far, truncated at `tau + 1`. Vertices are materialised on first visit: a step
//! over an unresolved edge recomputes the row with the Bellman recurrence, asks the
//! deduplication trie whether the row is already known, and either links to the existing
//! vertex or allocates a new one.
//!
//! Vertex id 0 is the cache slot. It takes over when the memory budget is exhausted: its
//! edges stay unresolved so every step through it is recomputed, and its match
//! descriptor carries the row just computed. Vertex id 1 is the root, representing the
//! initial row `[0, 1, .., tau, tau+1, .., tau+1]`.

use log::trace;

use crate::errors::{Result, SeqscanErrorKind};

use super::ids::VertexID;
use super::keys::PositionKey;
use super::path;
use super::translate::NBASES;
use super::trie::Trie;

const INITIAL_DFA_SIZE: usize = 256;
// Vertex ids are u32 with one value reserved for the unresolved edge marker.
const ABS_MAX_VERTICES: usize = 0xFFFF_FFFE;

/// The marker of an edge whose target has not been computed yet.
pub(crate) const UNRESOLVED: u32 = u32::MAX;

/// The reserved cache slot, used when the memory budget has been exhausted.
pub(crate) const CACHE: VertexID = VertexID::new(0);

/// The root vertex every scan starts from.
pub(crate) const ROOT: VertexID = VertexID::new(1);

/// The match descriptor of a vertex: the alignment distance at the last column and the
/// smallest number of further input symbols before that distance can possibly drop to
/// `tau` or below.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MatchDescriptor {
    /// The distance at the last row column, saturated at `tau + 1`.
    pub(crate) distance: u16,
    /// The minimum number of additional symbols needed to possibly reach a match.
    pub(crate) min_to_match: u16,
}

/// One DFA vertex.
#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    /// The packed ternary path of the row this vertex represents.
    code: Box<[u8]>,
    /// The match descriptor of the row.
    descriptor: MatchDescriptor,
    /// One outgoing edge per input class, [`UNRESOLVED`] until first taken.
    next: [u32; NBASES],
}

impl Vertex {
    /// Create an unconnected vertex for the given row code.
    pub(crate) fn with_code(code: Box<[u8]>) -> Self {
        Vertex {
            code,
            descriptor: MatchDescriptor::default(),
            next: [UNRESOLVED; NBASES],
        }
    }

    /// Get the packed row code.
    #[inline]
    pub(crate) fn code(&self) -> &[u8] {
        &self.code
    }

    /// Get the match descriptor.
    #[inline]
    pub(crate) fn descriptor(&self) -> MatchDescriptor {
        self.descriptor
    }

    /// Get the resolved target of the edge for the given input class, if any.
    #[allow(dead_code)]
    pub(crate) fn edge(&self, base: usize) -> Option<VertexID> {
        (self.next[base] != UNRESOLVED).then(|| VertexID::new(self.next[base]))
    }
}

/// A growable lazy DFA with its deduplication trie.
#[derive(Debug)]
pub(crate) struct Dfa {
    vertices: Vec<Vertex>,
    trie: Trie,
    // Persistent row buffer. In cache mode it carries the live row between steps,
    // which is why stepping from the cache slot must not restore it.
    row: Vec<u32>,
    // Scratch for the ternary path of the row being computed.
    scratch: Vec<u8>,
    width: usize,
    tau: usize,
    // Byte budget over vertices plus trie nodes, 0 meaning unbounded.
    max_memory: usize,
    exhausted: bool,
}

impl Dfa {
    /// Create a DFA for a pattern of `width` positions and distance threshold `tau`,
    /// holding only the cache slot and the root vertex.
    pub(crate) fn new(width: usize, tau: usize, max_memory: usize) -> Result<Self> {
        debug_assert!(width >= 1 && tau < width);

        let code_len = path::encoded_len(width);
        let descriptor = MatchDescriptor {
            distance: (tau + 1) as u16,
            min_to_match: (width - tau).min(u16::MAX as usize) as u16,
        };

        // The initial row is [0, 1, .., tau, tau+1, .., tau+1]: tau + 1 rising
        // differences followed by flat ones.
        let mut scratch = vec![0u8; width];
        for (i, digit) in scratch.iter_mut().enumerate() {
            *digit = if i <= tau { 2 } else { 1 };
        }
        let mut root_code = vec![0u8; code_len].into_boxed_slice();
        path::encode(&scratch, &mut root_code);

        let mut vertices = Vec::with_capacity(INITIAL_DFA_SIZE);
        let mut cache = Vertex::with_code(vec![0u8; code_len].into_boxed_slice());
        cache.descriptor = descriptor;
        vertices.push(cache);
        let mut root = Vertex::with_code(root_code);
        root.descriptor = descriptor;
        vertices.push(root);

        let mut trie = Trie::new(width);
        trie.insert(&scratch, ROOT, &vertices)?;

        Ok(Dfa {
            vertices,
            trie,
            row: vec![0; width + 1],
            scratch,
            width,
            tau,
            max_memory,
            exhausted: false,
        })
    }

    /// Get the match descriptor of a vertex.
    #[inline]
    pub(crate) fn descriptor(&self, vertex: VertexID) -> MatchDescriptor {
        self.vertices[vertex].descriptor
    }

    /// The number of materialised vertices.
    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of allocated trie nodes.
    pub(crate) fn trie_node_count(&self) -> usize {
        self.trie.node_count()
    }

    /// The memory consumed by the vertices and the trie.
    pub(crate) fn byte_size(&self) -> usize {
        self.vertices.len() * (std::mem::size_of::<Vertex>() + path::encoded_len(self.width))
            + self.trie.byte_size()
    }

    /// The materialised vertices.
    #[allow(dead_code)]
    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Advance the DFA from `state` over the input class `base`.
    ///
    /// Returns the target vertex id. If the edge is resolved this is a lookup;
    /// otherwise the next row is computed, deduplicated through the trie and, memory
    /// permitting, materialised as a new vertex. When growth is refused the result is
    /// the cache slot, whose descriptor is overwritten with the computed row's.
    pub(crate) fn step(
        &mut self,
        state: VertexID,
        base: usize,
        keys: &[PositionKey],
    ) -> Result<VertexID> {
        debug_assert!(base < NBASES);
        debug_assert_eq!(keys.len(), self.width);

        let next = self.vertices[state].next[base];
        if next != UNRESOLVED {
            return Ok(VertexID::new(next));
        }

        // Restore the row of the source state. The cache slot has no code of its own;
        // its row is the one left in the buffer by the previous step.
        if state != CACHE {
            path::decode(self.vertices[state].code(), &mut self.scratch);
            path::restore_row(&self.scratch, &mut self.row);
        }

        let bit = 1u8 << base;
        let cap = self.tau as u32 + 1;
        let mut old = self.row[0];
        let mut prev = 0u32;
        self.row[0] = 0;
        let mut last_active = 1usize;
        for i in 1..=self.width {
            let miss = (bit & keys[i - 1] == 0) as u32;
            let current = self.row[i];
            let value = cap.min((old + miss).min(prev.min(current) + 1));
            self.row[i] = value;
            if value <= self.tau as u32 {
                last_active = i;
            }
            self.scratch[i - 1] = (value + 1 - prev) as u8;
            old = current;
            prev = value;
        }

        let descriptor = MatchDescriptor {
            distance: prev as u16,
            min_to_match: (self.width - last_active).min(u16::MAX as usize) as u16,
        };

        if let Some(found) = self.trie.search(&self.scratch, &self.vertices)? {
            if state != CACHE {
                self.vertices[state].next[base] = found.id();
            }
            return Ok(found);
        }

        if state == CACHE {
            self.vertices[CACHE].descriptor = descriptor;
            return Ok(CACHE);
        }

        match self.new_state(state, base, descriptor)? {
            Some(vertex) => Ok(vertex),
            None => {
                self.vertices[CACHE].descriptor = descriptor;
                Ok(CACHE)
            }
        }
    }

    /// Materialise the row in the scratch buffer as a new vertex reached from `from`
    /// over `base`. Returns `None` when the memory discipline refuses the allocation.
    fn new_state(
        &mut self,
        from: VertexID,
        base: usize,
        descriptor: MatchDescriptor,
    ) -> Result<Option<VertexID>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.max_memory > 0 && self.byte_size() > self.max_memory {
            self.degrade();
            return Ok(None);
        }
        if self.vertices.len() >= ABS_MAX_VERTICES {
            return Ok(None);
        }

        let mut code = vec![0u8; path::encoded_len(self.width)].into_boxed_slice();
        path::encode(&self.scratch, &mut code);
        let vertex = VertexID::new(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            code,
            descriptor,
            next: [UNRESOLVED; NBASES],
        });
        self.vertices[from].next[base] = vertex.id();

        match self.trie.insert(&self.scratch, vertex, &self.vertices) {
            Ok(()) => Ok(Some(vertex)),
            Err(err) if matches!(err.kind(), SeqscanErrorKind::MemoryExhausted) => {
                // Roll the vertex back and continue through the cache slot.
                self.vertices[from].next[base] = UNRESOLVED;
                self.vertices.pop();
                self.degrade();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Trim the store to its used size and refuse further growth.
    fn degrade(&mut self) {
        if !self.exhausted {
            trace!(
                "memory budget reached at {} vertices and {} trie nodes, continuing in cache mode",
                self.vertices.len(),
                self.trie.node_count()
            );
            self.vertices.shrink_to_fit();
            self.trie.shrink_to_fit();
            self.exhausted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::keys::compile_pattern;

    fn row_of(dfa: &Dfa, vertex: VertexID) -> Vec<u32> {
        let mut digits = vec![0u8; dfa.width];
        path::decode(dfa.vertices[vertex].code(), &mut digits);
        let mut row = vec![0u32; dfa.width + 1];
        path::restore_row(&digits, &mut row);
        row
    }

    #[test]
    fn test_initial_row() {
        let dfa = Dfa::new(6, 2, 0).unwrap();
        assert_eq!(row_of(&dfa, ROOT), vec![0, 1, 2, 3, 3, 3, 3]);
        let descriptor = dfa.descriptor(ROOT);
        assert_eq!(descriptor.distance, 3);
        assert_eq!(descriptor.min_to_match, 4);
        assert_eq!(dfa.vertex_count(), 2);
    }

    #[test]
    fn test_step_is_idempotent() {
        let keys = compile_pattern("ACGT").unwrap();
        let mut dfa = Dfa::new(keys.len(), 1, 0).unwrap();
        let first = dfa.step(ROOT, 0, &keys).unwrap();
        let second = dfa.step(ROOT, 0, &keys).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, ROOT);
        assert_ne!(first, CACHE);
    }

    #[test]
    fn test_step_distances() {
        let _ = env_logger::builder().is_test(true).try_init();
        let keys = compile_pattern("ACGT").unwrap();
        let mut dfa = Dfa::new(keys.len(), 1, 0).unwrap();
        // Consume "ACGT"; the last-column distance must reach 0.
        let mut state = ROOT;
        for base in [0usize, 1, 2, 3] {
            state = dfa.step(state, base, &keys).unwrap();
        }
        assert_eq!(dfa.descriptor(state).distance, 0);
        assert_eq!(dfa.descriptor(state).min_to_match, 0);
    }

    #[test]
    fn test_dedup_through_trie() {
        let keys = compile_pattern("AAAA").unwrap();
        let mut dfa = Dfa::new(keys.len(), 0, 0).unwrap();
        // Stepping over A from every reachable state revisits a bounded state set.
        let mut state = ROOT;
        let mut seen = Vec::new();
        for _ in 0..20 {
            state = dfa.step(state, 0, &keys).unwrap();
            if !seen.contains(&state) {
                seen.push(state);
            }
        }
        assert!(dfa.vertex_count() <= 2 + seen.len() + 1);
    }

    #[test]
    fn test_cache_mode_matches_unbounded() {
        let _ = env_logger::builder().is_test(true).try_init();
        let keys = compile_pattern("AC[AG]T").unwrap();
        let mut unbounded = Dfa::new(keys.len(), 1, 0).unwrap();
        // A budget this small is exhausted immediately.
        let mut bounded = Dfa::new(keys.len(), 1, 1).unwrap();
        let input = [0usize, 1, 0, 3, 0, 1, 2, 3, 3, 2, 1, 0, 4, 0, 1, 0];
        let mut s1 = ROOT;
        let mut s2 = ROOT;
        for &base in &input {
            s1 = unbounded.step(s1, base, &keys).unwrap();
            s2 = bounded.step(s2, base, &keys).unwrap();
            assert_eq!(
                unbounded.descriptor(s1).distance,
                bounded.descriptor(s2).distance
            );
            assert_eq!(
                unbounded.descriptor(s1).min_to_match,
                bounded.descriptor(s2).min_to_match
            );
        }
        assert!(bounded.vertex_count() <= unbounded.vertex_count());
    }
}
