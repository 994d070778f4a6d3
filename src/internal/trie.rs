//! The row deduplication trie.
//!
//! The trie answers "is this alignment row already a DFA vertex, and if so which one?"
//! in `O(w)` time. It is a 3-ary trie keyed by the ternary path of a row; a leaf child
//! holds a vertex id directly instead of a child node, so a path that shares no prefix
//! with another costs a single node. When a later insertion runs into such an
//! intermediate leaf, the leaf is pushed down one level per shared digit until the two
//! paths diverge.

use crate::errors::{Result, SeqscanErrorKind};

use super::dfa::Vertex;
use super::ids::{NodeID, VertexID};
use super::path;

const INITIAL_TRIE_SIZE: usize = 256;
const TRIE_CHILDREN: usize = 3;
// Node ids are u32 with one value reserved for the root.
const ABS_MAX_NODES: usize = 0xFFFF_FFFE;

/// One trie node: three children, one per ternary digit, plus a per-digit leaf flag.
/// A leaf child holds a vertex id, a non-leaf child holds a child node index.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    flags: u8,
    child: [u32; TRIE_CHILDREN],
}

impl TrieNode {
    #[inline]
    fn is_leaf(&self, digit: usize) -> bool {
        self.flags & (1 << digit) != 0
    }
}

/// The deduplication trie of one DFA.
///
/// The trie contains exactly the vertex ids of the materialised non-cache vertices as
/// leaves, one path per row.
#[derive(Debug)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
    height: usize,
}

impl Trie {
    /// Create a trie of the given height (the pattern length).
    pub(crate) fn new(height: usize) -> Self {
        let mut nodes = Vec::with_capacity(INITIAL_TRIE_SIZE);
        nodes.push(TrieNode::default());
        Trie {
            nodes,
            height: height.max(1),
        }
    }

    /// The number of allocated nodes.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The memory consumed by the allocated nodes.
    pub(crate) fn byte_size(&self) -> usize {
        self.nodes.len() * std::mem::size_of::<TrieNode>()
    }

    /// Release unused capacity once growth has been refused.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Walk the trie along `path` and return the vertex id stored at its leaf.
    ///
    /// On encountering a leaf flag the packed code of the referenced vertex is compared
    /// against `path`; only an exact row match counts as found.
    pub(crate) fn search(&self, path: &[u8], vertices: &[Vertex]) -> Result<Option<VertexID>> {
        let mut id = 0usize;
        for &digit in path {
            let digit = digit as usize;
            if digit >= TRIE_CHILDREN {
                return Err(SeqscanErrorKind::InternalTrieFault.into());
            }
            let node = &self.nodes[id];
            if node.is_leaf(digit) {
                let vertex = VertexID::new(node.child[digit]);
                if path::matches(path, vertices[vertex].code()) {
                    return Ok(Some(vertex));
                }
                return Ok(None);
            }
            id = node.child[digit] as usize;
            if id == 0 {
                return Ok(None);
            }
        }
        Ok(None)
    }

    /// Insert `path` into the trie with `vertex` as its leaf value.
    ///
    /// An intermediate leaf on the way down is pushed towards its divergence point, one
    /// level per shared digit. If the node limit is hit during the pushdown the
    /// operation is reversed and `MemoryExhausted` is reported; the trie stays intact.
    pub(crate) fn insert(
        &mut self,
        path: &[u8],
        vertex: VertexID,
        vertices: &[Vertex],
    ) -> Result<()> {
        if path.iter().any(|&digit| digit as usize >= TRIE_CHILDREN) {
            return Err(SeqscanErrorKind::InternalTrieFault.into());
        }

        let mut id = 0usize;
        let mut i = 0usize;
        while i < self.height - 1 {
            let digit = path[i] as usize;
            if self.nodes[id].is_leaf(digit) {
                self.push_down(id, i, path, vertices)?;
            }
            let next = self.nodes[id].child[digit] as usize;
            if next == 0 {
                break;
            }
            id = next;
            i += 1;
        }

        self.nodes[id].child[path[i] as usize] = vertex.id();
        self.nodes[id].flags |= 1 << path[i];
        Ok(())
    }

    /// Move the intermediate leaf of `nodes[id]` at digit `path[i]` downwards until its
    /// path diverges from `path`, then re-attach it as a leaf of the split node.
    fn push_down(&mut self, id: usize, i: usize, path: &[u8], vertices: &[Vertex]) -> Result<()> {
        let digit = path[i] as usize;
        let occupant = self.nodes[id].child[digit];
        let mut other = vec![0u8; self.height];
        path::decode(vertices[occupant as usize].code(), &mut other);

        self.nodes[id].flags &= !(1 << digit);
        let checkpoint = self.nodes.len();
        let mut aux = id;
        let mut j = i;
        // The occupant shares at least the digit at level i, and the two paths are
        // known to differ, so the loop ends before the trie height.
        while path[j] == other[j] {
            if self.nodes.len() >= ABS_MAX_NODES {
                // Reverse the movement and drop the partial chain.
                self.nodes.truncate(checkpoint);
                self.nodes[id].flags |= 1 << digit;
                self.nodes[id].child[digit] = occupant;
                return Err(SeqscanErrorKind::MemoryExhausted.into());
            }
            let new_id = self.new_node();
            self.nodes[aux].child[other[j] as usize] = new_id.id();
            aux = new_id.as_usize();
            j += 1;
        }
        self.nodes[aux].child[other[j] as usize] = occupant;
        self.nodes[aux].flags |= 1 << other[j];
        Ok(())
    }

    fn new_node(&mut self) -> NodeID {
        let id = NodeID::new(self.nodes.len() as u32);
        self.nodes.push(TrieNode::default());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::dfa::Vertex;

    // Build a vertex whose code encodes the given path.
    fn vertex_for(path: &[u8]) -> Vertex {
        let mut code = vec![0u8; path::encoded_len(path.len())];
        path::encode(path, &mut code);
        Vertex::with_code(code.into_boxed_slice())
    }

    #[test]
    fn test_insert_and_search() {
        let paths: &[&[u8]] = &[
            &[2, 2, 1, 1, 1, 1],
            &[2, 2, 1, 1, 1, 0],
            &[2, 1, 1, 2, 1, 1],
            &[0, 0, 0, 0, 0, 0],
        ];
        let vertices: Vec<Vertex> = paths.iter().map(|p| vertex_for(p)).collect();
        let mut trie = Trie::new(6);
        for (i, p) in paths.iter().enumerate() {
            assert_eq!(trie.search(p, &vertices).unwrap(), None);
            trie.insert(p, VertexID::new(i as u32), &vertices).unwrap();
        }
        for (i, p) in paths.iter().enumerate() {
            assert_eq!(
                trie.search(p, &vertices).unwrap(),
                Some(VertexID::new(i as u32)),
                "path {i} not found after insert"
            );
        }
        // A path absent from the trie stays absent.
        assert_eq!(trie.search(&[2, 2, 2, 1, 1, 1], &vertices).unwrap(), None);
    }

    #[test]
    fn test_pushdown_shared_prefix() {
        // Two paths that only diverge at the last digit force a full pushdown.
        let paths: &[&[u8]] = &[&[1, 1, 1, 1, 1, 1], &[1, 1, 1, 1, 1, 2]];
        let vertices: Vec<Vertex> = paths.iter().map(|p| vertex_for(p)).collect();
        let mut trie = Trie::new(6);
        trie.insert(paths[0], VertexID::new(0), &vertices).unwrap();
        assert_eq!(trie.node_count(), 1);
        trie.insert(paths[1], VertexID::new(1), &vertices).unwrap();
        assert!(trie.node_count() > 1);
        assert_eq!(
            trie.search(paths[0], &vertices).unwrap(),
            Some(VertexID::new(0))
        );
        assert_eq!(
            trie.search(paths[1], &vertices).unwrap(),
            Some(VertexID::new(1))
        );
    }

    #[test]
    fn test_illegal_digit() {
        let vertices: Vec<Vertex> = Vec::new();
        let trie = Trie::new(4);
        assert!(trie.search(&[3, 0, 0, 0], &vertices).is_err());
    }
}
