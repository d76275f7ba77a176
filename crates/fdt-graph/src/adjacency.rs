//! Compressed Sparse Row predecessor lists.
//!
//! Given a `NodeIdx n`, the sources of its incoming edges occupy
//!
//! ```text
//! sources[ offsets[n] .. offsets[n+1] ]
//! ```
//!
//! in edge-insertion order.  Parallel edges appear once per edge, so a
//! predecessor linked twice contributes twice to a sum aggregation.

use fdt_core::NodeIdx;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
    /// CSR row pointer.  Length = `node_count + 1`.
    offsets: Vec<u32>,
    sources: Vec<NodeIdx>,
}

impl Adjacency {
    /// Build from `(source, target)` pairs over `node_count` nodes.
    ///
    /// Pairs referencing indices `>= node_count` are skipped.
    pub fn from_edge_list(node_count: usize, edges: &[(NodeIdx, NodeIdx)]) -> Self {
        let in_range = |&&(s, t): &&(NodeIdx, NodeIdx)| s.index() < node_count && t.index() < node_count;

        let mut offsets = vec![0u32; node_count + 1];
        for &(_, t) in edges.iter().filter(in_range) {
            offsets[t.index() + 1] += 1;
        }
        for i in 1..=node_count {
            offsets[i] += offsets[i - 1];
        }

        // Counting placement keeps insertion order within each row.
        let mut cursor: Vec<u32> = offsets[..node_count].to_vec();
        let mut sources = vec![NodeIdx::INVALID; offsets[node_count] as usize];
        for &(s, t) in edges.iter().filter(in_range) {
            let slot = &mut cursor[t.index()];
            sources[*slot as usize] = s;
            *slot += 1;
        }

        Self { offsets, sources }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn edge_count(&self) -> usize {
        self.sources.len()
    }

    /// Direct predecessors of `node`.  Empty for unknown indices.
    #[inline]
    pub fn predecessors(&self, node: NodeIdx) -> &[NodeIdx] {
        let i = node.index();
        if i >= self.node_count() {
            return &[];
        }
        let start = self.offsets[i] as usize;
        let end   = self.offsets[i + 1] as usize;
        &self.sources[start..end]
    }

    #[inline]
    pub fn in_degree(&self, node: NodeIdx) -> usize {
        self.predecessors(node).len()
    }
}
