use std::ops::Range;

use rustc_hash::FxHashMap;

pub type FragmentId = usize;

/// A contiguous token range of one sequence; a vertex of the alignment graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub seq_id: usize,
    pub begin: usize,
    pub length: usize,
}

impl Fragment {
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.begin + self.length
    }

    #[inline]
    pub fn token_range(&self) -> Range<usize> {
        self.begin..self.end()
    }
}

/// An undirected aligned-with edge between two fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedEdge {
    pub source: FragmentId,
    pub target: FragmentId,
    pub weight: i32,
}

/// Alignment graph over the minimizer token chains of a sequence set.
///
/// Every fragment belongs to one sequence; the fragments of a sequence never overlap and are
/// kept sorted by position, which gives the implicit sequence-order edges. Explicit edges
/// connect fragments deemed alignable.
#[derive(Debug, Clone, Default)]
pub struct AlignmentGraph {
    token_counts: Vec<usize>,
    fragments: Vec<Fragment>,
    chains: Vec<Vec<FragmentId>>,
    edges: Vec<AlignedEdge>,
    edge_index: FxHashMap<(FragmentId, FragmentId), usize>,
}

impl AlignmentGraph {
    pub fn new(token_counts: Vec<usize>) -> Self {
        let chains = vec![Vec::new(); token_counts.len()];

        AlignmentGraph {
            token_counts,
            chains,
            ..Default::default()
        }
    }

    #[inline]
    pub fn num_sequences(&self) -> usize {
        self.token_counts.len()
    }

    #[inline]
    pub fn token_count(&self, seq_id: usize) -> usize {
        self.token_counts[seq_id]
    }

    pub fn token_counts(&self) -> &[usize] {
        &self.token_counts
    }

    #[inline]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn fragment(&self, id: FragmentId) -> &Fragment {
        &self.fragments[id]
    }

    pub fn fragments(&self) -> impl Iterator<Item=(FragmentId, &Fragment)> + '_ {
        self.fragments.iter().enumerate()
    }

    pub fn edges(&self) -> impl Iterator<Item=&AlignedEdge> + '_ {
        self.edges.iter()
    }

    /// Fragments of a sequence, ordered by position
    pub fn chain(&self, seq_id: usize) -> &[FragmentId] {
        &self.chains[seq_id]
    }

    pub fn add_fragment(&mut self, seq_id: usize, begin: usize, length: usize) -> FragmentId {
        assert!(length > 0, "empty fragment");
        assert!(begin + length <= self.token_counts[seq_id], "fragment exceeds sequence {seq_id}");

        let id = self.fragments.len();
        let chain = &self.chains[seq_id];
        let insert_at = chain.partition_point(|f| self.fragments[*f].begin < begin);

        let overlaps_prev = insert_at > 0 && self.fragments[chain[insert_at - 1]].end() > begin;
        let overlaps_next = insert_at < chain.len() && self.fragments[chain[insert_at]].begin < begin + length;
        assert!(!overlaps_prev && !overlaps_next, "fragment [{begin}, {}) overlaps in sequence {seq_id}", begin + length);

        self.fragments.push(Fragment { seq_id, begin, length });
        self.chains[seq_id].insert(insert_at, id);

        id
    }

    /// Add an aligned-with edge, or add to the weight of an existing one.
    pub fn add_edge(&mut self, a: FragmentId, b: FragmentId, weight: i32) {
        assert_ne!(a, b, "self-edge on fragment {a}");
        let key = (a.min(b), a.max(b));

        if let Some(ix) = self.edge_index.get(&key) {
            self.edges[*ix].weight += weight;
        } else {
            self.edge_index.insert(key, self.edges.len());
            self.edges.push(AlignedEdge { source: a, target: b, weight });
        }
    }

    pub fn edge_weight(&self, a: FragmentId, b: FragmentId) -> Option<i32> {
        self.edge_index.get(&(a.min(b), a.max(b)))
            .map(|ix| self.edges[*ix].weight)
    }

    /// The fragment covering the given token position, if any.
    pub fn find_fragment(&self, seq_id: usize, pos: usize) -> Option<FragmentId> {
        let chain = &self.chains[seq_id];
        let ix = chain.partition_point(|f| self.fragments[*f].begin <= pos);

        if ix == 0 {
            return None;
        }

        let candidate = chain[ix - 1];
        (self.fragments[candidate].end() > pos).then_some(candidate)
    }

    /// Adjacency lists over the aligned-with edges, with edge weights
    pub fn neighbours(&self) -> Vec<Vec<(FragmentId, i32)>> {
        let mut adjacency = vec![Vec::new(); self.fragments.len()];
        for edge in &self.edges {
            adjacency[edge.source].push((edge.target, edge.weight));
            adjacency[edge.target].push((edge.source, edge.weight));
        }

        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_chains() {
        let mut graph = AlignmentGraph::new(vec![10, 4]);
        let f1 = graph.add_fragment(0, 5, 5);
        let f0 = graph.add_fragment(0, 0, 3);
        let f2 = graph.add_fragment(1, 0, 4);

        assert_eq!(graph.chain(0), &[f0, f1]);
        assert_eq!(graph.chain(1), &[f2]);

        assert_eq!(graph.find_fragment(0, 0), Some(f0));
        assert_eq!(graph.find_fragment(0, 2), Some(f0));
        assert_eq!(graph.find_fragment(0, 3), None);
        assert_eq!(graph.find_fragment(0, 4), None);
        assert_eq!(graph.find_fragment(0, 9), Some(f1));
        assert_eq!(graph.find_fragment(1, 3), Some(f2));
    }

    #[test]
    #[should_panic]
    fn test_overlapping_fragment() {
        let mut graph = AlignmentGraph::new(vec![10]);
        graph.add_fragment(0, 2, 4);
        graph.add_fragment(0, 5, 2);
    }

    #[test]
    fn test_edge_weights_accumulate() {
        let mut graph = AlignmentGraph::new(vec![2, 2]);
        let a = graph.add_fragment(0, 0, 1);
        let b = graph.add_fragment(1, 0, 1);

        graph.add_edge(a, b, 10);
        graph.add_edge(b, a, 5);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(a, b), Some(15));
        assert_eq!(graph.neighbours()[b], vec![(a, 15)]);
    }
}
