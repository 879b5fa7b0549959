//! Progressive alignment along the guide tree.
//!
//! Fragments are grouped into alignment columns. Walking the guide tree bottom-up, the edges
//! between the two subtrees of each internal node are accepted heaviest first, as long as a
//! column keeps at most one fragment per sequence and the columns stay in a consistent
//! (acyclic) order. Consecutive columns spanning the same sequences are then compacted into
//! blocks, and the output graph holds one fragment per block and sequence.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::graph::{AlignedEdge, AlignmentGraph, FragmentId};
use super::guide_tree::{GuideTree, TreeNode};

/// Union-find over fragment ids
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        DisjointSets { parent: (0..size).collect() }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }

        x
    }

    /// Attach the set of `child` below `root`. Both must be set representatives.
    fn attach(&mut self, child: usize, root: usize) {
        self.parent[child] = root;
    }
}

struct ColumnState<'a> {
    graph: &'a AlignmentGraph,
    chain_pos: Vec<usize>,
    columns: DisjointSets,
    members: Vec<Vec<FragmentId>>,
    weights: Vec<i64>,
}

impl<'a> ColumnState<'a> {
    fn new(graph: &'a AlignmentGraph) -> Self {
        let mut chain_pos = vec![0; graph.fragment_count()];
        for seq_id in 0..graph.num_sequences() {
            for (pos, f) in graph.chain(seq_id).iter().enumerate() {
                chain_pos[*f] = pos;
            }
        }

        ColumnState {
            graph,
            chain_pos,
            columns: DisjointSets::new(graph.fragment_count()),
            members: (0..graph.fragment_count()).map(|f| vec![f]).collect(),
            weights: vec![0; graph.fragment_count()],
        }
    }

    /// The fragment following `f` in its sequence
    fn next_fragment(&self, f: FragmentId) -> Option<FragmentId> {
        let chain = self.graph.chain(self.graph.fragment(f).seq_id);
        chain.get(self.chain_pos[f] + 1).copied()
    }

    fn successor_columns(&mut self, column: usize) -> Vec<usize> {
        let next: Vec<FragmentId> = self.members[column].iter()
            .filter_map(|f| self.next_fragment(*f))
            .collect();

        next.into_iter()
            .map(|f| self.columns.find(f))
            .collect()
    }

    fn reaches(&mut self, from: usize, to: usize) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![from];

        while let Some(column) = stack.pop() {
            for succ in self.successor_columns(column) {
                if succ == to {
                    return true;
                }

                if visited.insert(succ) {
                    stack.push(succ);
                }
            }
        }

        false
    }

    fn shares_sequence(&self, c1: usize, c2: usize) -> bool {
        let seqs: FxHashSet<usize> = self.members[c1].iter()
            .map(|f| self.graph.fragment(*f).seq_id)
            .collect();

        self.members[c2].iter()
            .any(|f| seqs.contains(&self.graph.fragment(*f).seq_id))
    }

    /// Merge the columns of both edge endpoints if that keeps the alignment consistent.
    fn try_accept(&mut self, edge: &AlignedEdge) -> bool {
        let c1 = self.columns.find(edge.source);
        let c2 = self.columns.find(edge.target);

        if c1 == c2 {
            self.weights[c1] += edge.weight as i64;
            return true;
        }

        if self.shares_sequence(c1, c2) || self.reaches(c1, c2) || self.reaches(c2, c1) {
            return false;
        }

        let (root, child) = if self.members[c1].len() >= self.members[c2].len() { (c1, c2) } else { (c2, c1) };
        self.columns.attach(child, root);

        let moved = std::mem::take(&mut self.members[child]);
        self.members[root].extend(moved);
        self.weights[root] += self.weights[child] + edge.weight as i64;

        true
    }

    fn align_subtrees(&mut self, left: &[usize], right: &[usize]) {
        let mut side = vec![0u8; self.graph.num_sequences()];
        left.iter().for_each(|s| side[*s] = 1);
        right.iter().for_each(|s| side[*s] = 2);

        let mut candidates: Vec<AlignedEdge> = self.graph.edges()
            .filter(|e| {
                let s1 = side[self.graph.fragment(e.source).seq_id];
                let s2 = side[self.graph.fragment(e.target).seq_id];
                s1 != 0 && s2 != 0 && s1 != s2
            })
            .copied()
            .collect();

        candidates.sort_by_key(|e| (std::cmp::Reverse(e.weight), e.source.min(e.target), e.source.max(e.target)));

        let mut accepted = 0usize;
        for edge in &candidates {
            if self.try_accept(edge) {
                accepted += 1;
            }
        }

        trace!(left = left.len(), right = right.len(), candidates = candidates.len(), accepted, "aligned subtrees");
    }

    /// Group consecutive columns that cover the same sequences with adjacent fragments.
    fn compact_blocks(&mut self) -> DisjointSets {
        let mut blocks = DisjointSets::new(self.graph.fragment_count());

        for f in 0..self.graph.fragment_count() {
            let column = self.columns.find(f);
            if column != f {
                continue;
            }

            let members = self.members[column].clone();
            let mut target = None;
            let mut compactable = true;
            for m in &members {
                let next = self.next_fragment(*m)
                    .filter(|n| self.graph.fragment(*n).begin == self.graph.fragment(*m).end());

                let Some(next) = next else {
                    compactable = false;
                    break;
                };

                let next_column = self.columns.find(next);
                if target.map_or(false, |t| t != next_column) {
                    compactable = false;
                    break;
                }

                target = Some(next_column);
            }

            if let (true, Some(next_column)) = (compactable, target) {
                if self.members[next_column].len() == members.len() {
                    let b1 = blocks.find(column);
                    let b2 = blocks.find(next_column);
                    if b1 != b2 {
                        blocks.attach(b2, b1);
                    }
                }
            }
        }

        blocks
    }

    fn into_graph(mut self) -> AlignmentGraph {
        let mut blocks = self.compact_blocks();
        let mut output = AlignmentGraph::new(self.graph.token_counts().to_vec());

        let mut block_order: Vec<usize> = Vec::new();
        let mut block_fragments: FxHashMap<usize, Vec<FragmentId>> = FxHashMap::default();
        let mut block_weights: FxHashMap<usize, i64> = FxHashMap::default();

        for seq_id in 0..self.graph.num_sequences() {
            let chain = self.graph.chain(seq_id);
            let mut i = 0;

            while i < chain.len() {
                let column = self.columns.find(chain[i]);
                let block = blocks.find(column);
                let begin = self.graph.fragment(chain[i]).begin;

                let mut j = i;
                *block_weights.entry(block).or_default() += self.weights[column];
                while j + 1 < chain.len() {
                    let next_column = self.columns.find(chain[j + 1]);
                    if blocks.find(next_column) != block {
                        break;
                    }

                    *block_weights.entry(block).or_default() += self.weights[next_column];
                    j += 1;
                }

                let end = self.graph.fragment(chain[j]).end();
                let new_fragment = output.add_fragment(seq_id, begin, end - begin);

                block_fragments.entry(block)
                    .or_insert_with(|| {
                        block_order.push(block);
                        Vec::new()
                    })
                    .push(new_fragment);

                i = j + 1;
            }
        }

        for block in block_order {
            let fragments = &block_fragments[&block];

            // Each member sequence adds the column weights once
            let weight = (block_weights[&block] / fragments.len() as i64).max(1) as i32;
            for pair in fragments.windows(2) {
                output.add_edge(pair[0], pair[1], weight);
            }
        }

        output
    }
}

/// Progressively align the graph along the guide tree, producing a consistent alignment graph.
pub fn progressive_alignment(graph: &AlignmentGraph, guide_tree: &GuideTree) -> AlignmentGraph {
    let mut state = ColumnState::new(graph);

    for ix in guide_tree.postorder() {
        if let TreeNode::Internal { left, right } = guide_tree.node(ix) {
            let left_leaves = guide_tree.leaves(left);
            let right_leaves = guide_tree.leaves(right);

            state.align_subtrees(&left_leaves, &right_leaves);
        }
    }

    let output = state.into_graph();
    debug!(fragments_in = graph.fragment_count(), fragments_out = output.fragment_count(),
        edges_out = output.edge_count(), "progressive alignment");

    output
}
