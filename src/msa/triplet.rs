//! Triplet library extension: an edge `a - c` is added or strengthened for every path
//! `a - b - c` through a fragment of a third sequence.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::graph::{AlignmentGraph, FragmentId};
use super::guide_tree::GuideTree;

/// Triplet extension over all sequence triplets.
pub fn triplet_library_extension(graph: &mut AlignmentGraph) {
    let group_of = vec![0usize; graph.num_sequences()];
    extend_within_groups(graph, &group_of);
}

/// Triplet extension restricted to sequences sharing a guide tree group of at most `bound`
/// sequences.
pub fn bounded_triplet_library_extension(graph: &mut AlignmentGraph, guide_tree: &GuideTree, bound: usize) {
    let mut group_of = vec![usize::MAX; graph.num_sequences()];
    for (group_ix, group) in guide_tree.groups(bound).into_iter().enumerate() {
        for seq_id in group {
            group_of[seq_id] = group_ix;
        }
    }

    extend_within_groups(graph, &group_of);
}

fn extend_within_groups(graph: &mut AlignmentGraph, group_of: &[usize]) {
    let adjacency = graph.neighbours();
    let seq_of = |f: FragmentId| graph.fragment(f).seq_id;

    let mut additions: FxHashMap<(FragmentId, FragmentId), i32> = FxHashMap::default();
    for (b, neighbours) in adjacency.iter().enumerate() {
        let group = group_of[seq_of(b)];

        for (i, &(a, w_ab)) in neighbours.iter().enumerate() {
            if group_of[seq_of(a)] != group {
                continue;
            }

            for &(c, w_bc) in &neighbours[i + 1..] {
                if seq_of(a) == seq_of(c) || group_of[seq_of(c)] != group {
                    continue;
                }

                *additions.entry((a.min(c), a.max(c))).or_default() += w_ab.min(w_bc);
            }
        }
    }

    debug!(edges_before = graph.edge_count(), triplets = additions.len(), "triplet library extension");

    let mut additions: Vec<_> = additions.into_iter().collect();
    additions.sort_unstable();

    for ((a, c), weight) in additions {
        graph.add_edge(a, c, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::msa::guide_tree::neighbour_joining;

    /// One token per sequence, with an edge path seq0 - seq1 - seq2 - seq3.
    fn path_graph() -> (AlignmentGraph, Vec<FragmentId>) {
        let mut graph = AlignmentGraph::new(vec![1; 4]);
        let f: Vec<_> = (0..4).map(|s| graph.add_fragment(s, 0, 1)).collect();

        graph.add_edge(f[0], f[1], 10);
        graph.add_edge(f[1], f[2], 4);
        graph.add_edge(f[2], f[3], 10);

        (graph, f)
    }

    #[test]
    fn test_exhaustive_extension() {
        let (mut graph, f) = path_graph();
        triplet_library_extension(&mut graph);

        assert_eq!(graph.edge_weight(f[0], f[2]), Some(4));
        assert_eq!(graph.edge_weight(f[1], f[3]), Some(4));
        assert_eq!(graph.edge_weight(f[0], f[1]), Some(10));

        // Extension only looks at paths of length two in the input graph
        assert_eq!(graph.edge_weight(f[0], f[3]), None);
    }

    #[test]
    fn test_existing_edge_strengthened() {
        let mut graph = AlignmentGraph::new(vec![1; 3]);
        let f: Vec<_> = (0..3).map(|s| graph.add_fragment(s, 0, 1)).collect();
        graph.add_edge(f[0], f[1], 10);
        graph.add_edge(f[1], f[2], 10);
        graph.add_edge(f[0], f[2], 10);

        triplet_library_extension(&mut graph);

        assert_eq!(graph.edge_weight(f[0], f[2]), Some(20));
        assert_eq!(graph.edge_weight(f[0], f[1]), Some(20));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_no_triplets_within_one_sequence() {
        let mut graph = AlignmentGraph::new(vec![2, 1]);
        let a0 = graph.add_fragment(0, 0, 1);
        let a1 = graph.add_fragment(0, 1, 1);
        let b = graph.add_fragment(1, 0, 1);
        graph.add_edge(a0, b, 10);
        graph.add_edge(a1, b, 10);

        triplet_library_extension(&mut graph);

        assert_eq!(graph.edge_weight(a0, a1), None);
    }

    #[test]
    fn test_bounded_extension() {
        let (mut graph, f) = path_graph();

        // Sequences {0, 1} and {2, 3} form the groups
        let tree = neighbour_joining(DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 8.0, 8.0],
            vec![1.0, 0.0, 8.0, 8.0],
            vec![8.0, 8.0, 0.0, 1.0],
            vec![8.0, 8.0, 1.0, 0.0],
        ]).unwrap()).unwrap();

        bounded_triplet_library_extension(&mut graph, &tree, 2);
        assert_eq!(graph.edge_weight(f[0], f[2]), None);
        assert_eq!(graph.edge_weight(f[1], f[3]), None);

        let (mut graph, f) = path_graph();
        bounded_triplet_library_extension(&mut graph, &tree, 4);
        assert_eq!(graph.edge_weight(f[0], f[2]), Some(4));
    }
}
