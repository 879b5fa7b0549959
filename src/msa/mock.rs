//! Hand-made sequence sets and alignment graphs for unit tests

use crate::sequence::{Minimizer, SequenceRecord, SequenceSet};

use super::graph::{AlignedEdge, AlignmentGraph};

/// Sequences where token `i` sits at position `i`, with raw length equal to the token count.
/// Minimizer values are unique across all sequences.
pub(crate) fn identity_sequences(token_counts: &[usize]) -> SequenceSet {
    token_counts.iter()
        .enumerate()
        .map(|(seq_id, count)| {
            let minimizers = (0..*count)
                .map(|pos| Minimizer::new((seq_id * 1000 + pos) as u64, pos as u32))
                .collect();

            SequenceRecord::new(format!("seq{seq_id}"), "mock.fa", *count as u32, minimizers)
        })
        .collect()
}

/// Sequences with the given raw length and token positions
pub(crate) fn sequences_with_positions(sequences: &[(u32, &[u32])]) -> SequenceSet {
    sequences.iter()
        .enumerate()
        .map(|(seq_id, (length, positions))| {
            let minimizers = positions.iter()
                .enumerate()
                .map(|(i, pos)| Minimizer::new((seq_id * 1000 + i) as u64, *pos))
                .collect();

            SequenceRecord::new(format!("seq{seq_id}"), "mock.fa", *length, minimizers)
        })
        .collect()
}

/// Alignment graph from `(seq_id, begin, length)` fragments and edges given as pairs of
/// `(seq_id, token position)`, each edge connecting the fragments covering those positions.
pub(crate) fn alignment(
    token_counts: &[usize],
    fragments: &[(usize, usize, usize)],
    edges: &[((usize, usize), (usize, usize))],
) -> AlignmentGraph {
    let mut graph = AlignmentGraph::new(token_counts.to_vec());
    for (seq_id, begin, length) in fragments {
        graph.add_fragment(*seq_id, *begin, *length);
    }

    for ((s1, p1), (s2, p2)) in edges {
        let a = graph.find_fragment(*s1, *p1).unwrap();
        let b = graph.find_fragment(*s2, *p2).unwrap();
        graph.add_edge(a, b, 1);
    }

    graph
}

/// Same fragments, edges added in the given order
pub(crate) fn with_edge_order(graph: &AlignmentGraph, edges: &[&AlignedEdge]) -> AlignmentGraph {
    let mut reordered = AlignmentGraph::new(graph.token_counts().to_vec());
    for (_, fragment) in graph.fragments() {
        reordered.add_fragment(fragment.seq_id, fragment.begin, fragment.length);
    }

    for edge in edges {
        reordered.add_edge(edge.source, edge.target, edge.weight);
    }

    reordered
}

/// Three sequences of 10, 8 and 12 tokens with two aligned regions:
///
/// * X: a[2, 5), b[0, 3) and c[4, 7), pairwise connected
/// * Y: a[6, 8) and c[9, 11)
pub(crate) fn three_sequence_alignment() -> (SequenceSet, AlignmentGraph) {
    let sequences = identity_sequences(&[10, 8, 12]);
    let graph = alignment(
        &[10, 8, 12],
        &[
            (0, 0, 2), (0, 2, 3), (0, 5, 1), (0, 6, 2), (0, 8, 2),
            (1, 0, 3), (1, 3, 5),
            (2, 0, 4), (2, 4, 3), (2, 7, 2), (2, 9, 2), (2, 11, 1),
        ],
        &[
            ((0, 2), (1, 0)),
            ((1, 0), (2, 4)),
            ((0, 2), (2, 4)),
            ((0, 6), (2, 9)),
        ],
    );

    (sequences, graph)
}
