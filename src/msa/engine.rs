use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::errors::SplitError;
use crate::matches::{Score, SegmentMatch};
use crate::sequence::SequenceSet;

use super::graph::AlignmentGraph;
use super::guide_tree::{self, GuideTree};
use super::progressive::progressive_alignment;
use super::triplet::{bounded_triplet_library_extension, triplet_library_extension};
use super::AlignmentEngine;

/// Alignment engine accepting matches heaviest first, as long as they are consistent with the
/// alignment columns built so far.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyConsistencyEngine;

impl GreedyConsistencyEngine {
    fn validate_matches(sequences: &SequenceSet, matches: &[SegmentMatch], scores: &[Score]) -> Result<(), SplitError> {
        if matches.len() != scores.len() {
            return Err(SplitError::AlignmentError(
                format!("got {} matches but {} scores", matches.len(), scores.len())));
        }

        let in_range = |seq_id: usize, pos: usize, length: usize| {
            sequences.get(seq_id).map_or(false, |r| pos + length <= r.token_count())
        };

        for m in matches {
            if !in_range(m.seq1, m.pos1, m.length) || !in_range(m.seq2, m.pos2, m.length) {
                return Err(SplitError::AlignmentError(format!("segment match {m:?} is out of range")));
            }

            if m.seq1 == m.seq2 || m.length == 0 {
                return Err(SplitError::AlignmentError(format!("invalid segment match {m:?}")));
            }
        }

        Ok(())
    }
}

impl AlignmentEngine for GreedyConsistencyEngine {
    fn build_graph(
        &self,
        sequences: &SequenceSet,
        matches: Vec<SegmentMatch>,
        scores: Vec<Score>,
    ) -> Result<AlignmentGraph, SplitError> {
        Self::validate_matches(sequences, &matches, &scores)?;

        // Every match boundary cuts its sequence
        let mut cuts: Vec<Vec<usize>> = sequences.iter()
            .map(|r| vec![0, r.token_count()])
            .collect();

        for m in &matches {
            cuts[m.seq1].extend([m.pos1, m.pos1 + m.length]);
            cuts[m.seq2].extend([m.pos2, m.pos2 + m.length]);
        }

        let mut graph = AlignmentGraph::new(sequences.token_counts());
        for (seq_id, seq_cuts) in cuts.iter_mut().enumerate() {
            seq_cuts.sort_unstable();
            seq_cuts.dedup();

            for pair in seq_cuts.windows(2) {
                if pair[1] > pair[0] {
                    graph.add_fragment(seq_id, pair[0], pair[1] - pair[0]);
                }
            }
        }

        for (m, score) in matches.iter().zip(scores) {
            for k in 0..m.length {
                // Both positions were cut, so the lookups always succeed
                let (Some(a), Some(b)) = (graph.find_fragment(m.seq1, m.pos1 + k), graph.find_fragment(m.seq2, m.pos2 + k)) else {
                    return Err(SplitError::AlignmentError(format!("no fragment for segment match {m:?}")));
                };

                graph.add_edge(a, b, score);
            }
        }

        debug!(fragments = graph.fragment_count(), edges = graph.edge_count(), "built alignment graph");

        Ok(graph)
    }

    fn neighbour_joining(&self, distance_matrix: DistanceMatrix) -> Result<GuideTree, SplitError> {
        guide_tree::neighbour_joining(distance_matrix)
    }

    fn triplet_extension(&self, graph: &mut AlignmentGraph) {
        triplet_library_extension(graph)
    }

    fn bounded_triplet_extension(&self, graph: &mut AlignmentGraph, guide_tree: &GuideTree, bound: usize) {
        bounded_triplet_library_extension(graph, guide_tree, bound)
    }

    fn progressive_align(&self, graph: AlignmentGraph, guide_tree: GuideTree) -> AlignmentGraph {
        progressive_alignment(&graph, &guide_tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{generate_matches, PLACEHOLDER_SCORE};
    use crate::sequence::record_from_values;

    #[test]
    fn test_build_graph_cuts_at_matches() {
        let set: SequenceSet = [
            record_from_values("a", &[1, 2, 3, 4, 5]),
            record_from_values("b", &[9, 3, 8]),
        ].into_iter().collect();

        let (matches, scores) = generate_matches(&set);
        let graph = GreedyConsistencyEngine.build_graph(&set, matches, scores).unwrap();

        let ranges = |s: usize| -> Vec<_> {
            graph.chain(s).iter().map(|f| graph.fragment(*f).token_range()).collect()
        };

        assert_eq!(ranges(0), vec![0..2, 2..3, 3..5]);
        assert_eq!(ranges(1), vec![0..1, 1..2, 2..3]);
        assert_eq!(graph.edge_count(), 1);

        let a = graph.find_fragment(0, 2).unwrap();
        let b = graph.find_fragment(1, 1).unwrap();
        assert_eq!(graph.edge_weight(a, b), Some(PLACEHOLDER_SCORE));
    }

    #[test]
    fn test_build_graph_rejects_bad_matches() {
        let set: SequenceSet = [
            record_from_values("a", &[1, 2]),
            record_from_values("b", &[3]),
        ].into_iter().collect();

        let out_of_range = vec![SegmentMatch::new(0, 0, 1, 4, 1)];
        assert!(GreedyConsistencyEngine.build_graph(&set, out_of_range, vec![10]).is_err());

        let self_match = vec![SegmentMatch::new(0, 0, 0, 1, 1)];
        assert!(GreedyConsistencyEngine.build_graph(&set, self_match, vec![10]).is_err());

        let missing_score = vec![SegmentMatch::new(0, 0, 1, 0, 1)];
        assert!(GreedyConsistencyEngine.build_graph(&set, missing_score, vec![]).is_err());
    }
}
