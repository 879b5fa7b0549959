pub mod graph;
pub mod guide_tree;
pub mod triplet;
pub mod progressive;
pub mod engine;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod mock;

use crate::distance::DistanceMatrix;
use crate::errors::SplitError;
use crate::matches::{Score, SegmentMatch};
use crate::sequence::SequenceSet;

use graph::AlignmentGraph;
use guide_tree::GuideTree;

pub use engine::GreedyConsistencyEngine;
pub use pipeline::{align, TripletExtension};

/// The multiple sequence alignment operations the pipeline relies on.
pub trait AlignmentEngine {
    /// Build the initial alignment graph from segment matches and their scores.
    fn build_graph(
        &self,
        sequences: &SequenceSet,
        matches: Vec<SegmentMatch>,
        scores: Vec<Score>,
    ) -> Result<AlignmentGraph, SplitError>;

    fn neighbour_joining(&self, distance_matrix: DistanceMatrix) -> Result<GuideTree, SplitError>;

    fn triplet_extension(&self, graph: &mut AlignmentGraph);

    fn bounded_triplet_extension(&self, graph: &mut AlignmentGraph, guide_tree: &GuideTree, bound: usize);

    fn progressive_align(&self, graph: AlignmentGraph, guide_tree: GuideTree) -> AlignmentGraph;
}
