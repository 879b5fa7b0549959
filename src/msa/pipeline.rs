use std::time::Instant;

use tracing::info_span;

use crate::diagnostics::{Diagnostics, PipelineStep};
use crate::distance::DistanceMatrix;
use crate::errors::SplitError;
use crate::matches::generate_matches;
use crate::sequence::SequenceSet;

use super::graph::AlignmentGraph;
use super::AlignmentEngine;

/// Sequence count above which an alignment counts as deep
const DEEP_ALIGNMENT_SEQUENCES: usize = 50;

/// Which flavour of triplet library extension to run for a given number of sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripletExtension {
    Exhaustive,
    Bounded { bound: usize },
}

impl TripletExtension {
    pub fn select(num_sequences: usize) -> Self {
        let is_deep_alignment = num_sequences > DEEP_ALIGNMENT_SEQUENCES;
        let threshold = if is_deep_alignment { 30 } else { 10 };

        if num_sequences < threshold {
            Self::Exhaustive
        } else {
            Self::Bounded { bound: threshold / 2 }
        }
    }
}

fn report(diagnostics: Option<&dyn Diagnostics>, step: PipelineStep, start: Instant, vertices: Option<usize>) {
    if let Some(sink) = diagnostics {
        sink.step(step, start.elapsed(), vertices);
    }
}

/// Build the multiple alignment graph of the given sequences.
///
/// The distance matrix drives the guide tree and is consumed by it.
pub fn align<E>(
    engine: &E,
    sequences: &SequenceSet,
    distance_matrix: DistanceMatrix,
    diagnostics: Option<&dyn Diagnostics>,
) -> Result<AlignmentGraph, SplitError>
where
    E: AlignmentEngine + ?Sized,
{
    let span = info_span!("align", sequences = sequences.len());
    let _enter = span.enter();

    if distance_matrix.size() != sequences.len() {
        return Err(SplitError::AlignmentError(format!(
            "distance matrix has size {} but there are {} sequences", distance_matrix.size(), sequences.len())));
    }

    let start = Instant::now();
    let (matches, scores) = generate_matches(sequences);
    report(diagnostics, PipelineStep::SegmentMatchGeneration, start, None);

    let start = Instant::now();
    let mut graph = engine.build_graph(sequences, matches, scores)?;
    report(diagnostics, PipelineStep::BuildAlignmentGraph, start, Some(graph.fragment_count()));

    let start = Instant::now();
    let guide_tree = engine.neighbour_joining(distance_matrix)?;
    report(diagnostics, PipelineStep::BuildGuideTree, start, None);

    let start = Instant::now();
    match TripletExtension::select(sequences.len()) {
        TripletExtension::Exhaustive => engine.triplet_extension(&mut graph),
        TripletExtension::Bounded { bound } => engine.bounded_triplet_extension(&mut graph, &guide_tree, bound),
    }
    report(diagnostics, PipelineStep::TripletExtension, start, None);

    let start = Instant::now();
    let aligned = engine.progressive_align(graph, guide_tree);
    report(diagnostics, PipelineStep::ProgressiveAlignment, start, Some(aligned.fragment_count()));

    Ok(aligned)
}
