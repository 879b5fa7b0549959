use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::info;

/// The timed stages of the alignment pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    SegmentMatchGeneration,
    BuildAlignmentGraph,
    BuildGuideTree,
    TripletExtension,
    ProgressiveAlignment,
}

impl Display for PipelineStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SegmentMatchGeneration => "Segment-match generation",
            Self::BuildAlignmentGraph => "Build alignment graph",
            Self::BuildGuideTree => "Build guide tree",
            Self::TripletExtension => "Triplet extension",
            Self::ProgressiveAlignment => "Progressive alignment",
        };

        f.write_str(label)
    }
}

/// Receives timing and size information from the pipeline phases.
///
/// Implementations must not influence the computation; they only observe it.
pub trait Diagnostics {
    fn step(&self, step: PipelineStep, elapsed: Duration, vertices: Option<usize>);

    fn graph_counts(&self, stage: &str, nodes: usize, arcs: usize);
}

/// Diagnostics sink writing to the `tracing` subscriber at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn step(&self, step: PipelineStep, elapsed: Duration, vertices: Option<usize>) {
        match vertices {
            Some(n) => info!("{:<30}{:>10.3} s ({n} vertices)", format!("{step}:"), elapsed.as_secs_f64()),
            None => info!("{:<30}{:>10.3} s", format!("{step}:"), elapsed.as_secs_f64()),
        }
    }

    fn graph_counts(&self, stage: &str, nodes: usize, arcs: usize) {
        info!("{stage}: {nodes} nodes, {arcs} arcs");
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;

    use super::*;

    /// Keeps every reported event for inspection in tests
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDiagnostics {
        pub steps: RefCell<Vec<(PipelineStep, Option<usize>)>>,
        pub counts: RefCell<Vec<(String, usize, usize)>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn step(&self, step: PipelineStep, _: Duration, vertices: Option<usize>) {
            self.steps.borrow_mut().push((step, vertices));
        }

        fn graph_counts(&self, stage: &str, nodes: usize, arcs: usize) {
            self.counts.borrow_mut().push((stage.to_string(), nodes, arcs));
        }
    }
}
