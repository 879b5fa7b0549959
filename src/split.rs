//! Top-level driver: load sequences, align them and write the interval graph.

use std::fs::File;
use std::io::BufWriter;

use tracing::{info, info_span, warn};

use crate::config::{BatchConfig, GraphFormat};
use crate::diagnostics::Diagnostics;
use crate::distance::minimizer_distance_matrix;
use crate::errors::SplitError;
use crate::interval::{transform_graphs, IntervalGraph};
use crate::io::{load_minimizer_sequences, write_dot, write_json};
use crate::msa::{align, AlignmentEngine};
use crate::sequence::SequenceSet;

/// Load and tokenize all sequence files of a batch.
pub fn load_sequences(config: &BatchConfig) -> Result<SequenceSet, SplitError> {
    let tokenizer = config.tokenizer()?;
    let mut sequences = SequenceSet::new();

    for path in &config.seqfiles {
        let loaded = load_minimizer_sequences(&mut sequences, &tokenizer, path)?;
        if loaded == 0 {
            warn!("{} contains no sequences", path.display());
        }
    }

    if sequences.is_empty() {
        return Err(SplitError::NoSequences);
    }

    info!("Loaded {} sequences.", sequences.len());

    Ok(sequences)
}

/// Align the sequences and convert the alignment into an interval graph.
pub fn build_interval_graph<E>(
    engine: &E,
    sequences: &SequenceSet,
    diagnostics: Option<&dyn Diagnostics>,
) -> Result<IntervalGraph, SplitError>
where
    E: AlignmentEngine + ?Sized,
{
    let distance_matrix = minimizer_distance_matrix(sequences);
    let alignment = align(engine, sequences, distance_matrix, diagnostics)?;

    transform_graphs(&alignment, sequences, diagnostics)
}

pub fn write_graph(config: &BatchConfig, graph: &IntervalGraph, sequences: &SequenceSet) -> Result<(), SplitError> {
    let path = &config.output_graph_file;
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    match config.output_format {
        GraphFormat::Dot => write_dot(writer, graph, sequences)?,
        GraphFormat::Json => write_json(writer, graph, sequences)?,
    }

    info!("Wrote interval graph to {}", path.display());

    Ok(())
}

/// Run a full batch with the given engine and return the interval graph written to disk.
pub fn run_batch<E>(engine: &E, config: &BatchConfig) -> Result<IntervalGraph, SplitError>
where
    E: AlignmentEngine + ?Sized,
{
    let span = info_span!("run_batch", files = config.seqfiles.len());
    let _enter = span.enter();

    let sequences = load_sequences(config)?;
    let graph = build_interval_graph(engine, &sequences, config.diagnostics())?;
    write_graph(config, &graph, &sequences)?;

    Ok(graph)
}
