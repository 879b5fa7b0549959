//! Conversion of an alignment graph into an interval graph.
//!
//! Runs in three steps that must not be reordered: one node per fragment (plus source and
//! sink), arcs along each sequence's fragment chain, then contraction of the nodes connected by
//! aligned-with edges.

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::errors::SplitError;
use crate::msa::graph::AlignmentGraph;
use crate::sequence::SequenceSet;

use super::merge::merge_properties_into;
use super::redirect::NodeRedirect;
use super::{IntervalGraph, RangeVector, SeqRange};

fn transfer_nodes(
    graph: &mut IntervalGraph,
    nodes: &mut NodeRedirect,
    alignment: &AlignmentGraph,
    sequences: &SequenceSet,
) {
    let num_sequences = sequences.len();

    for (fragment_id, fragment) in alignment.fragments() {
        let seq_id = fragment.seq_id;
        assert!(seq_id < num_sequences, "fragment {fragment_id} refers to unknown sequence {seq_id}");

        let record = &sequences[seq_id];
        let reg_start = fragment.begin;
        let reg_end = fragment.end();

        // The first minimizer also covers the bases before it
        let range_start = if reg_start == 0 { 0 } else { record.position_of(reg_start) };
        let range_end = if reg_end >= record.token_count() {
            record.length()
        } else {
            record.position_of(reg_end)
        };

        assert!(range_end >= range_start, "fragment {fragment_id} maps to [{range_start}, {range_end})");

        let node = graph.add_node(RangeVector::with_range(num_sequences, seq_id, SeqRange::new(range_start, range_end)));
        let slot = nodes.push(node);
        debug_assert_eq!(slot, fragment_id);

        if range_start == 0 {
            graph.add_arc(graph.source(), node, seq_id);
        }

        if range_end == record.length() {
            graph.add_arc(node, graph.sink(), seq_id);
        }
    }
}

fn transfer_directed_edges(graph: &mut IntervalGraph, nodes: &mut NodeRedirect, alignment: &AlignmentGraph) {
    for seq_id in 0..alignment.num_sequences() {
        let mut previous = None;
        let mut pos = 0;

        while pos < alignment.token_count(seq_id) {
            let Some(next) = alignment.find_fragment(seq_id, pos) else {
                pos += 1;
                continue;
            };

            if let Some(prev) = previous {
                let from = nodes.node_of(prev);
                let to = nodes.node_of(next);
                graph.add_arc(from, to, seq_id);
            }

            previous = Some(next);
            pos = alignment.fragment(next).end();
        }
    }
}

fn transfer_undirected_edges(
    graph: &mut IntervalGraph,
    nodes: &mut NodeRedirect,
    alignment: &AlignmentGraph,
) -> Result<(), SplitError> {
    for edge in alignment.edges() {
        let keep = nodes.node_of(edge.source);
        let remove = nodes.node_of(edge.target);

        // Already combined by an earlier edge
        if keep == remove {
            continue;
        }

        let swallowed = graph.graph[remove].clone();
        merge_properties_into(&mut graph.graph[keep], &swallowed)?;

        graph.contract(keep, remove);
        nodes.redirect(edge.target, edge.source);
    }

    Ok(())
}

/// Build the interval graph of an alignment graph over the given sequences.
///
/// Fails with [`SplitError::CorruptedGraph`] if two aligned regions of the same sequence are not
/// adjacent; no partial graph is returned in that case.
pub fn transform_graphs(
    alignment: &AlignmentGraph,
    sequences: &SequenceSet,
    diagnostics: Option<&dyn Diagnostics>,
) -> Result<IntervalGraph, SplitError> {
    assert_eq!(alignment.num_sequences(), sequences.len());
    assert_eq!(alignment.token_counts(), sequences.token_counts().as_slice());

    let mut graph = IntervalGraph::new(sequences.len());
    let mut nodes = NodeRedirect::with_capacity(alignment.fragment_count());

    transfer_nodes(&mut graph, &mut nodes, alignment, sequences);
    debug!("inserted {} nodes into the graph.", graph.node_count());
    if let Some(sink) = diagnostics {
        sink.graph_counts("Node transfer", graph.node_count(), graph.arc_count());
    }

    transfer_directed_edges(&mut graph, &mut nodes, alignment);
    debug!("inserted {} arcs into the graph.", graph.arc_count());
    if let Some(sink) = diagnostics {
        sink.graph_counts("Directed edge transfer", graph.node_count(), graph.arc_count());
    }

    transfer_undirected_edges(&mut graph, &mut nodes, alignment)?;
    debug!("contracted graph has {} nodes and {} arcs.", graph.node_count(), graph.arc_count());
    if let Some(sink) = diagnostics {
        sink.graph_counts("Contraction", graph.node_count(), graph.arc_count());
    }

    Ok(graph)
}
