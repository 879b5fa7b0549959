//! Interval graph output in DOT and JSON formats

use std::fmt;
use std::io::Write;

use itertools::Itertools;
use petgraph::dot::Dot;
use petgraph::visit::EdgeRef;
use petgraph::visit::IntoEdgeReferences;
use serde::Serialize;

use crate::errors::SplitError;
use crate::interval::{IntervalGraph, IntervalNodeIndex, RangeVector};
use crate::sequence::SequenceSet;

fn node_label(graph: &IntervalGraph, sequences: &SequenceSet, node: IntervalNodeIndex) -> String {
    if node == graph.source() {
        return "source".to_string();
    }

    if node == graph.sink() {
        return "sink".to_string();
    }

    graph.ranges(node)
        .populated()
        .map(|(seq_id, range)| format!("{}:[{},{})", sequences[seq_id].id(), range.start, range.end))
        .join("\n")
}

pub fn format_as_dot(
    writer: &mut impl fmt::Write,
    graph: &IntervalGraph,
    sequences: &SequenceSet,
) -> fmt::Result {
    let transformed = graph.graph.map(
        |ix, _| node_label(graph, sequences, ix),
        |_, arc| format!("{:?}", arc.sequence_ids.as_slice()),
    );

    let dot = Dot::new(&transformed);

    writeln!(writer, "{}", dot)?;

    Ok(())
}

pub fn write_dot(mut writer: impl Write, graph: &IntervalGraph, sequences: &SequenceSet) -> Result<(), SplitError> {
    let mut output = String::new();
    format_as_dot(&mut output, graph, sequences)
        .map_err(|_| SplitError::GraphError)?;

    writer.write_all(output.as_bytes())?;

    Ok(())
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: usize,
    ranges: &'a RangeVector,
}

#[derive(Serialize)]
struct JsonArc<'a> {
    source: usize,
    target: usize,
    sequence_ids: &'a [usize],
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    sequences: Vec<&'a str>,
    source: usize,
    sink: usize,
    nodes: Vec<JsonNode<'a>>,
    arcs: Vec<JsonArc<'a>>,
}

pub fn write_json(writer: impl Write, graph: &IntervalGraph, sequences: &SequenceSet) -> Result<(), SplitError> {
    let nodes = graph.graph.node_indices()
        .map(|ix| JsonNode { id: ix.index(), ranges: graph.ranges(ix) })
        .collect();

    let arcs = graph.graph.edge_references()
        .map(|e| JsonArc {
            source: e.source().index(),
            target: e.target().index(),
            sequence_ids: e.weight().sequence_ids.as_slice(),
        })
        .collect();

    let output = JsonGraph {
        sequences: sequences.iter().map(|r| r.id()).collect(),
        source: graph.source().index(),
        sink: graph.sink().index(),
        nodes,
        arcs,
    };

    serde_json::to_writer_pretty(writer, &output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::transform_graphs;
    use crate::msa::mock;

    fn contracted_graph() -> (SequenceSet, IntervalGraph) {
        let (sequences, alignment) = mock::three_sequence_alignment();
        let graph = transform_graphs(&alignment, &sequences, None).unwrap();

        (sequences, graph)
    }

    #[test]
    fn test_dot_output() {
        let (sequences, graph) = contracted_graph();

        let mut output = Vec::new();
        write_dot(&mut output, &graph, &sequences).unwrap();
        let dot = String::from_utf8(output).unwrap();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("source"));
        assert!(dot.contains("sink"));
        assert!(dot.contains("seq1:[0,3)"));
        assert_eq!(dot.matches(" -> ").count(), graph.arc_count());
    }

    #[test]
    fn test_json_output() {
        let (sequences, graph) = contracted_graph();

        let mut output = Vec::new();
        write_json(&mut output, &graph, &sequences).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["sequences"].as_array().unwrap().len(), 3);
        assert_eq!(json["nodes"].as_array().unwrap().len(), graph.node_count());
        assert_eq!(json["arcs"].as_array().unwrap().len(), graph.arc_count());
        assert_eq!(json["source"].as_u64().unwrap() as usize, graph.source().index());

        let source = json["nodes"].as_array().unwrap()
            .iter()
            .find(|n| n["id"] == json["source"])
            .unwrap();
        assert_eq!(source["ranges"].as_array().unwrap().len(), 3);
    }
}
