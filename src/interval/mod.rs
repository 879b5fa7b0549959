//! The directed interval graph: per merged alignment region, the coordinate range each sequence
//! contributes.

pub mod merge;
pub mod redirect;
pub mod transform;

use std::ops::{Index, IndexMut};

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Incoming, Outgoing};
use serde::Serialize;
use smallvec::SmallVec;

use crate::errors::SplitError;

pub use merge::merge_properties_into;
pub use transform::transform_graphs;

/// Half-open range `[start, end)` in original sequence coordinates. `(0, 0)` marks a sequence
/// that is not part of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeqRange {
    pub start: u32,
    pub end: u32,
}

impl SeqRange {
    pub fn new(start: u32, end: u32) -> Self {
        SeqRange { start, end }
    }

    #[inline(always)]
    pub fn is_unset(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    #[inline(always)]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }
}

/// One range per sequence id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RangeVector(Vec<SeqRange>);

impl RangeVector {
    pub fn new(num_sequences: usize) -> Self {
        RangeVector(vec![SeqRange::default(); num_sequences])
    }

    pub fn with_range(num_sequences: usize, seq_id: usize, range: SeqRange) -> Self {
        let mut ranges = Self::new(num_sequences);
        ranges[seq_id] = range;
        ranges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&SeqRange> + '_ {
        self.0.iter()
    }

    /// Sequence ids and ranges of the sequences present in this node
    pub fn populated(&self) -> impl Iterator<Item=(usize, SeqRange)> + '_ {
        self.0.iter()
            .copied()
            .enumerate()
            .filter(|(_, r)| !r.is_unset())
    }
}

impl Index<usize> for RangeVector {
    type Output = SeqRange;

    fn index(&self, seq_id: usize) -> &Self::Output {
        &self.0[seq_id]
    }
}

impl IndexMut<usize> for RangeVector {
    fn index_mut(&mut self, seq_id: usize) -> &mut Self::Output {
        &mut self.0[seq_id]
    }
}

/// The sequences passing from one node to the next, sorted by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntervalArc {
    pub sequence_ids: SmallVec<[usize; 4]>,
}

impl IntervalArc {
    pub fn new_with_seq_id(seq_id: usize) -> Self {
        IntervalArc { sequence_ids: smallvec::smallvec![seq_id] }
    }

    pub fn merge(&mut self, other: &IntervalArc) {
        for seq_id in &other.sequence_ids {
            if let Err(pos) = self.sequence_ids.binary_search(seq_id) {
                self.sequence_ids.insert(pos, *seq_id);
            }
        }
    }

    #[inline]
    pub fn contains(&self, seq_id: usize) -> bool {
        self.sequence_ids.binary_search(&seq_id).is_ok()
    }
}

pub type IntervalGraphType = StableDiGraph<RangeVector, IntervalArc, u32>;
pub type IntervalNodeIndex = NodeIndex<u32>;

/// Directed graph of merged alignment regions, framed by a source and a sink node.
#[derive(Debug, Clone)]
pub struct IntervalGraph {
    pub(crate) graph: IntervalGraphType,
    source: IntervalNodeIndex,
    sink: IntervalNodeIndex,
    num_sequences: usize,
}

impl IntervalGraph {
    pub fn new(num_sequences: usize) -> Self {
        let mut graph = IntervalGraphType::default();
        let source = graph.add_node(RangeVector::new(num_sequences));
        let sink = graph.add_node(RangeVector::new(num_sequences));

        IntervalGraph { graph, source, sink, num_sequences }
    }

    #[inline(always)]
    pub fn source(&self) -> IntervalNodeIndex {
        self.source
    }

    #[inline(always)]
    pub fn sink(&self) -> IntervalNodeIndex {
        self.sink
    }

    #[inline(always)]
    pub fn num_sequences(&self) -> usize {
        self.num_sequences
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn ranges(&self, node: IntervalNodeIndex) -> &RangeVector {
        &self.graph[node]
    }

    pub fn contains_node(&self, node: IntervalNodeIndex) -> bool {
        self.graph.contains_node(node)
    }

    /// All nodes except source and sink
    pub fn internal_nodes(&self) -> impl Iterator<Item=IntervalNodeIndex> + '_ {
        self.graph.node_indices()
            .filter(|n| *n != self.source && *n != self.sink)
    }

    pub fn successors(&self, node: IntervalNodeIndex) -> impl Iterator<Item=IntervalNodeIndex> + '_ {
        self.graph.neighbors_directed(node, Outgoing)
    }

    pub fn arcs(&self) -> impl Iterator<Item=(IntervalNodeIndex, IntervalNodeIndex, &IntervalArc)> + '_ {
        self.graph.edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    pub fn arc(&self, from: IntervalNodeIndex, to: IntervalNodeIndex) -> Option<&IntervalArc> {
        self.graph.find_edge(from, to)
            .map(|e| &self.graph[e])
    }

    pub fn add_node(&mut self, ranges: RangeVector) -> IntervalNodeIndex {
        assert_eq!(ranges.len(), self.num_sequences);
        self.graph.add_node(ranges)
    }

    /// Add an arc for the given sequence, reusing an existing arc between the same nodes.
    pub fn add_arc(&mut self, from: IntervalNodeIndex, to: IntervalNodeIndex, seq_id: usize) {
        self.merge_arc(from, to, IntervalArc::new_with_seq_id(seq_id));
    }

    fn merge_arc(&mut self, from: IntervalNodeIndex, to: IntervalNodeIndex, arc: IntervalArc) {
        if let Some(e) = self.graph.find_edge(from, to) {
            self.graph[e].merge(&arc);
        } else {
            self.graph.add_edge(from, to, arc);
        }
    }

    /// Merge `remove` into `keep`: arcs of `remove` are moved to `keep`, arcs that would become
    /// self-loops are dropped. Node properties are left to the caller.
    pub fn contract(&mut self, keep: IntervalNodeIndex, remove: IntervalNodeIndex) {
        assert_ne!(keep, remove);

        let incoming: Vec<_> = self.graph.edges_directed(remove, Incoming)
            .map(|e| (e.source(), e.weight().clone()))
            .collect();
        let outgoing: Vec<_> = self.graph.edges_directed(remove, Outgoing)
            .map(|e| (e.target(), e.weight().clone()))
            .collect();

        self.graph.remove_node(remove);

        for (from, arc) in incoming {
            if from != keep && from != remove {
                self.merge_arc(from, keep, arc);
            }
        }

        for (to, arc) in outgoing {
            if to != keep && to != remove {
                self.merge_arc(keep, to, arc);
            }
        }
    }

    pub fn topological_order(&self) -> Result<Vec<IntervalNodeIndex>, SplitError> {
        Ok(toposort(&self.graph, None)?)
    }

    /// Nodes visited by a sequence on its way from source to sink, sentinels excluded.
    pub fn sequence_path(&self, seq_id: usize) -> Result<Vec<IntervalNodeIndex>, SplitError> {
        let mut path = Vec::new();
        let mut curr = self.source;

        while curr != self.sink {
            let next = self.graph.edges_directed(curr, Outgoing)
                .find(|e| e.weight().contains(seq_id))
                .map(|e| e.target())
                .ok_or(SplitError::GraphError)?;

            if next != self.sink {
                path.push(next);
            }

            // Each node holds at most one range per sequence
            if path.len() > self.node_count() {
                return Err(SplitError::GraphError);
            }

            curr = next;
        }

        Ok(path)
    }
}
