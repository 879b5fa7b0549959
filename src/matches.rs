//! All-to-all segment match generation from shared minimizers.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::sequence::SequenceSet;

pub type Score = i32;

/// Initial score of every segment match. The alignment engine rescores matches while building
/// its graph, so the value only needs to be positive.
pub const PLACEHOLDER_SCORE: Score = 10;

/// Two token positions in two different sequences carrying the same minimizer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentMatch {
    pub seq1: usize,
    pub pos1: usize,
    pub seq2: usize,
    pub pos2: usize,
    pub length: usize,
}

impl SegmentMatch {
    pub fn new(seq1: usize, pos1: usize, seq2: usize, pos2: usize, length: usize) -> Self {
        SegmentMatch { seq1, pos1, seq2, pos2, length }
    }
}

/// Emit one single-token match for every pair of occurrences of the same minimizer value
/// in two different sequences. The returned score vector is parallel to the matches.
pub fn generate_matches(sequences: &SequenceSet) -> (Vec<SegmentMatch>, Vec<Score>) {
    let mut occurrences: FxHashMap<u64, Vec<(usize, usize)>> = FxHashMap::default();
    for (seq_id, record) in sequences.iter().enumerate() {
        for (pos, minimizer) in record.minimizers().iter().enumerate() {
            occurrences.entry(minimizer.value)
                .or_default()
                .push((seq_id, pos));
        }
    }

    let mut matches = Vec::new();
    for id_pos_pairs in occurrences.values() {
        for ((seq1, pos1), (seq2, pos2)) in id_pos_pairs.iter().copied().tuple_combinations() {
            // A sequence never aligns to itself
            if seq1 != seq2 {
                matches.push(SegmentMatch::new(seq1, pos1, seq2, pos2, 1));
            }
        }
    }

    trace!(buckets = occurrences.len(), matches = matches.len(), "generated segment matches");

    let scores = vec![PLACEHOLDER_SCORE; matches.len()];
    (matches, scores)
}
