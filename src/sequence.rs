use std::ops::Index;
use std::path::{Path, PathBuf};

/// A minimizer token: the hashed k-mer value and the position of the k-mer in the raw sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Minimizer {
    pub value: u64,
    pub position: u32,
}

impl Minimizer {
    pub fn new(value: u64, position: u32) -> Self {
        Minimizer { value, position }
    }
}

/// A loaded sequence, reduced to its minimizer chain.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    id: String,
    file_of_origin: PathBuf,
    length: u32,
    minimizers: Vec<Minimizer>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, file_of_origin: impl Into<PathBuf>, length: u32, minimizers: Vec<Minimizer>) -> Self {
        let record = SequenceRecord {
            id: id.into(),
            file_of_origin: file_of_origin.into(),
            length,
            minimizers,
        };

        assert!(record.minimizers.windows(2).all(|w| w[0].position <= w[1].position),
            "minimizer positions of {} are not sorted", record.id);
        assert!(record.minimizers.last().map_or(true, |m| m.position < length),
            "minimizer of {} lies beyond the sequence end", record.id);

        record
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_of_origin(&self) -> &Path {
        &self.file_of_origin
    }

    /// Length of the raw sequence in bases
    #[inline(always)]
    pub fn length(&self) -> u32 {
        self.length
    }

    #[inline(always)]
    pub fn minimizers(&self) -> &[Minimizer] {
        &self.minimizers
    }

    /// Number of minimizer tokens
    #[inline(always)]
    pub fn token_count(&self) -> usize {
        self.minimizers.len()
    }

    /// Original sequence position of the given token
    #[inline]
    pub fn position_of(&self, token: usize) -> u32 {
        self.minimizers[token].position
    }
}

/// All sequences taking part in one split run, indexed by sequence id.
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    records: Vec<SequenceRecord>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SequenceRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&SequenceRecord> + '_ {
        self.records.iter()
    }

    pub fn get(&self, seq_id: usize) -> Option<&SequenceRecord> {
        self.records.get(seq_id)
    }

    pub fn token_counts(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.token_count()).collect()
    }
}

impl Index<usize> for SequenceSet {
    type Output = SequenceRecord;

    fn index(&self, seq_id: usize) -> &Self::Output {
        &self.records[seq_id]
    }
}

impl FromIterator<SequenceRecord> for SequenceSet {
    fn from_iter<T: IntoIterator<Item=SequenceRecord>>(iter: T) -> Self {
        SequenceSet { records: iter.into_iter().collect() }
    }
}

#[cfg(test)]
pub(crate) fn record_from_values(id: &str, values: &[u64]) -> SequenceRecord {
    let minimizers = values.iter()
        .enumerate()
        .map(|(pos, v)| Minimizer::new(*v, pos as u32))
        .collect();

    SequenceRecord::new(id, "test.fa", values.len() as u32, minimizers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_set() {
        let mut set = SequenceSet::new();
        let a = set.push(record_from_values("a", &[1, 2, 3]));
        let b = set.push(SequenceRecord::new("b", "other.fa", 40, vec![
            Minimizer::new(5, 0),
            Minimizer::new(7, 12),
        ]));

        assert_eq!((a, b), (0, 1));
        assert_eq!(set.len(), 2);
        assert_eq!(set.token_counts(), vec![3, 2]);
        assert_eq!(set[1].position_of(1), 12);
        assert_eq!(set[1].length(), 40);
        assert_eq!(set[1].file_of_origin(), Path::new("other.fa"));
    }

    #[test]
    #[should_panic]
    fn test_unsorted_positions() {
        SequenceRecord::new("x", "x.fa", 10, vec![Minimizer::new(1, 5), Minimizer::new(2, 3)]);
    }
}
