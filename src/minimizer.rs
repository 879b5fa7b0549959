//! Windowed minimizer extraction over raw DNA sequences.

use std::collections::VecDeque;

use crate::errors::SplitError;
use crate::sequence::Minimizer;

/// Seed XORed into k-mer values so that poly-A stretches do not dominate the minimizers
pub const MINIMIZER_SEED: u64 = 0x8F3F_73B5_CF1C_9ADE;

/// Turns a raw sequence into its chain of minimizer tokens.
pub trait Tokenizer {
    fn tokenize(&self, sequence: &[u8]) -> Vec<Minimizer>;
}

#[derive(Debug, Clone, Copy)]
pub struct MinimizerTokenizer {
    kmer_size: u8,
    window_size: u16,
    mask: u64,
}

impl MinimizerTokenizer {
    pub fn new(kmer_size: u8, window_size: u16) -> Result<Self, SplitError> {
        if kmer_size == 0 || kmer_size > 32 {
            return Err(SplitError::InvalidConfig(format!("k-mer size must be in 1..=32, got {kmer_size}")));
        }

        if (window_size as usize) < kmer_size as usize {
            return Err(SplitError::InvalidConfig(
                format!("window size ({window_size}) must not be smaller than the k-mer size ({kmer_size})")));
        }

        let mask = if kmer_size == 32 { u64::MAX } else { (1u64 << (2 * kmer_size as u32)) - 1 };

        Ok(MinimizerTokenizer { kmer_size, window_size, mask })
    }

    #[inline(always)]
    pub fn kmer_size(&self) -> u8 {
        self.kmer_size
    }

    #[inline(always)]
    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    /// Number of consecutive k-mers in one window
    #[inline(always)]
    fn kmers_per_window(&self) -> usize {
        self.window_size as usize - self.kmer_size as usize + 1
    }

    /// Canonical, seeded value of every valid k-mer together with its start position.
    fn kmer_values(&self, sequence: &[u8]) -> Vec<Minimizer> {
        let k = self.kmer_size as usize;
        let rc_shift = 2 * (k as u32 - 1);

        let mut values = Vec::with_capacity(sequence.len().saturating_sub(k - 1));
        let mut forward = 0u64;
        let mut reverse = 0u64;
        let mut valid = 0usize;

        for (pos, base) in sequence.iter().enumerate() {
            let Some(code) = encode_base(*base) else {
                valid = 0;
                forward = 0;
                reverse = 0;
                continue;
            };

            forward = ((forward << 2) | code) & self.mask;
            reverse = (reverse >> 2) | ((3 - code) << rc_shift);
            valid += 1;

            if valid >= k {
                let canonical = forward.min(reverse);
                values.push(Minimizer::new((canonical ^ MINIMIZER_SEED) & self.mask, (pos + 1 - k) as u32));
            }
        }

        values
    }
}

impl Tokenizer for MinimizerTokenizer {
    fn tokenize(&self, sequence: &[u8]) -> Vec<Minimizer> {
        let kmers = self.kmer_values(sequence);
        let span = self.kmers_per_window();

        let mut minimizers: Vec<Minimizer> = Vec::new();
        let mut window: VecDeque<Minimizer> = VecDeque::with_capacity(span);

        let push_front = |window: &VecDeque<Minimizer>, minimizers: &mut Vec<Minimizer>| {
            if let Some(front) = window.front() {
                if minimizers.last() != Some(front) {
                    minimizers.push(*front);
                }
            }
        };

        let mut full_window_seen = false;
        for kmer in &kmers {
            let window_end = kmer.position as usize;

            while window.back().map_or(false, |back| back.value > kmer.value) {
                window.pop_back();
            }
            window.push_back(*kmer);

            while window.front().map_or(false, |front| front.position as usize + span <= window_end) {
                window.pop_front();
            }

            if window_end + 1 >= span {
                full_window_seen = true;
                push_front(&window, &mut minimizers);
            }
        }

        // Sequence shorter than a single window
        if !full_window_seen {
            push_front(&window, &mut minimizers);
        }

        minimizers
    }
}

#[inline]
fn encode_base(base: u8) -> Option<u64> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters() {
        assert!(MinimizerTokenizer::new(0, 10).is_err());
        assert!(MinimizerTokenizer::new(33, 40).is_err());
        assert!(MinimizerTokenizer::new(20, 10).is_err());
        assert!(MinimizerTokenizer::new(32, 32).is_ok());
    }

    #[test]
    fn test_canonical_kmers() {
        let tokenizer = MinimizerTokenizer::new(4, 4).unwrap();

        // AAAC and GTTT are reverse complements of each other
        let fwd = tokenizer.tokenize(b"AAAC");
        let rev = tokenizer.tokenize(b"GTTT");
        assert_eq!(fwd.len(), 1);
        assert_eq!(fwd[0].value, rev[0].value);
    }

    #[test]
    fn test_window_equals_kmer() {
        let tokenizer = MinimizerTokenizer::new(3, 3).unwrap();
        let seq = b"ACGTTGCAAC";
        let tokens = tokenizer.tokenize(seq);

        // Every k-mer is its own window
        let kmers = tokenizer.kmer_values(seq);
        assert_eq!(kmers.len(), seq.len() - 2);
        assert_eq!(tokens, kmers);
        assert!(tokens.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn test_positions_sorted_and_in_range() {
        let tokenizer = MinimizerTokenizer::new(5, 12).unwrap();
        let seq = b"ACGTAGGCTAGCTAGCATCGATCGNNACGTAGCTAGCTAGGGATCCATG";
        let tokens = tokenizer.tokenize(seq);

        assert!(!tokens.is_empty());
        assert!(tokens.windows(2).all(|w| w[0].position <= w[1].position));
        assert!(tokens.iter().all(|m| (m.position as usize) + 5 <= seq.len()));

        // No k-mer may span the N stretch
        assert!(tokens.iter().all(|m| {
            let p = m.position as usize;
            !seq[p..p + 5].contains(&b'N')
        }));
    }

    #[test]
    fn test_every_window_has_its_minimum() {
        let tokenizer = MinimizerTokenizer::new(4, 8).unwrap();
        let seq = b"TTGACCATGACGGATTACAGGATCCA";
        let kmers = tokenizer.kmer_values(seq);
        let tokens = tokenizer.tokenize(seq);

        for window in kmers.windows(5) {
            let min = window.iter().map(|m| m.value).min().unwrap();
            assert!(tokens.iter().any(|t| t.value == min
                && t.position >= window[0].position
                && t.position <= window[4].position));
        }
    }

    #[test]
    fn test_short_sequence() {
        let tokenizer = MinimizerTokenizer::new(4, 20).unwrap();
        assert_eq!(tokenizer.tokenize(b"ACGTAC").len(), 1);
        assert!(tokenizer.tokenize(b"ACG").is_empty());
        assert!(tokenizer.tokenize(b"NNNNNNNN").is_empty());
    }
}
