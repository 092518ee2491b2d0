//! Incremental byte statistics and the feature vector built from them.
//!
//! Feature indices are 1-based: unigram frequencies first, then bigram
//! frequencies, then a handful of whole-range statistics.

use crate::ngram::NgramMode;

/// Number of unigram features.
pub const UNIGRAM_FEATURES: usize = 256;
/// Number of bigram features.
pub const BIGRAM_FEATURES: usize = 256 * 256;
/// Number of scalar features.
pub const SCALAR_FEATURES: usize = 6;
/// Total number of features.
pub const FEATURE_COUNT: usize = UNIGRAM_FEATURES + BIGRAM_FEATURES + SCALAR_FEATURES;

const BIGRAM_BASE: u32 = UNIGRAM_FEATURES as u32 + 1;
const SCALAR_BASE: u32 = BIGRAM_BASE + BIGRAM_FEATURES as u32;

/// Index of the entropy feature.
pub const ENTROPY_FEATURE: u32 = SCALAR_BASE;

/// Index of the unigram feature for `byte`.
pub fn unigram_index(byte: u8) -> u32 {
    u32::from(byte) + 1
}

/// Index of the bigram feature for the pair `first`, `second`.
pub fn bigram_index(first: u8, second: u8) -> u32 {
    BIGRAM_BASE + ((u32::from(first) << 8) | u32::from(second))
}

/// Sparse feature vector: `(index, value)` pairs in ascending index order,
/// zero values omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(u32, f64)>,
}

impl FeatureVector {
    /// Keep only the entries whose index passes `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(u32) -> bool) {
        self.entries.retain(|(index, _)| keep(*index));
    }

    /// Value at an index, zero when absent.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Non-zero entries in ascending index order.
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether every feature is zero.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary statistics of the accumulated bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByteSummary {
    pub total: u64,
    pub distinct: usize,
    /// Shannon entropy in bits per byte.
    pub entropy: f64,
    pub printable_ratio: f64,
}

/// Accumulates byte statistics across any number of `update` calls.
#[derive(Debug, Clone)]
pub struct FeatureAccumulator {
    mode: NgramMode,
    unigrams: [u64; UNIGRAM_FEATURES],
    bigrams: Vec<u64>,
    bigram_total: u64,
    total: u64,
    sum: u64,
    sum_sq: u64,
    hamming: u64,
    printable: u64,
    run: u64,
    longest_run: u64,
    // Last two bytes seen, most recent first.
    previous: Option<u8>,
    before_previous: Option<u8>,
}

impl FeatureAccumulator {
    pub fn new(mode: NgramMode) -> Self {
        Self {
            mode,
            unigrams: [0; UNIGRAM_FEATURES],
            bigrams: vec![0; BIGRAM_FEATURES],
            bigram_total: 0,
            total: 0,
            sum: 0,
            sum_sq: 0,
            hamming: 0,
            printable: 0,
            run: 0,
            longest_run: 0,
            previous: None,
            before_previous: None,
        }
    }

    /// Current pairing mode.
    pub fn mode(&self) -> NgramMode {
        self.mode
    }

    /// Change the pairing mode and clear all state.
    pub fn set_mode(&mut self, mode: NgramMode) {
        self.mode = mode;
        self.clear();
    }

    /// Add bytes. Pairing continues across calls.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let partner = match self.mode {
                NgramMode::Overlapping => self.previous,
                NgramMode::Disjoint if self.total % 2 == 1 => self.previous,
                NgramMode::Disjoint => None,
                NgramMode::EvenOdd => self.before_previous,
            };
            if let Some(first) = partner {
                self.bigrams[(usize::from(first) << 8) | usize::from(byte)] += 1;
                self.bigram_total += 1;
            }

            self.unigrams[usize::from(byte)] += 1;
            self.sum += u64::from(byte);
            self.sum_sq += u64::from(byte) * u64::from(byte);
            self.hamming += u64::from(byte.count_ones());
            if is_printable(byte) {
                self.printable += 1;
            }

            if self.previous == Some(byte) {
                self.run += 1;
            } else {
                self.run = 1;
            }
            self.longest_run = self.longest_run.max(self.run);

            self.before_previous = self.previous;
            self.previous = Some(byte);
            self.total += 1;
        }
    }

    /// Reset to the empty state, keeping the mode.
    pub fn clear(&mut self) {
        self.unigrams = [0; UNIGRAM_FEATURES];
        self.bigrams.iter_mut().for_each(|count| *count = 0);
        self.bigram_total = 0;
        self.total = 0;
        self.sum = 0;
        self.sum_sq = 0;
        self.hamming = 0;
        self.printable = 0;
        self.run = 0;
        self.longest_run = 0;
        self.previous = None;
        self.before_previous = None;
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Summary statistics used by the builtin model.
    pub fn summary(&self) -> ByteSummary {
        ByteSummary {
            total: self.total,
            distinct: self.unigrams.iter().filter(|&&count| count > 0).count(),
            entropy: self.entropy(),
            printable_ratio: ratio(self.printable, self.total),
        }
    }

    fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        -self
            .unigrams
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }

    /// Build the feature vector for the accumulated bytes.
    pub fn features(&self) -> FeatureVector {
        let mut entries = Vec::new();
        if self.total == 0 {
            return FeatureVector { entries };
        }

        for (byte, &count) in self.unigrams.iter().enumerate() {
            if count > 0 {
                entries.push((byte as u32 + 1, ratio(count, self.total)));
            }
        }
        for (pair, &count) in self.bigrams.iter().enumerate() {
            if count > 0 {
                entries.push((BIGRAM_BASE + pair as u32, ratio(count, self.bigram_total)));
            }
        }

        let total = self.total as f64;
        let mean = self.sum as f64 / total;
        let variance = (self.sum_sq as f64 / total - mean * mean).max(0.0);
        let scalars = [
            self.entropy() / 8.0,
            mean / 255.0,
            variance.sqrt() / 255.0,
            self.hamming as f64 / total / 8.0,
            ratio(self.longest_run, self.total),
            ratio(self.printable, self.total),
        ];
        for (offset, value) in scalars.into_iter().enumerate() {
            if value != 0.0 {
                entries.push((SCALAR_BASE + offset as u32, value));
            }
        }

        FeatureVector { entries }
    }
}

impl Default for FeatureAccumulator {
    fn default() -> Self {
        Self::new(NgramMode::default())
    }
}

fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e | b'\t' | b'\n' | b'\r')
}

fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bigram_counts(mode: NgramMode, chunks: &[&[u8]]) -> Vec<(u32, f64)> {
        let mut acc = FeatureAccumulator::new(mode);
        for chunk in chunks {
            acc.update(chunk);
        }
        acc.features()
            .entries()
            .iter()
            .copied()
            .filter(|(i, _)| (BIGRAM_BASE..SCALAR_BASE).contains(i))
            .collect()
    }

    #[test]
    fn test_overlapping_pairs_span_updates() {
        let split = bigram_counts(NgramMode::Overlapping, &[b"ab", b"c"]);
        let whole = bigram_counts(NgramMode::Overlapping, &[b"abc"]);
        assert_eq!(split, whole);
        assert_eq!(
            whole,
            vec![(bigram_index(b'a', b'b'), 0.5), (bigram_index(b'b', b'c'), 0.5)]
        );
    }

    #[test]
    fn test_disjoint_pairs() {
        let pairs = bigram_counts(NgramMode::Disjoint, &[b"a", b"bcd", b"e"]);
        assert_eq!(
            pairs,
            vec![(bigram_index(b'a', b'b'), 0.5), (bigram_index(b'c', b'd'), 0.5)]
        );
    }

    #[test]
    fn test_even_odd_pairs() {
        let pairs = bigram_counts(NgramMode::EvenOdd, &[b"abcd"]);
        assert_eq!(
            pairs,
            vec![(bigram_index(b'a', b'c'), 0.5), (bigram_index(b'b', b'd'), 0.5)]
        );
    }

    #[test]
    fn test_constant_input_statistics() {
        let mut acc = FeatureAccumulator::default();
        acc.update(&[0xffu8; 64]);
        let summary = acc.summary();
        assert_eq!(summary.distinct, 1);
        assert_eq!(summary.entropy, 0.0);

        let features = acc.features();
        assert_eq!(features.get(unigram_index(0xff)), 1.0);
        assert_eq!(features.get(ENTROPY_FEATURE), 0.0);
        // mean/255, hamming and longest run are all saturated.
        assert_eq!(features.get(SCALAR_BASE + 1), 1.0);
        assert_eq!(features.get(SCALAR_BASE + 3), 1.0);
        assert_eq!(features.get(SCALAR_BASE + 4), 1.0);
    }

    #[test]
    fn test_uniform_input_has_full_entropy() {
        let mut acc = FeatureAccumulator::default();
        let data: Vec<u8> = (0..=255u8).collect();
        acc.update(&data);
        assert!((acc.summary().entropy - 8.0).abs() < 1e-9);
        assert!((acc.features().get(ENTROPY_FEATURE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut acc = FeatureAccumulator::default();
        acc.update(b"hello world");
        acc.clear();
        assert!(acc.is_empty());
        assert!(acc.features().is_empty());

        acc.update(b"xy");
        assert_eq!(acc.features().get(bigram_index(b'd', b'x')), 0.0);
    }
}
