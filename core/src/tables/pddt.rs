//! Partial Difference Distribution Table (pDDT) construction — Algorithm 1
//! of Biryukov & Velichkov, "Automatic Search for Differential Trails in ARX
//! Ciphers" — and the highways/country-roads candidate source it feeds.
//!
//! Grounded on `examples/original_source/include/pddt_algorithm1_complete.hpp`
//! (`PDDTAlgorithm1Complete::pddt_recursive`, `compute_lm_weight`) and
//! `examples/original_source/include/arx_search_framework/matsui/
//! matsui_algorithm2.hpp` (`HighwayTable`). Unlike that header, prefix
//! weights are not computed via the closed-form AOP formula (already shown
//! unreliable by `operators::xdp_add`'s module doc) but via the same
//! 4-state carry-automaton mass DP, bit-recursing jointly over `(alpha,
//! beta, gamma)` prefixes instead of only `gamma`.

use std::collections::HashMap;

use crate::operators::xdp_add::step_mass;

/// One entry of a pDDT: a differential `(alpha, beta -> gamma)` with its
/// weight `-log2(p)`, `p >= 2^{-weight_threshold}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PddtEntry {
    /// First input XOR difference.
    pub alpha: u32,
    /// Second input XOR difference.
    pub beta: u32,
    /// Output XOR difference.
    pub gamma: u32,
    /// `ceil(-log2(p))`.
    pub weight: u32,
}

/// Configuration for [`build_pddt`].
#[derive(Debug, Clone, Copy)]
pub struct PddtConfig {
    /// Bit width, `1..=32`.
    pub bit_width: u32,
    /// Maximum weight to admit into the table (inclusive).
    pub weight_threshold: u32,
    /// Hard cap on table size; `0` means unbounded. A safety backstop this
    /// crate adds beyond the paper's algorithm, since an overly generous
    /// `weight_threshold` at `bit_width = 32` can otherwise produce a table
    /// too large to hold in memory.
    pub max_entries: usize,
}

impl Default for PddtConfig {
    fn default() -> Self {
        Self { bit_width: 32, weight_threshold: 7, max_entries: 1_000_000 }
    }
}

struct Frame {
    bit: u32,
    alpha: u32,
    beta: u32,
    gamma: u32,
    mass: [f64; 4],
}

/// Builds a pDDT: every `(alpha, beta, gamma)` whose differential weight is
/// at most `config.weight_threshold`, found by bit-recursing from the LSB
/// and pruning any prefix whose probability mass already implies a weight
/// above threshold (monotonicity: `Proposition 1` of the paper, realized
/// here as the carry-automaton's mass never increasing bit over bit).
#[must_use]
pub fn build_pddt(config: &PddtConfig) -> Vec<PddtEntry> {
    let n = config.bit_width;
    let mut out = Vec::new();
    let mut stack: Vec<Frame> = vec![Frame { bit: 0, alpha: 0, beta: 0, gamma: 0, mass: [1.0, 0.0, 0.0, 0.0] }];

    while let Some(frame) = stack.pop() {
        if config.max_entries != 0 && out.len() >= config.max_entries {
            break;
        }

        if frame.bit == n {
            let total: f64 = frame.mass.iter().sum();
            if total > 0.0 {
                let weight = (-total.log2()).ceil() as u32;
                if weight <= config.weight_threshold {
                    out.push(PddtEntry { alpha: frame.alpha, beta: frame.beta, gamma: frame.gamma, weight });
                }
            }
            continue;
        }

        for a in [1u32, 0] {
            for b in [1u32, 0] {
                for g in [1u32, 0] {
                    let next_mass = step_mass(frame.mass, a, b, g);
                    let next_total: f64 = next_mass.iter().sum();
                    if next_total <= 0.0 {
                        continue;
                    }
                    let optimistic_weight = (-next_total.log2()).ceil() as u32;
                    if optimistic_weight > config.weight_threshold {
                        continue;
                    }
                    stack.push(Frame {
                        bit: frame.bit + 1,
                        alpha: frame.alpha | (a << frame.bit),
                        beta: frame.beta | (b << frame.bit),
                        gamma: frame.gamma | (g << frame.bit),
                        mass: next_mass,
                    });
                }
            }
        }
    }

    out
}

fn pack(alpha: u32, beta: u32) -> u64 {
    (u64::from(alpha) << 32) | u64::from(beta)
}

/// The highway table `H`: a built pDDT, indexed for fast `(alpha, beta)` and
/// `gamma` lookup.
pub struct HighwayTable {
    entries: Vec<PddtEntry>,
    by_input: HashMap<u64, Vec<usize>>,
    by_output: HashMap<u32, Vec<usize>>,
}

impl HighwayTable {
    /// Builds the index over an already-constructed pDDT.
    #[must_use]
    pub fn build(entries: Vec<PddtEntry>) -> Self {
        let mut by_input: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut by_output: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, e) in entries.iter().enumerate() {
            by_input.entry(pack(e.alpha, e.beta)).or_default().push(i);
            by_output.entry(e.gamma).or_default().push(i);
        }
        Self { entries, by_input, by_output }
    }

    /// Every entry with the given `(alpha, beta)`.
    #[must_use]
    pub fn query(&self, alpha: u32, beta: u32) -> Vec<PddtEntry> {
        self.by_input.get(&pack(alpha, beta)).into_iter().flatten().map(|&i| self.entries[i]).collect()
    }

    /// Whether `(alpha, beta)` has any highway entry at all.
    #[must_use]
    pub fn contains(&self, alpha: u32, beta: u32) -> bool {
        self.by_input.contains_key(&pack(alpha, beta))
    }

    /// Whether any entry reaches output difference `gamma`.
    #[must_use]
    pub fn contains_output(&self, gamma: u32) -> bool {
        self.by_output.contains_key(&gamma)
    }

    /// All entries in the table.
    #[must_use]
    pub fn entries(&self) -> &[PddtEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A pluggable source of `(gamma, weight)` candidates for a modular addition
/// `alpha (+) beta`, so the search engine's enumeration strategy can be
/// swapped without touching its control flow: plain bit-recursion by
/// default, or a highways-then-country-roads lookup backed by a prebuilt
/// [`HighwayTable`].
pub trait CandidateSource {
    /// Candidates for `alpha (+) beta -> gamma`, ideally ordered best-weight
    /// first, capped at `max_candidates` (`0` = exhaustive within
    /// `weight_cap`).
    fn candidates(&self, alpha: u32, beta: u32, weight_cap: Option<u32>, max_candidates: usize) -> Vec<(u32, u32)>;
}

/// Plain bit-recursion candidate source (`operators::xdp_add::enumerate_gammas`).
pub struct BitRecursionSource {
    /// Bit width.
    pub n: u32,
}

impl CandidateSource for BitRecursionSource {
    fn candidates(&self, alpha: u32, beta: u32, weight_cap: Option<u32>, max_candidates: usize) -> Vec<(u32, u32)> {
        crate::operators::xdp_add::enumerate_gammas(alpha, beta, self.n, weight_cap, max_candidates, 0)
    }
}

/// Highway-first candidate source: returns the highway table's entries for
/// `(alpha, beta)` when present ("highways", Matsui's fast path); falls back
/// to bit-recursion ("country roads") when the table has nothing for this
/// input pair, so every query still returns a complete, correct candidate
/// set regardless of whether the table was built with enough coverage.
pub struct HighwayCandidateSource<'a> {
    table: &'a HighwayTable,
    fallback: BitRecursionSource,
}

impl<'a> HighwayCandidateSource<'a> {
    /// Wraps `table`, falling back to bit-recursion at bit width `n` on miss.
    #[must_use]
    pub fn new(table: &'a HighwayTable, n: u32) -> Self {
        Self { table, fallback: BitRecursionSource { n } }
    }
}

impl CandidateSource for HighwayCandidateSource<'_> {
    fn candidates(&self, alpha: u32, beta: u32, weight_cap: Option<u32>, max_candidates: usize) -> Vec<(u32, u32)> {
        let highway = self.table.query(alpha, beta);
        if !highway.is_empty() {
            let mut out: Vec<(u32, u32)> = highway
                .into_iter()
                .filter(|e| weight_cap.is_none_or(|cap| e.weight <= cap))
                .map(|e| (e.gamma, e.weight))
                .collect();
            out.sort_unstable_by_key(|&(_, w)| w);
            if max_candidates != 0 {
                out.truncate(max_candidates);
            }
            return out;
        }
        self.fallback.candidates(alpha, beta, weight_cap, max_candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_difference_is_in_every_pddt() {
        let config = PddtConfig { bit_width: 8, weight_threshold: 4, max_entries: 0 };
        let table = build_pddt(&config);
        assert!(table.iter().any(|e| e.alpha == 0 && e.beta == 0 && e.gamma == 0 && e.weight == 0));
    }

    #[test]
    fn every_entry_respects_the_weight_threshold() {
        let config = PddtConfig { bit_width: 8, weight_threshold: 4, max_entries: 0 };
        let table = build_pddt(&config);
        assert!(!table.is_empty());
        for e in &table {
            assert!(e.weight <= 4);
        }
    }

    #[test]
    fn highway_table_indexes_by_input_and_output() {
        let config = PddtConfig { bit_width: 6, weight_threshold: 3, max_entries: 0 };
        let entries = build_pddt(&config);
        let highway = HighwayTable::build(entries);
        assert!(highway.contains(0, 0));
        assert!(highway.contains_output(0));
        let zero_entries = highway.query(0, 0);
        assert!(zero_entries.iter().any(|e| e.gamma == 0));
    }

    #[test]
    fn highway_source_falls_back_to_bit_recursion_on_miss() {
        let config = PddtConfig { bit_width: 8, weight_threshold: 1, max_entries: 0 };
        let entries = build_pddt(&config);
        let highway = HighwayTable::build(entries);
        let source = HighwayCandidateSource::new(&highway, 8);
        // (0xAB, 0x13) is very unlikely to be in a weight<=1 highway table;
        // the fallback must still return a complete, correct candidate set.
        let found = source.candidates(0xAB, 0x13, None, 0);
        assert!(!found.is_empty());
    }

    #[test]
    fn max_entries_caps_table_size() {
        let config = PddtConfig { bit_width: 10, weight_threshold: 6, max_entries: 5 };
        let table = build_pddt(&config);
        assert!(table.len() <= 5);
    }

    /// S6: a looser weight threshold never admits fewer entries.
    #[test]
    fn cardinality_is_monotone_in_the_weight_threshold() {
        let low = build_pddt(&PddtConfig { bit_width: 8, weight_threshold: 6, max_entries: 0 });
        let high = build_pddt(&PddtConfig { bit_width: 8, weight_threshold: 8, max_entries: 0 });
        assert!(low.len() <= high.len());
    }
}
