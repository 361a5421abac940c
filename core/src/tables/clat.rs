//! Combined Linear Approximation Table (cLAT) construction and the
//! Splitting-Lookup-Recombination (SLR) search that consumes it — Huang &
//! Wang (2020), "Automatic Search for the Linear (Hull) Characteristics of
//! ARX Ciphers", Algorithm 2 and Algorithm 3.
//!
//! Transcribed from `examples/original_source/include/arx_search_framework/
//! clat/clat_builder.hpp` (`cLAT::build`, the `A/B/C`, `Cb/MT/Z`, Property 6
//! `F1/F2` check) and `clat_search.hpp`'s SLR recombination
//! (`lookup_and_recombine`/`lookup_recursive`). The header's own `build()` is
//! already direct `O(2^{2m})` enumeration per `(v, b)` bucket — this is the
//! paper's intended construction, not a simplification of it. What this
//! module does *not* carry over is `algorithm1_const.hpp`'s separate
//! `Const(S_Cw)` octal-digit recursion for constructing exact-weight mask
//! families without enumeration; see `DESIGN.md` for why.

use std::collections::HashMap;

/// One bucket entry: an `(u, w)` pair reachable from a chunk's `(v, b)`, its
/// chunk weight `Cw`, and the connection bit handed to the next (less
/// significant) chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClatEntry {
    /// Output mask chunk.
    pub u: u32,
    /// Second input mask chunk.
    pub w: u32,
    /// Chunk weight `Cw`.
    pub weight: u32,
    /// Outgoing connection bit, becomes the next chunk's incoming `b`.
    pub conn_status: u32,
}

/// One bit position's intermediate carry/connection state during chunk
/// weight computation.
fn chunk_entry(v: u32, w: u32, u: u32, b: u32, m: u32) -> Option<ClatEntry> {
    let a = u ^ v;
    let bb = u ^ w;
    let c = u ^ v ^ w;

    let cbit = |j: u32| (c >> (m - 1 - j)) & 1;

    let mut cw = 0u32;
    let mut z = 0u32;
    let mut mt_prev;

    if b == 1 {
        cw += 1;
        mt_prev = 1u32;
        z = 1 << (m - 1);
    } else {
        mt_prev = 0u32;
    }

    let mut cb_last = if m >= 1 { cbit(0) } else { 0 };
    for i in 1..m {
        let cb_prev = cbit(i - 1);
        let mt_i = (cb_prev + mt_prev) & 1;
        if mt_i == 1 {
            cw += 1;
            z |= 1 << (m - 1 - i);
        }
        mt_prev = mt_i;
        cb_last = cbit(i);
    }

    let f1 = a & !(a & z);
    let f2 = bb & !(bb & z);

    if f1 != 0 || f2 != 0 {
        return None;
    }

    let conn_status = (mt_prev + cb_last) & 1;
    Some(ClatEntry { u, w, weight: cw, conn_status })
}

/// The built cLAT: per-`(v, b)` buckets of `(u, w, weight, conn_status)`
/// entries, sorted by ascending weight.
pub struct ClatTable {
    m: u32,
    buckets: HashMap<(u32, u32), Vec<ClatEntry>>,
    min_weight: HashMap<(u32, u32), u32>,
}

impl ClatTable {
    /// Builds the table for `m`-bit chunks (`m` typically `4` or `8`; `8`
    /// means a `2^16`-entry-per-bucket, `2 * 2^8` bucket table, matching the
    /// paper's ~1.2GB-at-m=8 construction).
    #[must_use]
    pub fn build(m: u32) -> Self {
        let mask_size = 1u32 << m;
        let mut buckets: HashMap<(u32, u32), Vec<ClatEntry>> = HashMap::new();
        let mut min_weight: HashMap<(u32, u32), u32> = HashMap::new();

        for v in 0..mask_size {
            for b in 0..2u32 {
                let mut bucket = Vec::new();
                for w in 0..mask_size {
                    for u in 0..mask_size {
                        if let Some(entry) = chunk_entry(v, w, u, b, m) {
                            min_weight
                                .entry((v, b))
                                .and_modify(|cur| *cur = (*cur).min(entry.weight))
                                .or_insert(entry.weight);
                            bucket.push(entry);
                        }
                    }
                }
                bucket.sort_unstable_by_key(|e| e.weight);
                buckets.insert((v, b), bucket);
            }
        }

        Self { m, buckets, min_weight }
    }

    /// Chunk bit width.
    #[must_use]
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Entries for bucket `(v, b)`, sorted by ascending weight.
    #[must_use]
    pub fn entries(&self, v: u32, b: u32) -> &[ClatEntry] {
        self.buckets.get(&(v, b)).map_or(&[], Vec::as_slice)
    }

    /// Minimum chunk weight for bucket `(v, b)`, or `m` (the maximum
    /// possible) if the bucket is empty.
    #[must_use]
    pub fn min_weight(&self, v: u32, b: u32) -> u32 {
        self.min_weight.get(&(v, b)).copied().unwrap_or(self.m)
    }
}

/// Splits an `n`-bit mask `v_full` into `t = n / m` chunks, most significant
/// first.
fn split_chunks(v_full: u32, t: u32, m: u32) -> Vec<u32> {
    let mask = (1u32 << m) - 1;
    (0..t).rev().map(|k| (v_full >> (k * m)) & mask).collect()
}

/// SLR search (Algorithm 3): recombines the full `n`-bit `(u, w)` pair for a
/// fixed `n`-bit mask `v_full`, chunking MSB-first and chaining each bucket
/// lookup's connection bit into the next (less significant) chunk's incoming
/// `b`. Every result has total weight `<= weight_cap`.
///
/// Recurses natively over chunks rather than on an explicit stack: `t = n/m`
/// is at most 8 for the 32-bit masks this crate deals in, unlike the
/// per-*bit* enumerators elsewhere in this module's sibling `pddt.rs`, which
/// do need an explicit stack since their depth is `n` itself.
#[must_use]
pub fn slr_search(table: &ClatTable, v_full: u32, n: u32, weight_cap: u32) -> Vec<(u32, u32, u32)> {
    let m = table.m;
    let t = n / m;
    let chunks = split_chunks(v_full, t, m);

    let mut results = Vec::new();
    let mut chosen: Vec<ClatEntry> = Vec::new();

    fn recurse(
        table: &ClatTable,
        chunks: &[u32],
        chunk_index: usize,
        incoming_b: u32,
        acc_weight: u32,
        weight_cap: u32,
        chosen: &mut Vec<ClatEntry>,
        results: &mut Vec<(u32, u32, u32)>,
        t: u32,
        m: u32,
    ) {
        if chunk_index == chunks.len() {
            let mut u = 0u32;
            let mut w = 0u32;
            for (i, entry) in chosen.iter().enumerate() {
                // chosen[0] is the MSB chunk, at shift (t-1-i)*m.
                let shift = (t - 1 - i as u32) * m;
                u |= entry.u << shift;
                w |= entry.w << shift;
            }
            results.push((u, w, acc_weight));
            return;
        }

        let v_k = chunks[chunk_index];
        for &entry in table.entries(v_k, incoming_b) {
            let new_weight = acc_weight + entry.weight;
            if new_weight > weight_cap {
                break; // bucket is weight-sorted: no later entry can help either.
            }
            chosen.push(entry);
            recurse(table, chunks, chunk_index + 1, entry.conn_status, new_weight, weight_cap, chosen, results, t, m);
            chosen.pop();
        }
    }

    recurse(table, &chunks, 0, 0, 0, weight_cap, &mut chosen, &mut results, t, m);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_masks_are_always_in_every_bucket_with_zero_weight() {
        let table = ClatTable::build(4);
        for b in 0..2u32 {
            let entries = table.entries(0, b);
            let zero_entry = entries.iter().find(|e| e.u == 0 && e.w == 0);
            if b == 0 {
                assert!(zero_entry.is_some_and(|e| e.weight == 0));
            }
        }
    }

    #[test]
    fn buckets_are_sorted_by_ascending_weight() {
        let table = ClatTable::build(4);
        for &(v, b) in &[(0u32, 0u32), (5, 1), (15, 0)] {
            let entries = table.entries(v, b);
            for pair in entries.windows(2) {
                assert!(pair[0].weight <= pair[1].weight);
            }
        }
    }

    #[test]
    fn min_weight_matches_first_bucket_entry() {
        let table = ClatTable::build(4);
        let entries = table.entries(3, 0);
        if let Some(first) = entries.first() {
            assert_eq!(table.min_weight(3, 0), first.weight);
        }
    }

    #[test]
    fn slr_search_finds_the_zero_mask_zero_weight_trail() {
        let table = ClatTable::build(4);
        let found = slr_search(&table, 0, 8, 0);
        assert!(found.iter().any(|&(u, w, weight)| u == 0 && w == 0 && weight == 0));
    }

    #[test]
    fn slr_search_respects_the_weight_cap() {
        let table = ClatTable::build(4);
        let found = slr_search(&table, 0x5A, 8, 2);
        for &(_, _, weight) in &found {
            assert!(weight <= 2);
        }
    }
}
