//! Backward branch-and-bound search for the maximum-|correlation| (minimum
//! linear weight) trail, from output masks at round `r` back to input masks
//! at round 0. Structurally mirrors `engine::differential`, reusing
//! `SearchContext` for budgets, memoization, and checkpoints, but:
//!
//! - it walks rounds in reverse, peeling the deterministic glue with the
//!   transpose operators in `cipher::round`;
//! - both modular additions are scored exactly (Wallen's log-n algorithm)
//!   but their input masks are not enumerated exhaustively — candidates are
//!   generated heuristically (low-Hamming-weight masks, the output mask's
//!   near neighbours, and the output mask itself) and only the top `K`
//!   survivors by weight are recursed into;
//! - injection steps contribute weight 0 and pass their mask through
//!   unchanged rather than going through the affine transition used by the
//!   differential model (binding design decision: the forward injector's
//!   cross-branch nonlinearity is not represented in the linear model).
//!
//! One subtlety the forward differential model never has to deal with:
//! `delta_b3` (the value entering the second addition's `addition_input_term`
//! *and*, unchanged, the second constant-subtraction) is a fan-out node.
//! Fan-out is the dual of XOR under mask transposition: a wire consumed by
//! two downstream masks `m1` and `m2` carries the combined mask `m1 ^ m2`
//! going backward. The same fan-out happens at the round's `delta_a` input.

use crate::cipher::round::{
    addition_input_term_transpose, l1_transpose, mix_stage_one_transpose, mix_stage_two_transpose, ROUND_CONSTANTS as RC,
};
use crate::engine::context::SearchContext;
use crate::operators::linear_const::corr_add_x_minus_const;
use crate::operators::linear_wallen::linear_weight_add_varvar;
use crate::types::{SearchConfig, SearchResult, TrailStep};

/// Heuristic candidate pool for a mask of interest: zero, every single-bit
/// mask, the mask itself, and every one-bit neighbour of the mask.
fn candidate_pool(mask: u32) -> Vec<u32> {
    let mut pool = Vec::with_capacity(66);
    pool.push(0);
    pool.push(mask);
    for i in 0..32u32 {
        pool.push(1u32 << i);
        pool.push(mask ^ (1u32 << i));
    }
    pool.sort_unstable();
    pool.dedup();
    pool
}

/// Enumerates `(mask_x, mask_y, weight)` candidates for a variable-variable
/// addition with known output mask `out`, scored by Wallen's exact log-n
/// algorithm, sorted by ascending weight and capped at `k`.
fn addition_candidates(out: u32, k: usize) -> Vec<(u32, u32, u32)> {
    let pool = candidate_pool(out);
    let mut found = Vec::new();
    for &v in &pool {
        for &w in &pool {
            if let Some(weight) = linear_weight_add_varvar(out, v, w) {
                found.push((v, w, weight));
            }
        }
    }
    found.sort_unstable_by_key(|&(_, _, w)| w);
    found.truncate(k);
    found
}

/// Enumerates `(mask_in, weight)` candidates for `x - constant` with known
/// output mask `out`, scored exactly via the transfer-matrix operator, sorted
/// by ascending weight and capped at `k`.
fn subtract_const_candidates(out: u32, constant: u32, k: usize) -> Vec<(u32, u32)> {
    let pool = candidate_pool(out);
    let mut found: Vec<(u32, u32)> = pool
        .into_iter()
        .filter_map(|alpha| {
            let lc = corr_add_x_minus_const(alpha, out, constant, 32);
            lc.is_feasible().then(|| (alpha, lc.weight.ceil() as u32))
        })
        .collect();
    found.sort_unstable_by_key(|&(_, w)| w);
    found.truncate(k);
    found
}

/// Runs the backward linear search for `config.round_count` rounds, starting
/// from the output mask pair `(mask_a_r, mask_b_r)` at round `r`.
///
/// Unlike the differential search, no greedy upper bound is constructed: the
/// backward model's fan-out combination gives no single always-feasible
/// candidate analogous to the identity difference, so `best_weight` starts
/// unseeded (`u32::MAX`) and is only tightened by what the DFS actually
/// finds.
#[must_use]
pub fn search_linear(mask_a_r: u32, mask_b_r: u32, config: &SearchConfig) -> SearchResult {
    let mut ctx = SearchContext::new(config, u32::MAX, Vec::new(), mask_a_r, mask_b_r);

    if config.round_count > 0 {
        explore_backward(&mut ctx, config.round_count, mask_a_r, mask_b_r, 0);
    }

    let found = !ctx.best_trail.is_empty();
    SearchResult {
        found,
        best_weight: if found { Some(ctx.best_weight) } else { None },
        best_trail: ctx.best_trail,
        nodes_visited: ctx.nodes_visited,
        hit_node_limit: ctx.hit_node_limit,
        hit_time_limit: ctx.hit_time_limit,
    }
}

#[allow(clippy::too_many_arguments)]
fn explore_backward(ctx: &mut SearchContext<'_>, round: u32, mask_a: u32, mask_b: u32, acc_weight: u32) {
    ctx.on_node_enter();
    if ctx.should_stop() {
        return;
    }
    if acc_weight >= ctx.best_weight {
        return;
    }
    if ctx.memo_prune(round, mask_a, mask_b, acc_weight) {
        return;
    }

    if round == 0 {
        if acc_weight < ctx.best_weight {
            // The trail was built peeling rounds r, r-1, ..., 1 in that
            // order; flip it so `best_trail` reads in round-ascending order
            // like the differential search's.
            let mut trail_snapshot = ctx.trail.clone();
            trail_snapshot.reverse();
            ctx.offer_best(acc_weight, &trail_snapshot);
        }
        return;
    }

    let k = ctx.config.linear_candidate_k;

    // Injection on B passes its mask through unchanged (weight 0): mask_b5
    // on the round boundary's B output equals mask_b on entry to this peel.
    let mask_b5 = mask_b;
    let (mask_b4, mask_a4) = mix_stage_two_transpose(mask_b5, mask_a);

    for &(mask_a3, mask_t1, w_add1) in &addition_candidates(mask_a4, k) {
        let acc1 = acc_weight + w_add1;
        if acc1 >= ctx.best_weight {
            continue;
        }

        for &(mask_b3_direct, w_sub1) in &subtract_const_candidates(mask_b4, RC[6], k) {
            let acc2 = acc1 + w_sub1;
            if acc2 >= ctx.best_weight {
                continue;
            }

            let mask_b3_from_t1 = addition_input_term_transpose(mask_t1);
            let mask_b3 = mask_b3_from_t1 ^ mask_b3_direct;

            let mask_b2 = l1_transpose(mask_b3);
            // Injection on B (forward) passes through unchanged into A3.
            let mask_a2 = mask_a3;

            let (mask_a1, mask_b1) = mix_stage_one_transpose(mask_a2, mask_b2);

            for &(mask_a_direct, w_sub0) in &subtract_const_candidates(mask_a1, RC[1], k) {
                let acc3 = acc2 + w_sub0;
                if acc3 >= ctx.best_weight {
                    continue;
                }

                for &(mask_b_in, mask_t0, w_add0) in &addition_candidates(mask_b1, k) {
                    let acc4 = acc3 + w_add0;
                    if acc4 >= ctx.best_weight {
                        continue;
                    }

                    let mask_a_from_t0 = addition_input_term_transpose(mask_t0);
                    let mask_a_in = mask_a_from_t0 ^ mask_a_direct;

                    ctx.trail.push(TrailStep {
                        round,
                        weight: acc4 - acc_weight,
                        delta_a: mask_a_in,
                        delta_b: mask_b_in,
                    });

                    explore_backward(ctx, round - 1, mask_a_in, mask_b_in, acc4);

                    ctx.trail.pop();

                    if ctx.should_stop() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_output_masks_yield_the_all_zero_trail() {
        let config = SearchConfig::new(1).with_linear_candidate_k(32);
        let result = search_linear(0, 0, &config);
        assert!(result.found);
        assert_eq!(result.best_weight, Some(0));
        assert_eq!(result.best_trail.len(), 1);
        assert_eq!(result.best_trail[0].delta_a, 0);
        assert_eq!(result.best_trail[0].delta_b, 0);
    }

    #[test]
    fn candidate_pool_always_contains_the_mask_and_zero() {
        let pool = candidate_pool(0xABCD_1234);
        assert!(pool.contains(&0));
        assert!(pool.contains(&0xABCD_1234));
    }

    #[test]
    fn addition_candidates_are_capped_at_k() {
        let found = addition_candidates(0x0000_0001, 5);
        assert!(found.len() <= 5);
    }

    #[test]
    fn node_visits_are_counted_for_a_small_search() {
        let config = SearchConfig::new(1).with_linear_candidate_k(16).with_max_nodes(50_000);
        let result = search_linear(0x1, 0x0, &config);
        assert!(result.nodes_visited >= 1);
    }
}
