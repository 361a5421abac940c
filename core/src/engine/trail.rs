//! Greedy upper-bound construction: a cheap, always-feasible trail used to
//! seed `best_weight` before the branch-and-bound DFS begins, so early
//! pruning has something real to prune against.

use crate::cipher::injection::{affine_transition, f_a, f_b};
use crate::cipher::round::{addition_input_term, l1, mix_stage_one, mix_stage_two, ROUND_CONSTANTS as RC};
use crate::operators::bv_weight::{diff_weight_sub_const, enumerate_v_candidates};
use crate::operators::optimal_gamma::find_optimal_gamma_with_weight;
use crate::types::TrailStep;

/// Resolves one constant-subtraction step greedily: try the identity output
/// first (and a small neighbourhood of one-bit flips around it), falling
/// back to a bounded global search for *any* feasible output if that
/// neighbourhood is empty. Always returns a feasible `(output, weight)`
/// pair for a nonzero `weight_cap` large enough to admit the subtraction's
/// true minimum weight (which this crate never bounds away from: the
/// global fallback has no cap).
fn greedy_subtract_const(delta_in: u32, constant: u32) -> (u32, u32) {
    if let Some(w) = diff_weight_sub_const(delta_in, constant, delta_in) {
        return (delta_in, w);
    }

    let neighbourhood = enumerate_v_candidates(delta_in, constant.wrapping_neg(), None, 64);
    if let Some(&(v, w)) = neighbourhood.iter().min_by_key(|&&(_, w)| w) {
        return (v, w);
    }

    let global = enumerate_v_candidates(delta_in, constant.wrapping_neg(), None, 0);
    global
        .into_iter()
        .min_by_key(|&(_, w)| w)
        .expect("addition by a constant is a bijection: some output is always feasible")
}

/// Builds a greedy differential upper bound: round count `r`, starting
/// difference `(delta_a0, delta_b0)`. Returns the total weight and the
/// per-round trail.
#[must_use]
pub fn greedy_differential_bound(round_count: u32, delta_a0: u32, delta_b0: u32) -> (u32, Vec<TrailStep>) {
    let mut delta_a = delta_a0;
    let mut delta_b = delta_b0;
    let mut total_weight = 0u32;
    let mut trail = Vec::with_capacity(round_count as usize);

    for round in 1..=round_count {
        let mut round_weight = 0u32;

        let t0 = addition_input_term(delta_a);
        let (gamma1, w_add0) = find_optimal_gamma_with_weight(delta_b, t0, 32);
        round_weight += w_add0.unwrap_or(0);
        let delta_b1 = gamma1;

        let (delta_a1, w_sub0) = greedy_subtract_const(delta_a, RC[1]);
        round_weight += w_sub0;

        let (delta_a2, delta_b2) = mix_stage_one(delta_a1, delta_b1);

        let inj_b = affine_transition(f_b, delta_b2);
        let delta_i_b = inj_b.offset;
        round_weight += inj_b.rank;
        let delta_a3 = delta_a2 ^ delta_i_b;

        let delta_b3 = l1(delta_b2);

        let t1 = addition_input_term(delta_b3);
        let (gamma2, w_add1) = find_optimal_gamma_with_weight(delta_a3, t1, 32);
        round_weight += w_add1.unwrap_or(0);
        let delta_a4 = gamma2;

        let (delta_b4, w_sub1) = greedy_subtract_const(delta_b3, RC[6]);
        round_weight += w_sub1;

        let (delta_b5, delta_a5) = mix_stage_two(delta_b4, delta_a4);

        let inj_a = affine_transition(f_a, delta_a5);
        let delta_i_a = inj_a.offset;
        round_weight += inj_a.rank;
        let delta_b6 = delta_b5 ^ delta_i_a;

        total_weight += round_weight;
        delta_a = delta_a5;
        delta_b = delta_b6;

        trail.push(TrailStep { round, weight: round_weight, delta_a, delta_b });
    }

    (total_weight, trail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_trail_of_the_requested_length() {
        let (weight, trail) = greedy_differential_bound(3, 0x1, 0x0);
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.last().unwrap().round, 3);
        let recomputed: u32 = trail.iter().map(|s| s.weight).sum();
        assert_eq!(recomputed, weight);
    }

    #[test]
    fn zero_round_count_yields_zero_weight() {
        let (weight, trail) = greedy_differential_bound(0, 0x1, 0x0);
        assert_eq!(weight, 0);
        assert!(trail.is_empty());
    }
}
