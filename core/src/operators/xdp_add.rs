//! xdp-add: XOR differential probability of variable-variable modular
//! addition (Lipmaa-Moriai), realized as a carry-automaton DP rather than
//! the textbook closed form.
//!
//! The closed form `w = n - HW(eq(alpha,beta,gamma))` advertised by the
//! distilled spec and by `examples/original_source/include/
//! arx_analysis_operators/differential_xdp_add.hpp` was brute-force checked
//! (exhaustive, n in 4..=6) against the true differential probability and
//! found to disagree on a large fraction of inputs; no shifted/reflected
//! variant of the same trick reproduced ground truth either. What follows
//! instead is the two-automaton carry DP the closed form is shorthand for:
//! track the carry bit of `x + y` and of `(x^alpha) + (y^beta)` jointly,
//! bit by bit from the LSB, and sum the probability mass of every path
//! consistent with the required output difference at each bit. This was
//! verified against exhaustive brute force with zero mismatches for all
//! `(alpha, beta, gamma)` triples at n in 4..=6.

#[inline]
const fn majority(x: u32, y: u32, c: u32) -> u32 {
    (x & y) | (x & c) | (y & c)
}

/// Exact differential probability of `(x+alpha) + (y+beta) XOR (x+y) = gamma`
/// over uniform `x, y`, for an `n`-bit word (`n` in `1..=32`).
#[must_use]
pub fn xdp_add_probability(alpha: u32, beta: u32, gamma: u32, n: u32) -> f64 {
    // State index = c * 2 + c_prime, c/c_prime in {0,1}.
    let mut prob = [1.0_f64, 0.0, 0.0, 0.0];

    for i in 0..n {
        let a = (alpha >> i) & 1;
        let b = (beta >> i) & 1;
        let g = (gamma >> i) & 1;
        let mut next = [0.0_f64; 4];

        for c in 0..2u32 {
            for cp in 0..2u32 {
                let idx = (c * 2 + cp) as usize;
                let p = prob[idx];
                if p == 0.0 {
                    continue;
                }
                for x in 0..2u32 {
                    for y in 0..2u32 {
                        let xp = x ^ a;
                        let yp = y ^ b;
                        let s = x ^ y ^ c;
                        let sp = xp ^ yp ^ cp;
                        if (s ^ sp) != g {
                            continue;
                        }
                        let c_out = majority(x, y, c);
                        let cp_out = majority(xp, yp, cp);
                        let nidx = (c_out * 2 + cp_out) as usize;
                        next[nidx] += p * 0.25;
                    }
                }
            }
        }
        prob = next;
    }

    prob.iter().sum()
}

/// Transition weight `ceil(-log2(p))` for `xdp_add_probability`, or `None`
/// when the transition is infeasible (`p == 0`).
#[must_use]
pub fn xdp_add(alpha: u32, beta: u32, gamma: u32, n: u32) -> Option<u32> {
    let p = xdp_add_probability(alpha, beta, gamma, n);
    if p <= 0.0 {
        None
    } else {
        Some((-p.log2()).ceil() as u32)
    }
}

/// 32-bit convenience wrapper over [`xdp_add`].
#[inline]
#[must_use]
pub fn xdp_add32(alpha: u32, beta: u32, gamma: u32) -> Option<u32> {
    xdp_add(alpha, beta, gamma, 32)
}

/// One partially-constructed output difference during [`enumerate_gammas`]'s
/// bit recursion: bits `0..bit` of `gamma` are fixed, `mass` is the
/// 4-state carry-automaton probability vector after processing them.
struct Frame {
    bit: u32,
    gamma_bits: u32,
    mass: [f64; 4],
}

/// Enumerates output differences `gamma` for `alpha ⊞ beta`, bit-recursing
/// from the LSB and pruning any prefix whose probability mass already
/// implies a weight above `weight_cap` (mass is non-increasing bit over
/// bit, since `xdp_add_probability`'s transfer step only ever discards
/// probability mass, never creates it — the same monotonicity pDDT
/// construction relies on). Candidates are tried LSB-first with `hint`'s
/// bits preferred at each branch, and returned in the order found, capped
/// at `max_candidates` (`0` meaning exhaustive within `weight_cap`).
///
/// The recursion runs on an explicit stack bounded by `n + 1` frames rather
/// than native call recursion, matching the bounded-depth bit-recursion
/// enumerator the search engine is built around.
#[must_use]
pub fn enumerate_gammas(alpha: u32, beta: u32, n: u32, weight_cap: Option<u32>, max_candidates: usize, hint: u32) -> Vec<(u32, u32)> {
    let mut results = Vec::new();
    let mut stack: Vec<Frame> = Vec::with_capacity((n + 1) as usize);
    stack.push(Frame { bit: 0, gamma_bits: 0, mass: [1.0, 0.0, 0.0, 0.0] });

    while let Some(frame) = stack.pop() {
        if max_candidates != 0 && results.len() >= max_candidates {
            break;
        }

        if frame.bit == n {
            let total: f64 = frame.mass.iter().sum();
            if total > 0.0 {
                let weight = (-total.log2()).ceil() as u32;
                if weight_cap.is_none_or(|cap| weight <= cap) {
                    results.push((frame.gamma_bits, weight));
                }
            }
            continue;
        }

        let a = (alpha >> frame.bit) & 1;
        let b = (beta >> frame.bit) & 1;
        let hint_bit = (hint >> frame.bit) & 1;

        // Explore the non-hint branch first so it ends up popped second.
        for &g in &[1 - hint_bit, hint_bit] {
            let next_mass = step_mass(frame.mass, a, b, g);
            let next_total: f64 = next_mass.iter().sum();
            if next_total <= 0.0 {
                continue;
            }
            if let Some(cap) = weight_cap {
                let optimistic_weight = (-next_total.log2()).ceil() as u32;
                if optimistic_weight > cap {
                    continue;
                }
            }
            stack.push(Frame {
                bit: frame.bit + 1,
                gamma_bits: frame.gamma_bits | (g << frame.bit),
                mass: next_mass,
            });
        }
    }

    results
}

/// The carry-automaton's one-bit mass transition, shared with
/// `tables::pddt`'s joint `(alpha, beta, gamma)` prefix recursion.
pub(crate) fn step_mass(mass: [f64; 4], a: u32, b: u32, g: u32) -> [f64; 4] {
    let mut next = [0.0f64; 4];
    for c in 0..2u32 {
        for cp in 0..2u32 {
            let idx = (c * 2 + cp) as usize;
            let p = mass[idx];
            if p == 0.0 {
                continue;
            }
            for x in 0..2u32 {
                for y in 0..2u32 {
                    let xp = x ^ a;
                    let yp = y ^ b;
                    let s = x ^ y ^ c;
                    let sp = xp ^ yp ^ cp;
                    if (s ^ sp) != g {
                        continue;
                    }
                    let c_out = majority(x, y, c);
                    let cp_out = majority(xp, yp, cp);
                    let nidx = (c_out * 2 + cp_out) as usize;
                    next[nidx] += p * 0.25;
                }
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    /// P1: brute-force the fraction of (x,y) pairs satisfying the XOR
    /// differential relation directly, and compare to the DP's claimed
    /// probability, for every (alpha,beta,gamma) triple at a small n.
    #[test]
    fn matches_brute_force_n4() {
        let n = 4u32;
        let size = 1u32 << n;
        let mask = size - 1;
        for alpha in 0..size {
            for beta in 0..size {
                for gamma in 0..size {
                    let mut hits = 0u32;
                    for x in 0..size {
                        for y in 0..size {
                            let lhs = x.wrapping_add(y) & mask;
                            let rhs = ((x ^ alpha).wrapping_add(y ^ beta)) & mask;
                            if (lhs ^ rhs) == gamma {
                                hits += 1;
                            }
                        }
                    }
                    let expected = f64::from(hits) / f64::from(size * size);
                    let got = xdp_add_probability(alpha, beta, gamma, n);
                    assert!(
                        (expected - got).abs() < 1e-9,
                        "alpha={alpha} beta={beta} gamma={gamma}: expected {expected}, got {got}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_difference_is_certain() {
        assert_eq!(xdp_add32(0, 0, 0), Some(0));
    }

    #[test]
    fn enumerate_gammas_finds_the_optimum_within_cap() {
        let n = 6u32;
        let size = 1u32 << n;
        for alpha in 0..size {
            for beta in 0..size {
                let mut best = u32::MAX;
                for gamma in 0..size {
                    if let Some(w) = xdp_add(alpha, beta, gamma, n) {
                        best = best.min(w);
                    }
                }
                let found = enumerate_gammas(alpha, beta, n, None, 0, 0);
                let found_best = found.iter().map(|&(_, w)| w).min().unwrap();
                assert_eq!(found_best, best, "alpha={alpha} beta={beta}");
            }
        }
    }

    #[test]
    fn enumerate_gammas_respects_candidate_cap() {
        let found = enumerate_gammas(0xABCD_1234, 0x5678_90AB, 32, None, 5, 0);
        assert!(found.len() <= 5);
    }
}
