//! Wallen's Theta(log n) linear correlation weight for variable-variable
//! modular addition (FSE 2003, Lemma 7 + Theorem 1 + Theorem 2). Transcribed
//! from `linear_cor_add_logn.hpp`'s `linear_cor_add_wallen_logn`.

use crate::bitops::{cpm, eq};

/// Linear weight `HW(z)` of the approximation `u <- v, w` through a
/// variable-variable addition, or `None` if Theorem 1 rules it infeasible.
#[must_use]
pub fn linear_weight_add_varvar(u: u32, v: u32, w: u32) -> Option<u32> {
    // Lemma 7: C(u <- v, w) = C(u <-^carry v+u, w+u).
    let v_prime = v.wrapping_add(u);
    let w_prime = w.wrapping_add(u);

    let eq_vw = eq(v_prime, w_prime);
    let z = cpm(u, eq_vw, 32);

    if (v_prime & z) == 0 || (w_prime & z) == 0 {
        return None;
    }

    Some(z.count_ones())
}

/// Correlation magnitude `2^{-weight}` for [`linear_weight_add_varvar`], or
/// `0.0` when infeasible. The sign is not recovered; callers needing it must
/// use the exact transfer-matrix operators in `operators::linear_const`.
#[must_use]
pub fn linear_cor_add_varvar_magnitude(u: u32, v: u32, w: u32) -> f64 {
    match linear_weight_add_varvar(u, v, w) {
        None => 0.0,
        Some(weight) => 2f64.powi(-(weight as i32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::linear_const::corr_add_varvar;

    /// The magnitude of the logn algorithm's correlation must match the
    /// exact transfer-matrix correlation's absolute value.
    #[test]
    fn magnitude_matches_exact_transfer_matrix() {
        for u in [0u32, 1, 0x8000_0001, 0xAAAA_AAAA] {
            for v in [0u32, 3, 0x1234_5678] {
                for w in [0u32, 7, 0xFFFF_0000] {
                    let fast = linear_cor_add_varvar_magnitude(u, v, w);
                    let exact = corr_add_varvar(v, w, u, 32).abs();
                    assert!(
                        (fast - exact).abs() < 1e-9,
                        "u={u:#x} v={v:#x} w={w:#x}: fast={fast}, exact={exact}"
                    );
                }
            }
        }
    }
}
