//! Round constants, rotate-XOR linear layers, and the deterministic glue
//! steps of one NeoAlzette round. The weighted steps (additions,
//! constant-subtractions, injections) are scored by `crate::operators` and
//! enumerated by `crate::engine`; this module only supplies the pure,
//! total pieces a round is built from.

/// Sixteen fixed round constants, indexed `RC[0..=15]`.
pub const ROUND_CONSTANTS: [u32; 16] = [
    0x16B2_C40B,
    0xC117_176A,
    0x0F9A_2598,
    0xA156_3ACA,
    0x243F_6A88,
    0x85A3_08D3,
    0x1319_8102,
    0xE037_0734,
    0x9E37_79B9,
    0x7F4A_7C15,
    0xF39C_C060,
    0x5CED_C834,
    0xB7E1_5162,
    0x8AED_2A6A,
    0xBF71_5880,
    0x9CF4_F3C7,
];

/// Cross-branch rotation amount used by the first XOR/rotate mixing stage.
pub const R0: u32 = 24;
/// Cross-branch rotation amount used by the second XOR/rotate mixing stage.
pub const R1: u32 = 16;

#[inline]
const fn rotl(x: u32, n: u32) -> u32 {
    x.rotate_left(n)
}

#[inline]
const fn rotr(x: u32, n: u32) -> u32 {
    x.rotate_right(n)
}

/// `L1(x) = x ^ rotl(x,2) ^ rotl(x,10) ^ rotl(x,18) ^ rotl(x,24)`.
#[must_use]
pub const fn l1(x: u32) -> u32 {
    x ^ rotl(x, 2) ^ rotl(x, 10) ^ rotl(x, 18) ^ rotl(x, 24)
}

/// `L2(x) = x ^ rotl(x,8) ^ rotl(x,14) ^ rotl(x,22) ^ rotl(x,30)`.
#[must_use]
pub const fn l2(x: u32) -> u32 {
    x ^ rotl(x, 8) ^ rotl(x, 14) ^ rotl(x, 22) ^ rotl(x, 30)
}

/// Uppercase re-exports matching the names used in round-stage descriptions.
#[allow(non_upper_case_globals)]
pub const L1: fn(u32) -> u32 = l1;
#[allow(non_upper_case_globals)]
pub const L2: fn(u32) -> u32 = l2;

/// Transpose of [`l1`] for linear-mask propagation: since `l1` is a sum of
/// rotation permutation matrices, its transpose swaps every `rotl` for the
/// corresponding `rotr`.
#[must_use]
pub const fn l1_transpose(x: u32) -> u32 {
    x ^ rotr(x, 2) ^ rotr(x, 10) ^ rotr(x, 18) ^ rotr(x, 24)
}

/// Transpose of [`l2`].
#[must_use]
pub const fn l2_transpose(x: u32) -> u32 {
    x ^ rotr(x, 8) ^ rotr(x, 14) ^ rotr(x, 22) ^ rotr(x, 30)
}

/// `T0 = rotl(x,31) ^ rotl(x,17)` — the pre-addition diffusion term feeding
/// both the first and (with a different input) second addition stage.
#[must_use]
pub const fn addition_input_term(x: u32) -> u32 {
    rotl(x, 31) ^ rotl(x, 17)
}

/// Transpose of [`addition_input_term`].
#[must_use]
pub const fn addition_input_term_transpose(x: u32) -> u32 {
    rotr(x, 31) ^ rotr(x, 17)
}

/// First XOR/rotate mixing stage: `(delta_a2, delta_b2)` from
/// `(delta_a1, delta_b1)`.
#[must_use]
pub const fn mix_stage_one(delta_a1: u32, delta_b1: u32) -> (u32, u32) {
    let delta_a2 = delta_a1 ^ rotl(delta_b1, R0);
    let delta_b2 = delta_b1 ^ rotl(delta_a2, R1);
    (delta_a2, delta_b2)
}

/// Second XOR/rotate mixing stage: `(delta_b5, delta_a5)` from
/// `(delta_b4, delta_a4)`.
#[must_use]
pub const fn mix_stage_two(delta_b4: u32, delta_a4: u32) -> (u32, u32) {
    let delta_b5 = delta_b4 ^ rotl(delta_a4, R0);
    let delta_a5 = delta_a4 ^ rotl(delta_b5, R1);
    (delta_b5, delta_a5)
}

/// Transpose of [`mix_stage_one`] for linear-mask propagation: takes the
/// output masks `(mask_a2, mask_b2)` back to the input masks
/// `(mask_a1, mask_b1)` they were induced by. Derived by writing
/// `mix_stage_one` as a 2x2 block matrix of rotation operators (which
/// commute and whose transpose is the opposite-direction rotation) and
/// transposing it.
#[must_use]
pub const fn mix_stage_one_transpose(mask_a2: u32, mask_b2: u32) -> (u32, u32) {
    let mask_a1 = mask_a2 ^ rotr(mask_b2, R1);
    let mask_b1 = rotr(mask_a2, R0) ^ mask_b2 ^ rotr(mask_b2, R0 + R1);
    (mask_a1, mask_b1)
}

/// Transpose of [`mix_stage_two`]: output masks `(mask_b5, mask_a5)` back to
/// input masks `(mask_b4, mask_a4)`.
#[must_use]
pub const fn mix_stage_two_transpose(mask_b5: u32, mask_a5: u32) -> (u32, u32) {
    let mask_b4 = mask_b5 ^ rotr(mask_a5, R1);
    let mask_a4 = rotr(mask_b5, R0) ^ mask_a5 ^ rotr(mask_a5, R0 + R1);
    (mask_b4, mask_a4)
}

/// Output pair of the A and B branches after one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundDelta {
    /// A-branch difference or mask.
    pub delta_a: u32,
    /// B-branch difference or mask.
    pub delta_b: u32,
}

/// The deterministic tail of one forward round, taken from the point where
/// the first injection output `delta_i_b` is already known through to the
/// round boundary: first linear layer, second addition input term, second
/// mixing stage, and second injection XOR. Used by the search engine to
/// replay the glue between weighted stages, and by tests/the verification
/// harness to confirm a committed trail's steps actually chain.
#[must_use]
pub const fn round_tail(delta_a2: u32, delta_b2: u32, delta_i_b: u32) -> (u32, u32) {
    let delta_a3 = delta_a2 ^ delta_i_b;
    let delta_b3 = l1(delta_b2);
    (delta_a3, delta_b3)
}

/// Composes the final round boundary from the second mixing stage's inputs
/// and the second injection output.
#[must_use]
pub const fn round_boundary(delta_b4: u32, delta_a4: u32, delta_i_a: u32) -> RoundDelta {
    let (delta_b5, delta_a5) = mix_stage_two(delta_b4, delta_a4);
    let delta_b6 = delta_b5 ^ delta_i_a;
    RoundDelta { delta_a: delta_a5, delta_b: delta_b6 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l1_l2_are_involutions_under_identity_difference() {
        assert_eq!(l1(0), 0);
        assert_eq!(l2(0), 0);
    }

    #[test]
    fn mix_stages_preserve_zero_difference() {
        assert_eq!(mix_stage_one(0, 0), (0, 0));
        assert_eq!(mix_stage_two(0, 0), (0, 0));
    }

    fn gf2_dot(a: (u32, u32), b: (u32, u32)) -> u32 {
        ((a.0 & b.0).count_ones() + (a.1 & b.1).count_ones()) & 1
    }

    /// A transpose `M^T` must satisfy `<Mx, y> = <x, M^T y>` for every
    /// `x, y` under the GF(2) bilinear form. Checked against a handful of
    /// pseudo-random mask pairs rather than exhaustively (2^64 pairs).
    #[test]
    fn mix_stage_one_transpose_satisfies_adjoint_identity() {
        let xs = [(0x1u32, 0u32), (0, 0x1), (0x8000_0001, 0x1234), (0xFFFF_FFFF, 0xA5A5_5A5A)];
        let ys = [(0x2u32, 0u32), (0, 0x80), (0x0000_FFFF, 0xDEAD_BEEF), (0x1111_1111, 0x2222_2222)];
        for &x in &xs {
            for &y in &ys {
                let mx = mix_stage_one(x.0, x.1);
                let mty = mix_stage_one_transpose(y.0, y.1);
                assert_eq!(gf2_dot(mx, y), gf2_dot(x, mty));
            }
        }
    }

    #[test]
    fn mix_stage_two_transpose_satisfies_adjoint_identity() {
        let xs = [(0x1u32, 0u32), (0, 0x1), (0x8000_0001, 0x1234), (0xFFFF_FFFF, 0xA5A5_5A5A)];
        let ys = [(0x2u32, 0u32), (0, 0x80), (0x0000_FFFF, 0xDEAD_BEEF), (0x1111_1111, 0x2222_2222)];
        for &x in &xs {
            for &y in &ys {
                let mx = mix_stage_two(x.0, x.1);
                let mty = mix_stage_two_transpose(y.0, y.1);
                assert_eq!(gf2_dot(mx, y), gf2_dot(x, mty));
            }
        }
    }

    #[test]
    fn l1_transpose_satisfies_adjoint_identity() {
        for &x in &[0x1u32, 0xDEAD_BEEF, 0xFFFF_FFFF, 0x8000_0001] {
            for &y in &[0x2u32, 0xABCD_1234, 0x0000_FFFF, 0x1111_1111] {
                assert_eq!((l1(x) & y).count_ones() & 1, (x & l1_transpose(y)).count_ones() & 1);
            }
        }
    }

    #[test]
    fn l2_transpose_satisfies_adjoint_identity() {
        for &x in &[0x1u32, 0xDEAD_BEEF, 0xFFFF_FFFF, 0x8000_0001] {
            for &y in &[0x2u32, 0xABCD_1234, 0x0000_FFFF, 0x1111_1111] {
                assert_eq!((l2(x) & y).count_ones() & 1, (x & l2_transpose(y)).count_ones() & 1);
            }
        }
    }
}
