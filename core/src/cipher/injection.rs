//! Concrete cross-branch injectors `f_A`, `f_B` and the generic affine
//! transition builder used to turn a quadratic injector into a per-input
//! affine relation `D_delta f(x) = M x ^ c` over its differences.
//!
//! `f_A`/`f_B` are transcribed from `neoalzette_injection_constexpr.hpp`:
//! each folds in a nonlinear AND/OR term (`s_box_in_B`/`s_box_in_A`), which
//! is exactly why injections need a per-delta affine transition rather than
//! a single fixed linear matrix.

use crate::cipher::round::ROUND_CONSTANTS as RC;

#[inline]
const fn rotl(x: u32, n: u32) -> u32 {
    x.rotate_left(n)
}

#[inline]
const fn rotr(x: u32, n: u32) -> u32 {
    x.rotate_right(n)
}

fn diffusion_mask0(x: u32) -> u32 {
    let v0 = x;
    let v1 = v0 ^ rotl(v0, 2);
    let v2 = v0 ^ rotl(v1, 17);
    let v3 = v0 ^ rotl(v2, 4);
    let v4 = v3 ^ rotl(v3, 24);
    v2 ^ rotl(v4, 7)
}

fn diffusion_mask1(x: u32) -> u32 {
    let v0 = x;
    let v1 = v0 ^ rotr(v0, 2);
    let v2 = v0 ^ rotr(v1, 17);
    let v3 = v0 ^ rotr(v2, 4);
    let v4 = v3 ^ rotr(v3, 24);
    v2 ^ rotr(v4, 7)
}

fn cd_injection_from_b(b: u32, rc0: u32, rc1: u32) -> (u32, u32) {
    let mask0 = diffusion_mask0(b);
    let s_box_in_b = (b ^ RC[2]) ^ !(b & mask0);

    let mut c = b;
    let mut d = mask0 ^ rc0;

    let t = c ^ d;
    c ^= d ^ s_box_in_b;
    d ^= rotr(t, 16) ^ rc1;
    (c, d)
}

fn cd_injection_from_a(a: u32, rc0: u32, rc1: u32) -> (u32, u32) {
    let mask1 = diffusion_mask1(a);
    let s_box_in_a = (a ^ RC[7]) ^ !(a | mask1);

    let mut c = a;
    let mut d = mask1 ^ rc0;

    let t = c ^ d;
    c ^= d ^ s_box_in_a;
    d ^= rotl(t, 16) ^ rc1;
    (c, d)
}

/// `f_B(B) = rotl(C,24) ^ rotl(D,16)`, the B-branch injector.
#[must_use]
pub fn f_b(b: u32) -> u32 {
    let (c, d) = cd_injection_from_b(b, RC[2] | RC[3], RC[3]);
    rotl(c, 24) ^ rotl(d, 16)
}

/// `f_A(A) = rotl(C,24) ^ rotl(D,16)`, the A-branch injector.
#[must_use]
pub fn f_a(a: u32) -> u32 {
    let (c, d) = cd_injection_from_a(a, RC[7] & RC[8], RC[8]);
    rotl(c, 24) ^ rotl(d, 16)
}

/// The affine transition `D_delta f(x) = f(x) ^ f(x ^ delta) ^ f(0) ^ f(delta)`
/// wait, see struct doc: offset `c`, a GF(2) linear basis of reachable
/// output differences, and its rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffineTransition {
    /// `f(0) ^ f(delta)`: the output difference reached with every basis
    /// vector excluded from the XOR combination.
    pub offset: u32,
    /// GF(2) basis of the transition's linear part, in decreasing pivot-bit
    /// order (basis `[0]` has the highest pivot bit).
    pub basis: Vec<u32>,
    /// `basis.len()`.
    pub rank: u32,
}

impl AffineTransition {
    /// Inserts `value` into a high-bit-pivoting GF(2) basis in place, if it
    /// is linearly independent of the current basis. Returns whether it was
    /// inserted.
    fn insert(basis: &mut Vec<u32>, mut value: u32) -> bool {
        if value == 0 {
            return false;
        }
        for &b in basis.iter() {
            value = value.min(value ^ b);
        }
        if value == 0 {
            return false;
        }
        basis.push(value);
        basis.sort_unstable_by(|a, b| b.cmp(a));
        true
    }

    /// Number of reachable output differences, `2^rank` (saturates at
    /// `u64::MAX` for `rank >= 64`, which never occurs for 32-bit words).
    #[must_use]
    pub fn reachable_count(&self) -> u64 {
        1u64 << self.rank
    }

    /// Enumerates up to `cap` reachable output differences (iterative
    /// binary-tree traversal over the basis: at each depth, "don't use
    /// `basis[i]`" then "xor `basis[i]` into the accumulator"). `cap == 0`
    /// means exhaustive (`2^rank` outputs).
    #[must_use]
    pub fn enumerate(&self, cap: usize) -> Vec<u32> {
        if self.basis.is_empty() {
            return vec![self.offset];
        }

        let total = 1usize << self.basis.len().min(usize::BITS as usize - 1);
        let limit = if cap == 0 { total } else { cap.min(total) };

        let mut out = Vec::with_capacity(limit);
        let mut stack = vec![(0usize, self.offset)];
        while let Some((depth, acc)) = stack.pop() {
            if out.len() >= limit {
                break;
            }
            if depth == self.basis.len() {
                out.push(acc);
                continue;
            }
            // Push in reverse so "don't use" is explored before "use",
            // matching ascending enumeration order.
            stack.push((depth + 1, acc ^ self.basis[depth]));
            stack.push((depth + 1, acc));
        }
        out
    }
}

/// Precomputed evaluations of an injector `f` at `0` and at each standard
/// basis vector, enabling `O(32)` per-delta affine-transition construction
/// instead of re-evaluating `f` `O(n)` times per query.
pub struct InjectorTable {
    f0: u32,
    f_basis: [u32; 32],
}

impl InjectorTable {
    /// Builds the table for injector `f`.
    #[must_use]
    pub fn build(f: impl Fn(u32) -> u32) -> Self {
        let f0 = f(0);
        let mut f_basis = [0u32; 32];
        for (i, slot) in f_basis.iter_mut().enumerate() {
            *slot = f(1u32 << i);
        }
        Self { f0, f_basis }
    }

    /// Builds the affine transition `D_delta f` for the given input
    /// difference `delta`.
    #[must_use]
    pub fn transition(&self, f: impl Fn(u32) -> u32, delta: u32) -> AffineTransition {
        let f_delta = f(delta);
        let offset = self.f0 ^ f_delta;

        let mut basis = Vec::new();
        for i in 0..32u32 {
            let e_i = 1u32 << i;
            let f_ei = self.f_basis[i as usize];
            let f_ei_xor_delta = f(e_i ^ delta);
            let column = f_ei ^ f_ei_xor_delta ^ offset;
            AffineTransition::insert(&mut basis, column);
        }
        let rank = basis.len() as u32;

        AffineTransition { offset, basis, rank }
    }
}

/// Convenience: the affine transition of `f` at `delta`, rebuilding the
/// `f(0)`/`f(e_i)` table from scratch. Prefer [`InjectorTable`] when scoring
/// many deltas against the same injector.
#[must_use]
pub fn affine_transition(f: impl Fn(u32) -> u32 + Copy, delta: u32) -> AffineTransition {
    InjectorTable::build(f).transition(f, delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S4: the zero input difference always yields the trivial transition.
    #[test]
    fn zero_delta_is_trivial_for_f_b() {
        let t = affine_transition(f_b, 0);
        assert_eq!(t.offset, 0);
        assert!(t.basis.is_empty());
        assert_eq!(t.rank, 0);
        assert_eq!(t.enumerate(0), vec![0]);
    }

    #[test]
    fn zero_delta_is_trivial_for_f_a() {
        let t = affine_transition(f_a, 0);
        assert_eq!(t.offset, 0);
        assert_eq!(t.rank, 0);
    }

    #[test]
    fn enumerate_respects_cap() {
        let t = affine_transition(f_b, 0x1234_5678);
        if t.rank > 1 {
            let capped = t.enumerate(2);
            assert_eq!(capped.len(), 2);
        }
        // Exhaustive enumeration is only exercised for small rank; a near
        // full-rank injector would otherwise make this test allocate on the
        // order of 2^rank entries.
        if t.rank <= 16 {
            let all = t.enumerate(0);
            assert_eq!(all.len() as u64, t.reachable_count());
        }
    }

    #[test]
    fn enumerated_outputs_match_all_basis_subset_combinations() {
        let t = affine_transition(f_a, 0xAABB_CCDD);
        // Full subset enumeration is only tractable for small rank; cap the
        // basis used by this check rather than risk a combinatorial blowup
        // for deltas where the injector turns out to be near full rank.
        let checked_rank = t.basis.len().min(12);
        let basis = &t.basis[..checked_rank];
        let mut expected: Vec<u32> = (0u32..(1 << basis.len()))
            .map(|subset| {
                let mut acc = t.offset;
                for (i, &b) in t.basis.iter().enumerate() {
                    if (subset >> i) & 1 == 1 {
                        acc ^= b;
                    }
                }
                acc
            })
            .collect();
        let mut got = t.enumerate(0);
        expected.sort_unstable();
        got.sort_unstable();
        assert_eq!(expected, got);
    }
}
