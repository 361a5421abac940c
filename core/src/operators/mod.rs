//! L2 — ARX transition operators: leaf scoring functions returning a weight
//! or correlation for one algebraic step of the NeoAlzette round.

pub mod bv_weight;
pub mod linear_const;
pub mod linear_wallen;
pub mod optimal_gamma;
pub mod xdp_add;

/// Sentinel used internally by hot loops that cannot afford an `Option`
/// branch; never crosses a public function boundary.
pub(crate) const INFEASIBLE_SENTINEL: i64 = -1;
