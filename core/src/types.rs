//! L0 — configuration and result types shared by the differential and
//! linear search engines.

use serde::{Deserialize, Serialize};

/// A single weighted step of a committed trail: the round it belongs to,
/// the per-round weight, and the XOR-difference (or mask) pair at its
/// output boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailStep {
    /// 1-based round index this step closes.
    pub round: u32,
    /// Weight contributed by this round alone.
    pub weight: u32,
    /// Output A-branch difference/mask after this round.
    pub delta_a: u32,
    /// Output B-branch difference/mask after this round.
    pub delta_b: u32,
}

/// Search driver inputs: bundles every knob a top-level search call
/// accepts, plus logging verbosity and an optional checkpoint path so the
/// CLI can be a thin shell over this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of rounds to search, `>= 1`.
    pub round_count: u32,

    /// Per-addition weight cap; `0` means unbounded (`0..=31`).
    pub addition_weight_cap: u32,
    /// Per-subtraction weight cap; `0` means unbounded (`0..=32`).
    pub subtraction_weight_cap: u32,
    /// Maximum number of constant-subtraction candidates per node; `0` means
    /// exhaustive.
    pub max_subtraction_candidates: u32,
    /// Maximum number of injection outputs enumerated per node; `0` means
    /// exhaustive.
    pub max_injection_outputs: u32,

    /// Maximum number of DFS nodes to visit; `0` means unlimited.
    pub max_nodes: u64,
    /// Maximum wall-clock seconds to search; `0` means unlimited.
    pub max_seconds: u64,
    /// Stop as soon as a trail at or below this weight is found; `None`
    /// disables the early-exit target. Doubles as the linear search's
    /// correlation-threshold termination (found weight `<=` target means
    /// found `|correlation| >= 2^-target`).
    pub target_weight: Option<u32>,

    /// Candidates kept per modular-addition node during the backward linear
    /// search, after heuristic generation and exact scoring. Unused by the
    /// differential search.
    pub linear_candidate_k: usize,

    /// Enable the (round_index, packed difference) memoization table.
    pub memoize: bool,
    /// Enable pruning via a precomputed remaining-round lower-bound table.
    pub use_lower_bound: bool,
    /// Remaining-round lower bounds, indexed by rounds-left. `table[0]` must
    /// be `0`.
    pub lower_bound_table: Vec<u32>,

    /// Emit a `tracing` progress event roughly every `2^18` visited nodes
    /// when `true`.
    pub verbose: bool,

    /// Optional path to append checkpoint blocks to on every best-trail
    /// improvement.
    pub checkpoint_path: Option<String>,
}

impl SearchConfig {
    /// A minimal configuration for `round_count` rounds with every cap and
    /// budget unbounded.
    #[must_use]
    pub fn new(round_count: u32) -> Self {
        Self {
            round_count,
            ..Self::default()
        }
    }

    /// Builder-style setter for [`Self::addition_weight_cap`].
    #[must_use]
    pub fn with_addition_weight_cap(mut self, cap: u32) -> Self {
        self.addition_weight_cap = cap;
        self
    }

    /// Builder-style setter for [`Self::subtraction_weight_cap`].
    #[must_use]
    pub fn with_subtraction_weight_cap(mut self, cap: u32) -> Self {
        self.subtraction_weight_cap = cap;
        self
    }

    /// Builder-style setter for [`Self::max_nodes`].
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Builder-style setter for [`Self::max_seconds`].
    #[must_use]
    pub fn with_max_seconds(mut self, max_seconds: u64) -> Self {
        self.max_seconds = max_seconds;
        self
    }

    /// Builder-style setter for [`Self::target_weight`].
    #[must_use]
    pub fn with_target_weight(mut self, target: u32) -> Self {
        self.target_weight = Some(target);
        self
    }

    /// Builder-style setter for [`Self::linear_candidate_k`].
    #[must_use]
    pub fn with_linear_candidate_k(mut self, k: usize) -> Self {
        self.linear_candidate_k = k;
        self
    }

    /// Builder-style setter for [`Self::checkpoint_path`].
    #[must_use]
    pub fn with_checkpoint_path(mut self, path: impl Into<String>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            round_count: 1,
            addition_weight_cap: 0,
            subtraction_weight_cap: 0,
            max_subtraction_candidates: 0,
            max_injection_outputs: 0,
            max_nodes: 0,
            max_seconds: 0,
            target_weight: None,
            linear_candidate_k: 200,
            memoize: true,
            use_lower_bound: false,
            lower_bound_table: vec![0],
            verbose: false,
            checkpoint_path: None,
        }
    }
}

/// Search driver outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Whether any feasible trail was found at all.
    pub found: bool,
    /// Weight of the best trail found, or `None` if `found` is `false`.
    pub best_weight: Option<u32>,
    /// The best trail found, one entry per round, in round order.
    pub best_trail: Vec<TrailStep>,
    /// Total number of DFS nodes visited.
    pub nodes_visited: u64,
    /// Whether the node budget was hit before the search converged.
    pub hit_node_limit: bool,
    /// Whether the time budget was hit before the search converged.
    pub hit_time_limit: bool,
}

impl SearchResult {
    /// An empty, not-found result with zero nodes visited.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            found: false,
            best_weight: None,
            best_trail: Vec::new(),
            nodes_visited: 0,
            hit_node_limit: false,
            hit_time_limit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lower_bound_table_starts_at_zero() {
        assert_eq!(SearchConfig::default().lower_bound_table[0], 0);
    }

    #[test]
    fn builder_chains_apply() {
        let cfg = SearchConfig::new(4).with_max_nodes(1_000).with_target_weight(12);
        assert_eq!(cfg.round_count, 4);
        assert_eq!(cfg.max_nodes, 1_000);
        assert_eq!(cfg.target_weight, Some(12));
    }
}
