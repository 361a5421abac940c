//! The mutable state that lives for the duration of one top-level search
//! call: the trail under construction, the running best, visit counters,
//! and the memoization table.

use std::collections::HashMap;
use std::time::Instant;

use crate::types::{SearchConfig, TrailStep};

/// Packs `(delta_a, delta_b)` into a single memoization key.
#[inline]
#[must_use]
pub fn pack(delta_a: u32, delta_b: u32) -> u64 {
    (u64::from(delta_a) << 32) | u64::from(delta_b)
}

/// Per-call search state threaded through the DFS.
pub struct SearchContext<'a> {
    /// The configuration this search is running under.
    pub config: &'a SearchConfig,
    /// Trail steps committed so far on the current DFS path.
    pub trail: Vec<TrailStep>,
    /// Best total weight found so far.
    pub best_weight: u32,
    /// Trail achieving [`Self::best_weight`].
    pub best_trail: Vec<TrailStep>,
    /// Total DFS nodes visited (one increment per `explore` call).
    pub nodes_visited: u64,
    /// `(round_index, packed difference) -> lowest acc_weight seen there`.
    memo: HashMap<(u32, u64), u32>,
    started_at: Instant,
    /// Set once the node budget is crossed.
    pub hit_node_limit: bool,
    /// Set once the time budget is crossed.
    pub hit_time_limit: bool,
    /// The search's starting A-branch difference/mask, kept for checkpoint
    /// records.
    pub initial_delta_a: u32,
    /// The search's starting B-branch difference/mask, kept for checkpoint
    /// records.
    pub initial_delta_b: u32,
}

impl<'a> SearchContext<'a> {
    /// Creates a fresh context seeded with a greedy upper bound.
    #[must_use]
    pub fn new(config: &'a SearchConfig, seed_weight: u32, seed_trail: Vec<TrailStep>, initial_delta_a: u32, initial_delta_b: u32) -> Self {
        Self {
            config,
            trail: Vec::with_capacity(config.round_count as usize),
            best_weight: seed_weight,
            best_trail: seed_trail,
            nodes_visited: 0,
            memo: HashMap::new(),
            started_at: Instant::now(),
            hit_node_limit: false,
            hit_time_limit: false,
            initial_delta_a,
            initial_delta_b,
        }
    }

    /// Call once per DFS node entry. Updates counters and, every `2^18`
    /// nodes, samples the wall clock against the configured time budget.
    pub fn on_node_enter(&mut self) {
        self.nodes_visited += 1;

        if self.config.max_nodes != 0 && self.nodes_visited >= self.config.max_nodes {
            self.hit_node_limit = true;
        }

        if self.nodes_visited.trailing_zeros() >= 18 && self.config.max_seconds != 0 {
            let elapsed = self.started_at.elapsed().as_secs();
            if elapsed >= self.config.max_seconds {
                self.hit_time_limit = true;
            }
        }
    }

    /// Whether the DFS should stop unwinding immediately.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.hit_node_limit
            || self.hit_time_limit
            || self.config.target_weight.is_some_and(|target| self.best_weight <= target)
    }

    /// Seconds elapsed since this context was created.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Memoization lookup/insert: returns `true` if this `(depth, delta)`
    /// pair has already been visited at an accumulated weight `<=
    /// acc_weight` (meaning this branch cannot improve on a prior visit and
    /// should be pruned), else records the new weight and returns `false`.
    pub fn memo_prune(&mut self, depth: u32, delta_a: u32, delta_b: u32, acc_weight: u32) -> bool {
        if !self.config.memoize {
            return false;
        }
        let key = (depth, pack(delta_a, delta_b));
        match self.memo.get(&key) {
            Some(&seen) if seen <= acc_weight => true,
            _ => {
                self.memo.insert(key, acc_weight);
                false
            }
        }
    }

    /// Commits `trail` as the new best if `total_weight` improves on the
    /// current best.
    pub fn offer_best(&mut self, total_weight: u32, trail: &[TrailStep]) {
        if total_weight < self.best_weight {
            self.best_weight = total_weight;
            self.best_trail = trail.to_vec();
        }
    }
}
