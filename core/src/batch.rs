//! Optional batch driver: runs several independent searches in parallel.
//!
//! Each request gets its own [`SearchContext`](crate::engine::SearchContext)
//! and initial difference/mask pair, so there is no shared mutable state
//! between them — correctness never depends on whether this actually runs
//! in parallel. Grounded on `examples/original_source/include/
//! auto_search_frame/test_neoalzette_differential_best_search.hpp`'s
//! "batch mode" commentary (thread-local injection caches sized to survive
//! multi-thread batch runs); this crate's version of that concern is simply
//! that every `SearchContext` already owns its own cache, so batching is
//! just a parallel `map` over independent calls.

use rayon::prelude::*;

use crate::engine::{search_differential, search_linear};
use crate::types::{SearchConfig, SearchResult};

/// Which search a [`BatchRequest`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDirection {
    /// Best XOR-differential trail (MEDCP).
    Differential,
    /// Best linear trail (MELCC).
    Linear,
}

/// One independent search request within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    /// Which search this request runs.
    pub direction: BatchDirection,
    /// Starting A-branch difference/mask.
    pub delta_a: u32,
    /// Starting B-branch difference/mask.
    pub delta_b: u32,
}

/// Runs every request against `config` in parallel (one `SearchContext` per
/// request), returning results in request order.
#[must_use]
pub fn run_batch(requests: &[BatchRequest], config: &SearchConfig) -> Vec<SearchResult> {
    requests
        .par_iter()
        .map(|request| match request.direction {
            BatchDirection::Differential => search_differential(request.delta_a, request.delta_b, config),
            BatchDirection::Linear => search_linear(request.delta_a, request.delta_b, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded_config(round_count: u32) -> SearchConfig {
        let mut cfg = SearchConfig::new(round_count)
            .with_addition_weight_cap(6)
            .with_subtraction_weight_cap(6)
            .with_max_nodes(50_000);
        cfg.max_subtraction_candidates = 16;
        cfg.max_injection_outputs = 16;
        cfg
    }

    #[test]
    fn batch_results_match_individual_calls() {
        let config = bounded_config(1);
        let requests = [
            BatchRequest { direction: BatchDirection::Differential, delta_a: 0x1, delta_b: 0x0 },
            BatchRequest { direction: BatchDirection::Differential, delta_a: 0x2, delta_b: 0x1 },
        ];

        let batched = run_batch(&requests, &config);
        assert_eq!(batched.len(), requests.len());
        for (request, result) in requests.iter().zip(batched.iter()) {
            let solo = search_differential(request.delta_a, request.delta_b, &config);
            assert_eq!(solo.best_weight, result.best_weight);
        }
    }
}
