//! Error taxonomy for the search engine's external boundary.
//!
//! Only [`Error::InvalidArgument`] is ever returned as a hard `Err` from a
//! public entry point. The remaining kinds are cooperative/internal: they are
//! folded into [`crate::types::SearchResult`] or handled in place exactly as
//! described by the module that owns them, never thrown across the search
//! boundary.

use thiserror::Error as ThisError;

/// Error kinds surfaced at the crate's external boundary.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operator was asked to score a transition that admits no valid
    /// realization. Recovered locally by the caller (skip the candidate);
    /// this variant exists only for APIs that must report it explicitly.
    #[error("infeasible transition")]
    Infeasible,

    /// The search exhausted its configured node budget before converging.
    #[error("node budget exhausted after {nodes_visited} nodes")]
    BudgetExhausted {
        /// Nodes visited before the budget was crossed.
        nodes_visited: u64,
    },

    /// The search exceeded its configured wall-clock budget.
    #[error("time budget of {budget_secs}s exceeded")]
    TimeLimit {
        /// Configured budget, in seconds.
        budget_secs: u64,
    },

    /// The process-wide memory governor signalled pressure; per-thread
    /// caches were disabled and cleared. Correctness is unaffected.
    #[error("resource pressure observed, caches disabled")]
    ResourcePressure,

    /// A caller-supplied argument is structurally invalid (e.g. a zero
    /// round count, or a bit width outside `1..=64`). Rejected before any
    /// search begins; the CLI maps this to exit code 2.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded allocation (cache, memoization table) reported itself over
    /// capacity. Handled identically to [`Error::ResourcePressure`].
    #[error("allocation failure, continuing without cache")]
    AllocationFailure,
}
