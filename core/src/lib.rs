//! # neoalzette-autosearch
//!
//! Branch-and-bound best-trail search for the NeoAlzette ARX primitive.
//!
//! Given an initial XOR-difference (or linear mask) pair and a round count,
//! this crate searches for the trail that minimizes total cryptographic
//! weight `w = -log2(p)`, i.e. maximizes the expected differential
//! characteristic probability (MEDCP) or the absolute linear characteristic
//! correlation (MELCC).
//!
//! ```rust
//! use neoalzette_autosearch::engine::differential::search_differential;
//! use neoalzette_autosearch::types::SearchConfig;
//!
//! let config = SearchConfig::new(2);
//! let result = search_differential(0x1, 0x0, &config);
//! assert!(result.found);
//! ```

// =============================================================================
// MODULES
// =============================================================================

#[cfg(feature = "multithread")]
pub mod batch;
pub mod bitops;
pub mod checkpoint;
pub mod cipher;
pub mod engine;
pub mod error;
pub mod operators;
pub mod tables;
pub mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use error::Error;
pub use types::{SearchConfig, SearchResult};

/// Convenience alias for fallible entry points.
pub type Result<T> = core::result::Result<T, Error>;
