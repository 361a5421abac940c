//! L5 — optional precomputed tables: the pDDT/Matsui highways-and-country-
//! roads front end for differential search, and the cLAT/SLR front end for
//! linear search. Both are accelerants a caller may build once and reuse
//! across many searches; neither is required for `engine::differential`/
//! `engine::linear` to function, and building them is never on the default
//! path.

pub mod clat;
pub mod pddt;
