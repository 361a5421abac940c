//! Standalone verification harness: runs scenarios S1-S6 end to end against
//! the built library, prints one PASS/FAIL line per scenario, and exits
//! non-zero on the first mismatch.
//!
//! Grounded on `examples/byt3forg3-Tachyon/verification/tachyon_stream.rs`'s
//! role as a thin, dependency-light binary sitting alongside the main crate
//! rather than inside its test suite.

use neoalzette_autosearch::cipher::injection::{affine_transition, f_a};
use neoalzette_autosearch::engine::search_differential;
use neoalzette_autosearch::operators::bv_weight::bv_weight;
use neoalzette_autosearch::operators::linear_const::corr_add_varvar;
use neoalzette_autosearch::operators::optimal_gamma::find_optimal_gamma_with_weight;
use neoalzette_autosearch::operators::xdp_add::{enumerate_gammas, xdp_add32};
use neoalzette_autosearch::tables::pddt::{build_pddt, PddtConfig};
use neoalzette_autosearch::types::SearchConfig;

struct Scenario {
    name: &'static str,
    run: fn() -> Result<(), String>,
}

fn s1_optimal_gamma_reference() -> Result<(), String> {
    let (gamma_star, weight) = find_optimal_gamma_with_weight(1, 1, 32);
    if weight != Some(1) {
        return Err(format!("expected weight 1 at the found optimal gamma, got {weight:?}"));
    }
    if xdp_add32(1, 1, gamma_star) != Some(1) {
        return Err(format!("xdp_add(1, 1, gamma*={gamma_star:#x}) disagrees with the reported weight"));
    }

    // Confirm gamma* is a true arg-max: enumerate every feasible gamma
    // (pruned-but-exhaustive bit recursion, not a 2^32 brute loop) and check
    // nothing beats it.
    let all = enumerate_gammas(1, 1, 32, None, 0, 0);
    let best_found = all.iter().map(|&(_, w)| w).min();
    if best_found != Some(1) {
        return Err(format!("exhaustive enumeration disagrees with optimal_gamma: best={best_found:?}"));
    }
    Ok(())
}

fn s2_bvweight_paper_example() -> Result<(), String> {
    let u = 0b1010001110u32;
    let v = 0b1010001010u32;
    let a = 0b1000101110u32;
    let weight = bv_weight(u, v, a);
    if weight != 2 {
        return Err(format!("expected weight 2, got {weight}"));
    }
    Ok(())
}

fn s3_linear_correlation_sanity() -> Result<(), String> {
    let corr = corr_add_varvar(0, 0, 0xDEAD_BEEF, 32);
    if (corr - 1.0).abs() > 1e-9 {
        return Err(format!("expected correlation 1.0, got {corr}"));
    }
    Ok(())
}

fn s4_injection_transition_empty() -> Result<(), String> {
    let t = affine_transition(f_a, 0);
    if t.offset != 0 || t.rank != 0 || !t.basis.is_empty() {
        return Err(format!("expected trivial transition, got offset={:#x} rank={}", t.offset, t.rank));
    }
    let enumerated = t.enumerate(0);
    if enumerated != vec![0] {
        return Err(format!("expected enumerator to emit exactly {{0}}, got {enumerated:?}"));
    }
    Ok(())
}

fn s5_best_differential_trail_memoization_agrees() -> Result<(), String> {
    let mut config_memo = SearchConfig::new(2)
        .with_addition_weight_cap(8)
        .with_subtraction_weight_cap(8)
        .with_max_nodes(500_000);
    config_memo.max_subtraction_candidates = 32;
    config_memo.max_injection_outputs = 32;
    let mut config_no_memo = config_memo.clone();
    config_no_memo.memoize = false;

    let with_memo = search_differential(0x1, 0x0, &config_memo);
    let without_memo = search_differential(0x1, 0x0, &config_no_memo);

    if !with_memo.found {
        return Err("expected a trail to be found".to_string());
    }
    if with_memo.best_weight != without_memo.best_weight {
        return Err(format!(
            "memoization changed best_weight: with={:?} without={:?}",
            with_memo.best_weight, without_memo.best_weight
        ));
    }
    Ok(())
}

fn s6_pddt_cardinality_monotonicity() -> Result<(), String> {
    let low = build_pddt(&PddtConfig { bit_width: 8, weight_threshold: 6, max_entries: 0 });
    let high = build_pddt(&PddtConfig { bit_width: 8, weight_threshold: 8, max_entries: 0 });
    if low.len() > high.len() {
        return Err(format!("pDDT(6) has {} entries, pDDT(8) has {} (expected <=)", low.len(), high.len()));
    }
    Ok(())
}

fn main() {
    let scenarios = [
        Scenario { name: "S1 optimal-gamma reference", run: s1_optimal_gamma_reference },
        Scenario { name: "S2 BvWeight paper example", run: s2_bvweight_paper_example },
        Scenario { name: "S3 linear correlation sanity", run: s3_linear_correlation_sanity },
        Scenario { name: "S4 injection transition empty", run: s4_injection_transition_empty },
        Scenario { name: "S5 best differential trail memoization agrees", run: s5_best_differential_trail_memoization_agrees },
        Scenario { name: "S6 pDDT cardinality monotonicity", run: s6_pddt_cardinality_monotonicity },
    ];

    let mut all_passed = true;
    for scenario in &scenarios {
        match (scenario.run)() {
            Ok(()) => println!("PASS  {}", scenario.name),
            Err(message) => {
                println!("FAIL  {}: {message}", scenario.name);
                all_passed = false;
            }
        }
    }

    if !all_passed {
        std::process::exit(1);
    }
}
