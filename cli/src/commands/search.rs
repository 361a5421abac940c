//! `search` subcommand: best differential or linear trail.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Deserialize;

use neoalzette_autosearch::engine::{search_differential, search_linear};
use neoalzette_autosearch::types::SearchConfig;
use neoalzette_autosearch::{checkpoint, Error};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Search for the best XOR-differential trail (MEDCP).
    Differential,
    /// Search for the best linear trail (MELCC).
    Linear,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Number of rounds to search.
    #[arg(long)]
    rounds: Option<u32>,

    /// Starting A-branch difference (differential) or output mask (linear),
    /// as hex (`0x...` prefix optional).
    #[arg(long, default_value = "0x1")]
    delta_a: String,

    /// Starting B-branch difference (differential) or output mask (linear),
    /// as hex (`0x...` prefix optional).
    #[arg(long, default_value = "0x0")]
    delta_b: String,

    /// Which search to run.
    #[arg(long, value_enum, default_value_t = Direction::Differential)]
    direction: Direction,

    /// Per-addition weight cap; `0` means unbounded.
    #[arg(long, default_value_t = 0)]
    addition_weight_cap: u32,

    /// Per-subtraction weight cap; `0` means unbounded.
    #[arg(long, default_value_t = 0)]
    subtraction_weight_cap: u32,

    /// Cap on constant-subtraction candidates per node; `0` means exhaustive.
    #[arg(long, default_value_t = 0)]
    max_subtraction_candidates: u32,

    /// Cap on injection outputs enumerated per node; `0` means exhaustive.
    #[arg(long, default_value_t = 0)]
    max_injection_outputs: u32,

    /// Cap on candidates kept per addition node during the linear search.
    #[arg(long, default_value_t = 200)]
    linear_candidate_k: usize,

    /// Maximum DFS nodes to visit; `0` means unlimited.
    #[arg(long, default_value_t = 0)]
    max_nodes: u64,

    /// Maximum wall-clock seconds to search; `0` means unlimited.
    #[arg(long, default_value_t = 0)]
    max_seconds: u64,

    /// Stop as soon as a trail at or below this weight is found.
    #[arg(long)]
    target_weight: Option<u32>,

    /// Disable (round, difference) memoization.
    #[arg(long)]
    no_memoize: bool,

    /// Append checkpoint blocks to this file on every best-trail improvement.
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Load all of the above from a TOML file instead; CLI flags are
    /// ignored when this is given.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Mirrors [`SearchArgs`] for the `--config` TOML file path.
#[derive(Deserialize)]
struct FileConfig {
    rounds: u32,
    #[serde(default = "default_delta_a")]
    delta_a: String,
    #[serde(default = "default_delta_b")]
    delta_b: String,
    #[serde(default = "default_direction")]
    direction: Direction,
    #[serde(default)]
    addition_weight_cap: u32,
    #[serde(default)]
    subtraction_weight_cap: u32,
    #[serde(default)]
    max_subtraction_candidates: u32,
    #[serde(default)]
    max_injection_outputs: u32,
    #[serde(default = "default_linear_candidate_k")]
    linear_candidate_k: usize,
    #[serde(default)]
    max_nodes: u64,
    #[serde(default)]
    max_seconds: u64,
    #[serde(default)]
    target_weight: Option<u32>,
    #[serde(default)]
    no_memoize: bool,
    #[serde(default)]
    checkpoint: Option<PathBuf>,
}

fn default_delta_a() -> String {
    "0x1".to_string()
}
fn default_delta_b() -> String {
    "0x0".to_string()
}
fn default_direction() -> Direction {
    Direction::Differential
}
fn default_linear_candidate_k() -> usize {
    200
}

fn parse_hex(s: &str) -> Result<u32> {
    let trimmed = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u32::from_str_radix(trimmed, 16).with_context(|| format!("invalid hex value: {s}"))
}

/// Runs the `search` subcommand.
pub fn run_search(args: &SearchArgs) -> Result<()> {
    let (direction, delta_a, delta_b, config) = if let Some(config_path) = &args.config {
        let text = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        let file: FileConfig = toml::from_str(&text).context("failed to parse config TOML")?;

        if file.rounds == 0 {
            return Err(Error::InvalidArgument("rounds must be >= 1".to_string()).into());
        }

        let mut search_config = SearchConfig::new(file.rounds)
            .with_addition_weight_cap(file.addition_weight_cap)
            .with_subtraction_weight_cap(file.subtraction_weight_cap)
            .with_linear_candidate_k(file.linear_candidate_k)
            .with_max_nodes(file.max_nodes)
            .with_max_seconds(file.max_seconds);
        search_config.max_subtraction_candidates = file.max_subtraction_candidates;
        search_config.max_injection_outputs = file.max_injection_outputs;
        search_config.memoize = !file.no_memoize;
        if let Some(target) = file.target_weight {
            search_config = search_config.with_target_weight(target);
        }
        if let Some(path) = &file.checkpoint {
            search_config = search_config.with_checkpoint_path(path.display().to_string());
        }

        (file.direction, parse_hex(&file.delta_a)?, parse_hex(&file.delta_b)?, search_config)
    } else {
        let rounds = args.rounds.ok_or_else(|| Error::InvalidArgument("--rounds is required without --config".to_string()))?;
        if rounds == 0 {
            return Err(Error::InvalidArgument("rounds must be >= 1".to_string()).into());
        }

        let mut search_config = SearchConfig::new(rounds)
            .with_addition_weight_cap(args.addition_weight_cap)
            .with_subtraction_weight_cap(args.subtraction_weight_cap)
            .with_linear_candidate_k(args.linear_candidate_k)
            .with_max_nodes(args.max_nodes)
            .with_max_seconds(args.max_seconds);
        search_config.max_subtraction_candidates = args.max_subtraction_candidates;
        search_config.max_injection_outputs = args.max_injection_outputs;
        search_config.memoize = !args.no_memoize;
        if let Some(target) = args.target_weight {
            search_config = search_config.with_target_weight(target);
        }
        if let Some(path) = &args.checkpoint {
            search_config = search_config.with_checkpoint_path(path.display().to_string());
        }

        (args.direction, parse_hex(&args.delta_a)?, parse_hex(&args.delta_b)?, search_config)
    };

    let started = Instant::now();
    let result = match direction {
        Direction::Differential => search_differential(delta_a, delta_b, &config),
        Direction::Linear => search_linear(delta_a, delta_b, &config),
    };
    let elapsed_sec = started.elapsed().as_secs_f64();

    if let Some(path) = &config.checkpoint_path {
        checkpoint::append(path, "final", config.round_count, delta_a, delta_b, elapsed_sec, &result)
            .with_context(|| format!("failed to write checkpoint: {path}"))?;
    }

    println!("direction:     {direction:?}");
    println!("found:         {}", result.found);
    match result.best_weight {
        Some(w) => println!("best_weight:   {w}"),
        None => println!("best_weight:   (none)"),
    }
    println!("nodes_visited: {}", result.nodes_visited);
    println!("hit_node_limit: {}", result.hit_node_limit);
    println!("hit_time_limit: {}", result.hit_time_limit);
    println!("elapsed_sec:   {elapsed_sec:.3}");
    for step in &result.best_trail {
        println!(
            "  R{}: weight={} delta_a=0x{:08x} delta_b=0x{:08x}",
            step.round, step.weight, step.delta_a, step.delta_b
        );
    }

    Ok(())
}
