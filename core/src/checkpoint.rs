//! Plain-text checkpoint writer/reader for the search engine's optional
//! checkpoint sink. One trail per block, blocks separated by a blank line.

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{SearchResult, TrailStep};

/// One checkpointed trail, as read back from a checkpoint file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointBlock {
    /// Unix timestamp (seconds) recorded by the writer.
    pub timestamp_local: u64,
    /// Free-text reason the checkpoint was written (e.g. `"improved"`).
    pub reason: String,
    /// Number of rounds in the search this trail came from.
    pub rounds: u32,
    /// Starting A-branch difference/mask, hex-encoded in the file.
    pub start_delta_a: u32,
    /// Starting B-branch difference/mask, hex-encoded in the file.
    pub start_delta_b: u32,
    /// Weight of the trail at the time of writing.
    pub best_weight: u32,
    /// Nodes visited by the search at the time of writing.
    pub nodes_visited: u64,
    /// Elapsed seconds since the search began.
    pub elapsed_sec: f64,
    /// Per-round steps of the trail.
    pub trail_steps: Vec<TrailStep>,
}

/// Appends one checkpoint block for `result` to the file at `path`, creating
/// it if absent. Intended to be called only on monotonic best-weight
/// improvements; this function itself performs no such check.
pub fn append(
    path: impl AsRef<Path>,
    reason: &str,
    round_count: u32,
    start_delta_a: u32,
    start_delta_b: u32,
    elapsed_sec: f64,
    result: &SearchResult,
) -> io::Result<()> {
    let Some(best_weight) = result.best_weight else {
        return Ok(());
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let timestamp_local = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    writeln!(file, "timestamp_local={timestamp_local}")?;
    writeln!(file, "reason={reason}")?;
    writeln!(file, "rounds={round_count}")?;
    writeln!(file, "start_delta_a=0x{start_delta_a:08x}")?;
    writeln!(file, "start_delta_b=0x{start_delta_b:08x}")?;
    writeln!(file, "best_weight={best_weight}")?;
    writeln!(file, "nodes_visited={}", result.nodes_visited)?;
    writeln!(file, "elapsed_sec={elapsed_sec}")?;
    writeln!(file, "trail_steps={}", result.best_trail.len())?;
    for step in &result.best_trail {
        writeln!(
            file,
            "R{}: weight={} delta_a=0x{:08x} delta_b=0x{:08x}",
            step.round, step.weight, step.delta_a, step.delta_b
        )?;
    }
    writeln!(file)?;

    Ok(())
}

/// Parses every checkpoint block out of a checkpoint file, in file order.
pub fn read_all(path: impl AsRef<Path>) -> io::Result<Vec<CheckpointBlock>> {
    let file = std::fs::File::open(path)?;
    let reader = io::BufReader::new(file);

    let mut blocks = Vec::new();
    let mut lines = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            if !lines.is_empty() {
                if let Some(block) = parse_block(&lines) {
                    blocks.push(block);
                }
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        if let Some(block) = parse_block(&lines) {
            blocks.push(block);
        }
    }

    Ok(blocks)
}

fn parse_block(lines: &[String]) -> Option<CheckpointBlock> {
    let mut timestamp_local = 0u64;
    let mut reason = String::new();
    let mut rounds = 0u32;
    let mut start_delta_a = 0u32;
    let mut start_delta_b = 0u32;
    let mut best_weight = 0u32;
    let mut nodes_visited = 0u64;
    let mut elapsed_sec = 0.0f64;
    let mut trail_steps = Vec::new();

    for line in lines {
        if let Some(rest) = line.strip_prefix("R") {
            if let Some((head, body)) = rest.split_once(':') {
                let round: u32 = head.trim().parse().ok()?;
                let mut weight = 0u32;
                let mut delta_a = 0u32;
                let mut delta_b = 0u32;
                for field in body.split_whitespace() {
                    if let Some(v) = field.strip_prefix("weight=") {
                        weight = v.parse().ok()?;
                    } else if let Some(v) = field.strip_prefix("delta_a=0x") {
                        delta_a = u32::from_str_radix(v, 16).ok()?;
                    } else if let Some(v) = field.strip_prefix("delta_b=0x") {
                        delta_b = u32::from_str_radix(v, 16).ok()?;
                    }
                }
                trail_steps.push(TrailStep { round, weight, delta_a, delta_b });
                continue;
            }
        }

        let (key, value) = line.split_once('=')?;
        match key {
            "timestamp_local" => timestamp_local = value.parse().ok()?,
            "reason" => reason = value.to_string(),
            "rounds" => rounds = value.parse().ok()?,
            "start_delta_a" => start_delta_a = u32::from_str_radix(value.trim_start_matches("0x"), 16).ok()?,
            "start_delta_b" => start_delta_b = u32::from_str_radix(value.trim_start_matches("0x"), 16).ok()?,
            "best_weight" => best_weight = value.parse().ok()?,
            "nodes_visited" => nodes_visited = value.parse().ok()?,
            "elapsed_sec" => elapsed_sec = value.parse().ok()?,
            "trail_steps" => {}
            _ => {}
        }
    }

    Some(CheckpointBlock {
        timestamp_local,
        reason,
        rounds,
        start_delta_a,
        start_delta_b,
        best_weight,
        nodes_visited,
        elapsed_sec,
        trail_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn roundtrips_a_single_block() {
        let path = temp_dir().join(format!("neoalzette-checkpoint-test-{}.txt", std::process::id()));
        let result = SearchResult {
            found: true,
            best_weight: Some(7),
            best_trail: vec![TrailStep { round: 1, weight: 7, delta_a: 0x1, delta_b: 0x2 }],
            nodes_visited: 42,
            hit_node_limit: false,
            hit_time_limit: false,
        };

        append(&path, "improved", 1, 0x1, 0x0, 0.5, &result).unwrap();
        let blocks = read_all(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].best_weight, 7);
        assert_eq!(blocks[0].nodes_visited, 42);
        assert_eq!(blocks[0].trail_steps.len(), 1);
        assert_eq!(blocks[0].trail_steps[0].delta_a, 0x1);
    }
}
