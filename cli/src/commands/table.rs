//! `table` subcommand: build a pDDT or cLAT table and print summary
//! statistics.

use anyhow::Result;
use clap::{Args, Subcommand};

use neoalzette_autosearch::tables::clat::ClatTable;
use neoalzette_autosearch::tables::pddt::{build_pddt, PddtConfig};

#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(subcommand)]
    kind: TableKind,
}

#[derive(Subcommand, Debug)]
enum TableKind {
    /// Build a partial DDT.
    Pddt {
        /// Bit width.
        #[arg(long, default_value_t = 32)]
        bit_width: u32,
        /// Maximum admitted weight.
        #[arg(long, default_value_t = 7)]
        weight_threshold: u32,
        /// Hard cap on table size; `0` means unbounded.
        #[arg(long, default_value_t = 1_000_000)]
        max_entries: usize,
    },
    /// Build a cLAT.
    Clat {
        /// Chunk bit width (4 or 8).
        #[arg(long, default_value_t = 8)]
        chunk_bits: u32,
    },
}

/// Runs the `table` subcommand.
pub fn run_table(args: &TableArgs) -> Result<()> {
    match args.kind {
        TableKind::Pddt { bit_width, weight_threshold, max_entries } => {
            let config = PddtConfig { bit_width, weight_threshold, max_entries };
            let entries = build_pddt(&config);
            let min_weight = entries.iter().map(|e| e.weight).min();
            let max_weight = entries.iter().map(|e| e.weight).max();
            println!("pDDT: bit_width={bit_width} weight_threshold={weight_threshold}");
            println!("  entries:    {}", entries.len());
            println!("  min_weight: {min_weight:?}");
            println!("  max_weight: {max_weight:?}");
        }
        TableKind::Clat { chunk_bits } => {
            let table = ClatTable::build(chunk_bits);
            let mask_size = 1u32 << chunk_bits;
            let mut total_entries = 0usize;
            let mut nonempty_buckets = 0usize;
            for v in 0..mask_size {
                for b in 0..2u32 {
                    let entries = table.entries(v, b);
                    if !entries.is_empty() {
                        nonempty_buckets += 1;
                        total_entries += entries.len();
                    }
                }
            }
            println!("cLAT: chunk_bits={chunk_bits}");
            println!("  buckets:         {}", mask_size as u64 * 2);
            println!("  nonempty_buckets: {nonempty_buckets}");
            println!("  total_entries:    {total_entries}");
        }
    }

    Ok(())
}
