//! Per-sequence RIP indices
//!
//! For every FASTA record, counts the dinucleotides touched by Repeat-Induced
//! Point mutation and reports the product index (TpA/ApT), the substrate
//! index ((CpA+TpG)/(ApC+GpT)) and their difference, the composite index.
//! Sequences with a high product and a low substrate index are flagged as
//! RIP-affected.

pub mod cli;
pub mod core;

pub use crate::core::{DinucleotideCounts, IndexRow, RipIndex};

pub fn lib_rip_index(args: Vec<String>) -> anyhow::Result<()> {
    let args = cli::Args::from(args);
    crate::core::calculate_indices(&args)?;

    Ok(())
}
