//! Core module for RIP-corrected consensus building
//!
//! This module contains the main function for correcting Repeat-Induced
//! Point (RIP) mutations in a multiple sequence alignment.
//!
//! In short, every column of the alignment is classified as a gap, a
//! conserved base, a RIP-corrected base or a column left to be filled.
//! Columns holding both C and T (or G and A on the reverse strand) are
//! scanned for TpA dinucleotides, the footprint left behind when RIP
//! deaminates a CpA (or TpG). Columns with enough RIP-like events get
//! their ancestral base restored, the rest are copied from a fill row:
//! a user-chosen index, the GC-richest row, or the row with the fewest
//! RIP events.

pub mod engine;
pub mod report;

use anyhow::Result;
use config::ArgCheck;
use log::info;

use crate::cli::Args;
use engine::{DeRip, DeRipOutcome};

/// validate, correct, report to stdout and write the consensus
pub fn get_derip_consensus(args: &Args) -> Result<DeRipOutcome> {
    args.check()?;

    let engine = DeRip::from_path(&args.input_file, args.params())?;
    let outcome = engine.calculate_rip(&args.consensus_name)?;

    outcome.report(&mut std::io::stdout().lock())?;
    outcome.write_consensus(&args.output_file, &args.consensus_name)?;

    if let Some(path) = &args.out_aln {
        outcome.write_alignment(path, true, args.mask)?;
    }

    if let Some(path) = &args.summary {
        outcome.write_summary(path)?;
    }

    info!(
        "SUCCESS: {} columns repaired, consensus written to {}",
        outcome.corrected_positions.len(),
        args.output_file.display()
    );

    Ok(outcome)
}
