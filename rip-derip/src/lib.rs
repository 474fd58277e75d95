//! Core module for building RIP-corrected consensus sequences
//!
//! Reads a FASTA multiple sequence alignment, detects columns carrying
//! Repeat-Induced Point mutations, restores the ancestral bases and
//! writes the resulting consensus, together with a per-row report
//! of RIP events and a masked view of the alignment.

pub mod cli;
pub mod core;
pub mod utils;

pub use crate::core::engine::{DeRip, DeRipError, DeRipOutcome, DeRipParams};
pub use crate::core::get_derip_consensus;

pub fn lib_rip_derip(args: Vec<String>) -> anyhow::Result<()> {
    let args = cli::Args::from(args);
    crate::core::get_derip_consensus(&args)?;

    log::info!("SUCCESS: rip-derip ran succesfully!");
    Ok(())
}
