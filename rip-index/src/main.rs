//! Core module for calculating RIP indices on a set of sequences
//!
//! Reads a plain or gzipped FASTA file and writes one TSV line per
//! record with its RIP-relevant dinucleotide counts and indices.

use clap::Parser;
use log::{error, info, Level};
use simple_logger::init_with_level;

use rip_index::{cli::Args, core::calculate_indices};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    calculate_indices(&args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
