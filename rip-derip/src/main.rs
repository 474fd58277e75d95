// 1. validate --input_file [must be a regular file], thresholds in [0, 1]
// 2. classify columns, restore RIP-mutated bases, fill the rest
// 3. print report to stdout, write consensus to --output_file

use clap::Parser;
use log::{error, info, Level};
use simple_logger::init_with_level;

use rip_derip::{cli::Args, get_derip_consensus};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    get_derip_consensus(&args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
