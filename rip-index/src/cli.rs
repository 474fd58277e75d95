use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rip-index")]
#[command(about = "Per-sequence RIP product, substrate and composite indices")]
pub struct Args {
    #[arg(
        short = 'i',
        long = "input",
        required = true,
        value_name = "PATH",
        help = "FASTA file [aligned or not, gaps are ignored]"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        required = false,
        value_name = "PATH",
        help = "Output TSV file [default: stdout]"
    )]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}

impl ArgCheck for Args {
    fn get_input(&self) -> &PathBuf {
        &self.input
    }
}
