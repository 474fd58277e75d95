use clap::{ArgAction, Parser};
use config::{ArgCheck, DEFAULT_CONSENSUS_NAME, MAX_GAPS, MAX_SNP_NOISE, MIN_RIP_LIKE};
use std::path::PathBuf;

use crate::core::engine::DeRipParams;

#[derive(Debug, Parser)]
#[command(name = "rip-derip")]
#[command(about = "Build a RIP-corrected consensus from a multiple sequence alignment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[arg(
        short = 'i',
        long = "input_file",
        required = true,
        value_name = "PATH",
        help = "Multiple sequence alignment FASTA file path"
    )]
    pub input_file: PathBuf,

    #[arg(
        short = 'o',
        long = "output_file",
        required = true,
        value_name = "PATH",
        help = "Output file"
    )]
    pub output_file: PathBuf,

    #[arg(
        short = 'n',
        long = "consensus_name",
        value_name = "NAME",
        default_value = DEFAULT_CONSENSUS_NAME,
        help = "Name of the consensus sequence"
    )]
    pub consensus_name: String,

    #[arg(
        long = "maxSNPnoise",
        visible_alias = "max-snp-noise",
        value_name = "PROP",
        default_value_t = MAX_SNP_NOISE,
        action = ArgAction::Set,
        help = "Maximum proportion of conflicting SNPs permitted before excluding column from RIP/deamination assessment"
    )]
    pub max_snp_noise: f64,

    #[arg(
        long = "minRIPlike",
        visible_alias = "min-rip-like",
        value_name = "PROP",
        default_value_t = MIN_RIP_LIKE,
        action = ArgAction::Set,
        help = "Minimum proportion of deamination events in RIP context required for column to be deRIPd in final sequence"
    )]
    pub min_rip_like: f64,

    #[arg(
        long = "maxGaps",
        visible_alias = "max-gaps",
        value_name = "PROP",
        default_value_t = MAX_GAPS,
        action = ArgAction::Set,
        help = "Maximum proportion of gaps in a column before considering it a gap in consensus"
    )]
    pub max_gaps: f64,

    #[arg(
        long = "reaminate",
        action = ArgAction::SetTrue,
        help = "Correct all deamination events independent of RIP context"
    )]
    pub reaminate: bool,

    #[arg(
        long = "fillindex",
        value_name = "INDEX",
        help = "Index of row to use for filling uncorrected positions"
    )]
    pub fill_index: Option<usize>,

    #[arg(
        long = "fillmaxgc",
        action = ArgAction::SetTrue,
        help = "Use sequence with highest GC content for filling if no row index is specified"
    )]
    pub fill_max_gc: bool,

    #[arg(
        long = "out-aln",
        value_name = "PATH",
        help = "Also write the input alignment with the gapped consensus appended"
    )]
    pub out_aln: Option<PathBuf>,

    #[arg(
        long = "mask",
        action = ArgAction::SetTrue,
        requires = "out_aln",
        help = "Mask corrected positions [Y: C>T, R: G>A] in --out-aln"
    )]
    pub mask: bool,

    #[arg(
        long = "summary",
        value_name = "PATH",
        help = "Write a JSON summary of corrected positions and per-row RIP counts"
    )]
    pub summary: Option<PathBuf>,
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }

    pub fn params(&self) -> DeRipParams {
        DeRipParams {
            max_snp_noise: self.max_snp_noise,
            min_rip_like: self.min_rip_like,
            max_gaps: self.max_gaps,
            reaminate: self.reaminate,
            fill_index: self.fill_index,
            fill_max_gc: self.fill_max_gc,
        }
    }
}

impl ArgCheck for Args {
    fn get_input(&self) -> &PathBuf {
        &self.input_file
    }

    fn get_thresholds(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("maxSNPnoise", self.max_snp_noise),
            ("minRIPlike", self.min_rip_like),
            ("maxGaps", self.max_gaps),
        ]
    }
}
