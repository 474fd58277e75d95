//! Shared configuration for the riptools suite
//!
//! Universal constants, default thresholds, argument validation and
//! small I/O helpers used by every rip-* tool.

mod fns;
mod mods;

pub use fns::*;
pub use mods::*;

// deRIP thresholds
pub const MAX_SNP_NOISE: f64 = 0.5;
pub const MIN_RIP_LIKE: f64 = 0.1;
pub const MAX_GAPS: f64 = 0.7;
pub const DEFAULT_CONSENSUS_NAME: &str = "derip_consensus";

// RIP index cutoffs [product >= 1.1, substrate <= 0.75]
pub const PRODUCT_INDEX_THRESHOLD: f64 = 1.1;
pub const SUBSTRATE_INDEX_THRESHOLD: f64 = 0.75;

// alignment
pub const MIN_ALIGNMENT_ROWS: usize = 2;
pub const FASTA_LINE_WIDTH: usize = 60;
pub const GAP: u8 = b'-';
pub const FA_NEEDLE: u8 = b'>';

// masking symbols [IUPAC]
pub const MASK_FORWARD: u8 = b'Y'; // C/T
pub const MASK_REVERSE: u8 = b'R'; // A/G

// file extensions
pub const FASTA_EXTENSIONS: [&str; 6] = ["fa", "fasta", "fna", "fas", "aln", "afa"];
pub const GZ_EXTENSION: &str = "gz";
