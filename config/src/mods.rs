use serde::Serialize;

use crate::GAP;

/// strand on which a deamination was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RipStrand {
    /// C->T, RIP context CpA -> TpA
    Forward,
    /// G->A, RIP context TpG -> TpA
    Reverse,
}

impl RipStrand {
    /// base restored in the consensus
    pub fn reference(&self) -> u8 {
        match self {
            RipStrand::Forward => b'C',
            RipStrand::Reverse => b'G',
        }
    }

    /// base left behind by the deamination
    pub fn mutant(&self) -> u8 {
        match self {
            RipStrand::Forward => b'T',
            RipStrand::Reverse => b'A',
        }
    }

    /// IUPAC symbol used when masking a deaminated base
    pub fn mask(&self) -> u8 {
        match self {
            RipStrand::Forward => crate::MASK_FORWARD,
            RipStrand::Reverse => crate::MASK_REVERSE,
        }
    }
}

impl std::fmt::Display for RipStrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RipStrand::Forward => write!(f, "C>T"),
            RipStrand::Reverse => write!(f, "G>A"),
        }
    }
}

#[inline(always)]
pub fn is_gap(base: u8) -> bool {
    base == GAP || base == b'.'
}

/// GC content over non-gap positions, 0 for an empty/all-gap sequence
pub fn gc_content(seq: &[u8]) -> f64 {
    let (gc, total) = seq
        .iter()
        .filter(|b| !is_gap(**b))
        .fold((0usize, 0usize), |(gc, total), b| match b.to_ascii_uppercase() {
            b'G' | b'C' => (gc + 1, total + 1),
            _ => (gc, total + 1),
        });

    if total == 0 {
        0.0
    } else {
        gc as f64 / total as f64
    }
}
