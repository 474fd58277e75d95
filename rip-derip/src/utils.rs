use config::is_gap;

/// per-column symbol tally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BaseCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
    pub gaps: usize,
    pub other: usize,
}

impl BaseCounts {
    pub fn from_column<I: IntoIterator<Item = u8>>(column: I) -> Self {
        let mut counts = Self::default();

        for base in column {
            match base.to_ascii_uppercase() {
                b'A' => counts.a += 1,
                b'C' => counts.c += 1,
                b'G' => counts.g += 1,
                b'T' => counts.t += 1,
                b if is_gap(b) => counts.gaps += 1,
                _ => counts.other += 1,
            }
        }

        counts
    }

    /// number of rows tallied
    pub fn total(&self) -> usize {
        self.informative() + self.gaps + self.other
    }

    /// A/C/G/T only
    pub fn informative(&self) -> usize {
        self.a + self.c + self.g + self.t
    }

    pub fn get(&self, base: u8) -> usize {
        match base.to_ascii_uppercase() {
            b'A' => self.a,
            b'C' => self.c,
            b'G' => self.g,
            b'T' => self.t,
            _ => 0,
        }
    }

    pub fn gap_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.gaps as f64 / n as f64,
        }
    }

    /// the single informative base present in the column, if only one is
    pub fn conserved(&self) -> Option<u8> {
        let mut present = [b'A', b'C', b'G', b'T']
            .into_iter()
            .filter(|b| self.get(*b) > 0);

        match (present.next(), present.next()) {
            (Some(base), None) => Some(base),
            _ => None,
        }
    }

    /// fraction of informative bases that are neither `x` nor `y`
    pub fn noise_against(&self, x: u8, y: u8) -> f64 {
        let informative = self.informative();
        if informative == 0 {
            return 0.0;
        }

        let off = informative - self.get(x) - self.get(y);
        off as f64 / informative as f64
    }
}

/// first non-gap symbol downstream of `idx`
pub fn next_base(seq: &[u8], idx: usize) -> Option<u8> {
    seq.iter()
        .skip(idx + 1)
        .find(|b| !is_gap(**b))
        .map(|b| b.to_ascii_uppercase())
}

/// last non-gap symbol upstream of `idx`
pub fn prev_base(seq: &[u8], idx: usize) -> Option<u8> {
    seq.get(..idx)?
        .iter()
        .rev()
        .find(|b| !is_gap(**b))
        .map(|b| b.to_ascii_uppercase())
}
