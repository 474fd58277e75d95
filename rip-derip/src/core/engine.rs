use config::{
    gc_content, get_progress_bar, RipStrand, FASTA_LINE_WIDTH, MAX_GAPS, MAX_SNP_NOISE,
    MIN_RIP_LIKE,
};
use log::{debug, info};
use rip_index::RipIndex;
use rippack::{Alignment, PackError, Record};
use serde::Serialize;
use thiserror::Error;

use std::cmp::Ordering;
use std::path::Path;

use crate::utils::{next_base, prev_base, BaseCounts};

#[derive(Debug, Error)]
pub enum DeRipError {
    #[error("Fill index {index} is out of range for an alignment with {rows} rows")]
    FillIndexOutOfRange { index: usize, rows: usize },
    #[error(transparent)]
    Pack(#[from] PackError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeRipParams {
    pub max_snp_noise: f64,
    pub min_rip_like: f64,
    pub max_gaps: f64,
    pub reaminate: bool,
    pub fill_index: Option<usize>,
    pub fill_max_gc: bool,
}

impl Default for DeRipParams {
    fn default() -> Self {
        Self {
            max_snp_noise: MAX_SNP_NOISE,
            min_rip_like: MIN_RIP_LIKE,
            max_gaps: MAX_GAPS,
            reaminate: false,
            fill_index: None,
            fill_max_gc: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCall {
    Gap,
    Conserved(u8),
    Corrected(RipStrand),
    Unresolved,
}

/// rows carrying the mutant base of a column, split by RIP context
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeaminationScan {
    pub rip_rows: Vec<usize>,
    pub non_rip_rows: Vec<usize>,
}

impl DeaminationScan {
    pub fn events(&self) -> usize {
        self.rip_rows.len() + self.non_rip_rows.len()
    }

    pub fn rip_like_fraction(&self) -> f64 {
        match self.events() {
            0 => 0.0,
            n => self.rip_rows.len() as f64 / n as f64,
        }
    }

    /// every deaminated row, in row order
    pub fn deaminated_rows(&self) -> Vec<usize> {
        let mut rows = self
            .rip_rows
            .iter()
            .chain(self.non_rip_rows.iter())
            .copied()
            .collect::<Vec<_>>();
        rows.sort_unstable();
        rows
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssessment {
    pub call: ColumnCall,
    pub forward: Option<DeaminationScan>,
    pub reverse: Option<DeaminationScan>,
}

impl ColumnAssessment {
    fn fixed(call: ColumnCall) -> Self {
        Self {
            call,
            forward: None,
            reverse: None,
        }
    }

    fn scan(&self, strand: RipStrand) -> Option<&DeaminationScan> {
        match strand {
            RipStrand::Forward => self.forward.as_ref(),
            RipStrand::Reverse => self.reverse.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedPosition {
    pub column: usize,
    pub strand: RipStrand,
    pub base: char,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSummary {
    pub index: usize,
    pub id: String,
    pub rip_fwd: usize,
    pub rip_rev: usize,
    pub non_rip: usize,
    pub gc: f64,
    pub indices: RipIndex,
}

impl RowSummary {
    fn new(index: usize, record: &Record) -> Self {
        Self {
            index,
            id: record.id.clone(),
            rip_fwd: 0,
            rip_rev: 0,
            non_rip: 0,
            gc: gc_content(&record.seq),
            indices: RipIndex::from_seq(&record.seq),
        }
    }

    /// RIP-like events on both strands
    pub fn rip_total(&self) -> usize {
        self.rip_fwd + self.rip_rev
    }
}

/// Column-wise RIP correction over a fixed alignment
#[derive(Debug, Clone)]
pub struct DeRip {
    alignment: Alignment,
    params: DeRipParams,
}

impl DeRip {
    pub fn new(alignment: Alignment, params: DeRipParams) -> Self {
        Self { alignment, params }
    }

    pub fn from_path<P: AsRef<Path>>(path: P, params: DeRipParams) -> Result<Self, DeRipError> {
        Ok(Self::new(Alignment::from_path(path)?, params))
    }

    /// classify one column: gap, conserved, RIP-corrected or left for filling
    pub fn assess_column(&self, col: usize) -> ColumnAssessment {
        let column = self.alignment.column(col).collect::<Vec<u8>>();
        let counts = BaseCounts::from_column(column.iter().copied());

        if counts.gap_fraction() > self.params.max_gaps {
            return ColumnAssessment::fixed(ColumnCall::Gap);
        }

        if let Some(base) = counts.conserved() {
            return ColumnAssessment::fixed(ColumnCall::Conserved(base));
        }

        let forward = self.scan(col, &column, &counts, RipStrand::Forward);
        let reverse = self.scan(col, &column, &counts, RipStrand::Reverse);

        let fwd_candidate = forward.as_ref().is_some_and(|s| self.is_candidate(s));
        let rev_candidate = reverse.as_ref().is_some_and(|s| self.is_candidate(s));

        let call = match (fwd_candidate, rev_candidate) {
            (true, false) => ColumnCall::Corrected(RipStrand::Forward),
            (false, true) => ColumnCall::Corrected(RipStrand::Reverse),
            (true, true) => {
                let fwd = forward.as_ref().map_or(0, |s| s.rip_rows.len());
                let rev = reverse.as_ref().map_or(0, |s| s.rip_rows.len());

                match fwd.cmp(&rev) {
                    Ordering::Greater => ColumnCall::Corrected(RipStrand::Forward),
                    Ordering::Less => ColumnCall::Corrected(RipStrand::Reverse),
                    Ordering::Equal => {
                        debug!("Column {} is RIP-like on both strands, leaving it for filling", col);
                        ColumnCall::Unresolved
                    }
                }
            }
            (false, false) => ColumnCall::Unresolved,
        };

        ColumnAssessment {
            call,
            forward,
            reverse,
        }
    }

    // WARN: context is read from the uncorrected row
    fn scan(
        &self,
        col: usize,
        column: &[u8],
        counts: &BaseCounts,
        strand: RipStrand,
    ) -> Option<DeaminationScan> {
        let (reference, mutant) = (strand.reference(), strand.mutant());

        if counts.get(reference) == 0 || counts.get(mutant) == 0 {
            return None;
        }

        if counts.noise_against(reference, mutant) > self.params.max_snp_noise {
            return None;
        }

        let mut scan = DeaminationScan::default();
        for (row, base) in column.iter().enumerate() {
            if *base != mutant {
                continue;
            }

            let seq = &self.alignment.records()[row].seq;
            let in_context = match strand {
                RipStrand::Forward => next_base(seq, col) == Some(b'A'),
                RipStrand::Reverse => prev_base(seq, col) == Some(b'T'),
            };

            if in_context {
                scan.rip_rows.push(row);
            } else {
                scan.non_rip_rows.push(row);
            }
        }

        Some(scan)
    }

    fn is_candidate(&self, scan: &DeaminationScan) -> bool {
        self.params.reaminate || scan.rip_like_fraction() >= self.params.min_rip_like
    }

    /// row used to fill unresolved columns
    pub fn select_fill_row(&self, summary: &[RowSummary]) -> Result<usize, DeRipError> {
        if let Some(index) = self.params.fill_index {
            if index >= self.alignment.len() {
                return Err(DeRipError::FillIndexOutOfRange {
                    index,
                    rows: self.alignment.len(),
                });
            }
            return Ok(index);
        }

        let best = if self.params.fill_max_gc {
            summary
                .iter()
                .min_by(|a, b| by_gc_desc(a, b).then(a.index.cmp(&b.index)))
        } else {
            summary.iter().min_by(|a, b| {
                a.rip_total()
                    .cmp(&b.rip_total())
                    .then(by_gc_desc(a, b))
                    .then(a.index.cmp(&b.index))
            })
        };

        Ok(best.map(|row| row.index).unwrap_or(0))
    }

    /// run RIP detection and build the corrected consensus named `label`
    pub fn calculate_rip(&self, label: &str) -> Result<DeRipOutcome, DeRipError> {
        let width = self.alignment.width();
        let mut summary = self
            .alignment
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| RowSummary::new(i, record))
            .collect::<Vec<_>>();
        let mut masked = self.alignment.records().to_vec();
        let mut calls = Vec::with_capacity(width);
        let mut corrected_positions = Vec::new();

        let pb = get_progress_bar(width as u64, "Scanning columns");
        for col in 0..width {
            let assessment = self.assess_column(col);

            if let Some(scan) = &assessment.forward {
                scan.rip_rows.iter().for_each(|r| summary[*r].rip_fwd += 1);
                scan.non_rip_rows.iter().for_each(|r| summary[*r].non_rip += 1);
            }
            if let Some(scan) = &assessment.reverse {
                scan.rip_rows.iter().for_each(|r| summary[*r].rip_rev += 1);
                scan.non_rip_rows.iter().for_each(|r| summary[*r].non_rip += 1);
            }

            if let ColumnCall::Corrected(strand) = assessment.call {
                let rows = match assessment.scan(strand) {
                    Some(scan) if self.params.reaminate => scan.deaminated_rows(),
                    Some(scan) => scan.rip_rows.clone(),
                    None => Vec::new(),
                };

                for row in &rows {
                    masked[*row].seq[col] = strand.mask();
                }

                corrected_positions.push(CorrectedPosition {
                    column: col,
                    strand,
                    base: strand.reference() as char,
                    rows,
                });
            }

            calls.push(assessment.call);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let fill_index = self.select_fill_row(&summary)?;
        let fill_row = &self.alignment.records()[fill_index].seq;

        let gapped = calls
            .iter()
            .enumerate()
            .map(|(col, call)| match call {
                ColumnCall::Gap => config::GAP,
                ColumnCall::Conserved(base) => *base,
                ColumnCall::Corrected(strand) => strand.reference(),
                ColumnCall::Unresolved => fill_row[col],
            })
            .collect::<Vec<u8>>();

        let gapped_consensus = Record::new(label, &gapped);
        let consensus = Record::new(label, &gapped_consensus.ungapped());

        info!(
            "Columns: {} gapped, {} conserved, {} corrected, {} filled from row {} [{}]",
            calls.iter().filter(|c| **c == ColumnCall::Gap).count(),
            calls
                .iter()
                .filter(|c| matches!(c, ColumnCall::Conserved(_)))
                .count(),
            corrected_positions.len(),
            calls
                .iter()
                .filter(|c| **c == ColumnCall::Unresolved)
                .count(),
            fill_index,
            self.alignment.records()[fill_index].id
        );

        Ok(DeRipOutcome {
            label: label.to_string(),
            params: self.params,
            alignment: self.alignment.clone(),
            masked_alignment: Alignment::new(masked)?,
            gapped_consensus,
            consensus,
            corrected_positions,
            rip_summary: summary,
            fill_index,
        })
    }
}

fn by_gc_desc(a: &RowSummary, b: &RowSummary) -> Ordering {
    b.gc.partial_cmp(&a.gc).unwrap_or(Ordering::Equal)
}

/// Result of a RIP calculation over one alignment
#[derive(Debug, Clone)]
pub struct DeRipOutcome {
    pub label: String,
    pub params: DeRipParams,
    pub alignment: Alignment,
    pub masked_alignment: Alignment,
    pub gapped_consensus: Record,
    pub consensus: Record,
    pub corrected_positions: Vec<CorrectedPosition>,
    pub rip_summary: Vec<RowSummary>,
    pub fill_index: usize,
}

impl DeRipOutcome {
    /// write the ungapped consensus as a single FASTA record
    pub fn write_consensus<P: AsRef<Path>>(
        &self,
        path: P,
        consensus_id: &str,
    ) -> Result<(), PackError> {
        let mut record = self.consensus.clone();
        record.id = consensus_id.to_string();

        info!(
            "Writing consensus {} [{} bp] to {}",
            consensus_id,
            record.len(),
            path.as_ref().display()
        );
        rippack::write_records(path, &[record])
    }

    /// write the input alignment, optionally masked, with the gapped consensus appended
    pub fn write_alignment<P: AsRef<Path>>(
        &self,
        path: P,
        append_consensus: bool,
        mask_rip: bool,
    ) -> Result<(), PackError> {
        let mut alignment = if mask_rip {
            self.masked_alignment.clone()
        } else {
            self.alignment.clone()
        };

        if append_consensus {
            alignment.push(self.gapped_consensus.clone())?;
        }

        info!(
            "Writing alignment [{} rows, {} line width] to {}",
            alignment.len(),
            FASTA_LINE_WIDTH,
            path.as_ref().display()
        );
        alignment.write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derip(rows: &[&str], params: DeRipParams) -> DeRip {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, seq)| Record::new(format!("seq{}", i), seq.as_bytes()))
            .collect::<Vec<_>>();

        DeRip::new(Alignment::new(records).unwrap(), params)
    }

    #[test]
    fn test_forward_rip_is_corrected() {
        let engine = derip(&["ACAGT", "ACAGT", "ATAGT"], DeRipParams::default());
        let outcome = engine.calculate_rip("cons").unwrap();

        assert_eq!(outcome.consensus.seq_str(), "ACAGT");
        assert_eq!(
            outcome.corrected_positions,
            vec![CorrectedPosition {
                column: 1,
                strand: RipStrand::Forward,
                base: 'C',
                rows: vec![2],
            }]
        );
        assert_eq!(outcome.rip_summary[2].rip_fwd, 1);
        assert_eq!(outcome.rip_summary[0].rip_total(), 0);
        assert_eq!(outcome.masked_alignment.records()[2].seq_str(), "AYAGT");
    }

    #[test]
    fn test_reverse_rip_is_corrected() {
        let engine = derip(&["TGCA", "TGCA", "TACA"], DeRipParams::default());
        let outcome = engine.calculate_rip("cons").unwrap();

        assert_eq!(outcome.consensus.seq_str(), "TGCA");
        assert_eq!(outcome.corrected_positions[0].strand, RipStrand::Reverse);
        assert_eq!(outcome.rip_summary[2].rip_rev, 1);
        assert_eq!(outcome.masked_alignment.records()[2].seq_str(), "TRCA");
    }

    #[test]
    fn test_non_rip_transition_is_filled() {
        let params = DeRipParams {
            fill_index: Some(2),
            ..Default::default()
        };
        let engine = derip(&["ACGT", "ACGT", "ATGT"], params);

        let assessment = engine.assess_column(1);
        assert_eq!(assessment.call, ColumnCall::Unresolved);
        assert_eq!(assessment.forward.unwrap().non_rip_rows, vec![2]);

        let outcome = engine.calculate_rip("cons").unwrap();
        assert!(outcome.corrected_positions.is_empty());
        assert_eq!(outcome.consensus.seq_str(), "ATGT");
        assert_eq!(outcome.rip_summary[2].non_rip, 1);
    }

    #[test]
    fn test_reaminate_corrects_any_deamination() {
        let params = DeRipParams {
            fill_index: Some(2),
            reaminate: true,
            ..Default::default()
        };
        let engine = derip(&["ACGT", "ACGT", "ATGT"], params);
        let outcome = engine.calculate_rip("cons").unwrap();

        assert_eq!(outcome.consensus.seq_str(), "ACGT");
        assert_eq!(outcome.corrected_positions[0].rows, vec![2]);
        assert_eq!(outcome.masked_alignment.records()[2].seq_str(), "AYGT");
    }

    #[test]
    fn test_noisy_column_is_not_scanned() {
        let rows: [&str; 5] = ["ACA", "ATA", "AAA", "AGA", "AGA"];

        let engine = derip(&rows, DeRipParams::default());
        let assessment = engine.assess_column(1);
        assert!(assessment.forward.is_none());
        assert_eq!(assessment.reverse.as_ref().unwrap().non_rip_rows, vec![2]);
        assert_eq!(assessment.call, ColumnCall::Unresolved);

        let outcome = engine.calculate_rip("cons").unwrap();
        assert_eq!(outcome.rip_summary[1].rip_fwd, 0);

        let params = DeRipParams {
            max_snp_noise: 0.6,
            ..Default::default()
        };
        let engine = derip(&rows, params);
        assert_eq!(
            engine.assess_column(1).call,
            ColumnCall::Corrected(RipStrand::Forward)
        );
    }

    #[test]
    fn test_gap_threshold() {
        let rows: [&str; 3] = ["A-A", "A-A", "ACA"];

        let outcome = derip(&rows, DeRipParams::default())
            .calculate_rip("cons")
            .unwrap();
        assert_eq!(outcome.gapped_consensus.seq_str(), "ACA");

        let params = DeRipParams {
            max_gaps: 0.5,
            ..Default::default()
        };
        let outcome = derip(&rows, params).calculate_rip("cons").unwrap();
        assert_eq!(outcome.gapped_consensus.seq_str(), "A-A");
        assert_eq!(outcome.consensus.seq_str(), "AA");
    }

    #[test]
    fn test_both_strands_tied_is_unresolved() {
        let engine = derip(&["TCA", "TTA", "TGA", "TAA"], DeRipParams::default());
        let assessment = engine.assess_column(1);

        assert_eq!(assessment.forward.as_ref().unwrap().rip_rows, vec![1]);
        assert_eq!(assessment.reverse.as_ref().unwrap().rip_rows, vec![3]);
        assert_eq!(assessment.call, ColumnCall::Unresolved);
    }

    #[test]
    fn test_fill_row_selection() {
        // seq2 carries a RIP mutation, seq1 has the highest GC
        let rows: [&str; 3] = ["ACAAT", "GCAGC", "ATAAT"];

        let engine = derip(&rows, DeRipParams::default());
        let outcome = engine.calculate_rip("cons").unwrap();
        assert_eq!(outcome.rip_summary[2].rip_fwd, 1);
        assert_eq!(outcome.fill_index, 1);

        let params = DeRipParams {
            fill_max_gc: true,
            ..Default::default()
        };
        let outcome = derip(&rows, params).calculate_rip("cons").unwrap();
        assert_eq!(outcome.fill_index, 1);

        let params = DeRipParams {
            fill_index: Some(0),
            fill_max_gc: true,
            ..Default::default()
        };
        let outcome = derip(&rows, params).calculate_rip("cons").unwrap();
        assert_eq!(outcome.fill_index, 0);
        assert_eq!(outcome.consensus.seq_str(), "ACAAT");
    }

    #[test]
    fn test_fill_prefers_fewest_rip_events() {
        // seq0 has the highest GC but two RIP events
        let rows: [&str; 3] = ["GTATAGG", "ACACAAA", "ACATAAA"];

        let outcome = derip(&rows, DeRipParams::default())
            .calculate_rip("cons")
            .unwrap();
        assert_eq!(outcome.rip_summary[0].rip_fwd, 2);
        assert_eq!(outcome.fill_index, 1);

        let params = DeRipParams {
            fill_max_gc: true,
            ..Default::default()
        };
        let outcome = derip(&rows, params).calculate_rip("cons").unwrap();
        assert_eq!(outcome.fill_index, 0);
    }

    #[test]
    fn test_fill_index_out_of_range() {
        let params = DeRipParams {
            fill_index: Some(5),
            ..Default::default()
        };
        let err = derip(&["AC", "AT"], params).calculate_rip("cons").unwrap_err();

        assert!(matches!(
            err,
            DeRipError::FillIndexOutOfRange { index: 5, rows: 2 }
        ));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let engine = derip(
            &["AC-AGT", "AC-AGT", "AC-AGT", "ATAAGT"],
            DeRipParams::default(),
        );
        let outcome = engine.calculate_rip("cons").unwrap();

        let fasta = dir.path().join("cons.fa");
        outcome.write_consensus(&fasta, "my_name").unwrap();
        assert_eq!(
            std::fs::read_to_string(&fasta).unwrap(),
            ">my_name\nACAGT\n"
        );

        let aln = dir.path().join("aln.fa");
        outcome.write_alignment(&aln, true, true).unwrap();
        let records = rippack::read_records(&aln).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[3].seq_str(), "AYAAGT");
        assert_eq!(records[4].id, "cons");
        assert_eq!(records[4].seq_str(), "AC-AGT");
    }
}
