use anyhow::Result;
use config::{
    gc_content, get_writer, is_gap, ArgCheck, PRODUCT_INDEX_THRESHOLD, SUBSTRATE_INDEX_THRESHOLD,
};
use log::info;
use rippack::{read_records, Record};
use serde::Serialize;

use std::io::Write;

use crate::cli::Args;

const HEADER: &str = "id\tlength\tgc\tTpA\tApT\tCpA\tTpG\tApC\tGpT\tproduct\tsubstrate\tcomposite\trip";

/// overlapping dinucleotide counts relevant to RIP, gaps skipped
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DinucleotideCounts {
    pub tpa: usize,
    pub apt: usize,
    pub cpa: usize,
    pub tpg: usize,
    pub apc: usize,
    pub gpt: usize,
}

impl DinucleotideCounts {
    pub fn from_seq(seq: &[u8]) -> Self {
        let ungapped = seq
            .iter()
            .filter(|b| !is_gap(**b))
            .map(|b| b.to_ascii_uppercase())
            .collect::<Vec<u8>>();

        let mut counts = Self::default();
        for pair in ungapped.windows(2) {
            match pair {
                b"TA" => counts.tpa += 1,
                b"AT" => counts.apt += 1,
                b"CA" => counts.cpa += 1,
                b"TG" => counts.tpg += 1,
                b"AC" => counts.apc += 1,
                b"GT" => counts.gpt += 1,
                _ => {}
            }
        }

        counts
    }
}

/// RIP indices; None when the denominator dinucleotides are absent
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct RipIndex {
    pub product: Option<f64>,
    pub substrate: Option<f64>,
    pub composite: Option<f64>,
}

impl RipIndex {
    pub fn from_counts(counts: &DinucleotideCounts) -> Self {
        let product = ratio(counts.tpa, counts.apt);
        let substrate = ratio(counts.cpa + counts.tpg, counts.apc + counts.gpt);
        let composite = match (product, substrate) {
            (Some(p), Some(s)) => Some(p - s),
            _ => None,
        };

        Self {
            product,
            substrate,
            composite,
        }
    }

    pub fn from_seq(seq: &[u8]) -> Self {
        Self::from_counts(&DinucleotideCounts::from_seq(seq))
    }

    /// product >= 1.1, substrate <= 0.75 and a positive composite
    pub fn is_rip(&self) -> bool {
        match (self.product, self.substrate, self.composite) {
            (Some(p), Some(s), Some(c)) => {
                p >= PRODUCT_INDEX_THRESHOLD && s <= SUBSTRATE_INDEX_THRESHOLD && c > 0.0
            }
            _ => false,
        }
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

/// format an optional index, "NA" when undefined
pub fn fmt_index(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "NA".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub id: String,
    pub length: usize,
    pub gc: f64,
    pub counts: DinucleotideCounts,
    pub index: RipIndex,
}

impl IndexRow {
    pub fn from_record(record: &Record) -> Self {
        let counts = DinucleotideCounts::from_seq(&record.seq);

        Self {
            id: record.id.clone(),
            length: record.ungapped().len(),
            gc: gc_content(&record.seq),
            counts,
            index: RipIndex::from_counts(&counts),
        }
    }

    pub fn to_line(&self) -> String {
        let c = &self.counts;
        format!(
            "{}\t{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.length,
            self.gc,
            c.tpa,
            c.apt,
            c.cpa,
            c.tpg,
            c.apc,
            c.gpt,
            fmt_index(self.index.product),
            fmt_index(self.index.substrate),
            fmt_index(self.index.composite),
            self.index.is_rip()
        )
    }
}

fn write_rows<W: Write>(writer: &mut W, rows: &[IndexRow]) -> std::io::Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for row in rows {
        writeln!(writer, "{}", row.to_line())?;
    }

    Ok(())
}

/// compute RIP indices for every record in args.input and write a TSV
pub fn calculate_indices(args: &Args) -> Result<Vec<IndexRow>> {
    args.check()?;

    let records = read_records(&args.input)?;
    let rows = records.iter().map(IndexRow::from_record).collect::<Vec<_>>();

    match &args.output {
        Some(path) => {
            let mut writer = get_writer(path)?;
            write_rows(&mut writer, &rows)?;
            writer.finish()?;
        }
        None => {
            let mut writer = std::io::stdout().lock();
            write_rows(&mut writer, &rows)?;
            writer.flush()?;
        }
    }

    info!(
        "RIP indices calculated for {} sequences, {} look RIP-affected",
        rows.len(),
        rows.iter().filter(|r| r.index.is_rip()).count()
    );

    Ok(rows)
}
