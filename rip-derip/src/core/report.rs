use anyhow::Result;
use config::get_writer;
use log::info;
use rip_index::core::fmt_index;
use serde::Serialize;

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use super::engine::{CorrectedPosition, DeRipOutcome, DeRipParams, RowSummary};

const SUMMARY_COLUMNS: [&str; 9] = [
    "Index",
    "ID",
    "RIP(C>T)",
    "RIP(G>A)",
    "Non-RIP",
    "GC",
    "Product",
    "Substrate",
    "Composite",
];

#[derive(Debug, Serialize)]
struct Descriptor<'a> {
    consensus_name: &'a str,
    params: &'a DeRipParams,
    rows: usize,
    columns: usize,
    fill_index: usize,
    fill_id: &'a str,
    corrected_columns: usize,
    consensus: Cow<'a, str>,
    gapped_consensus: Cow<'a, str>,
    corrected_positions: &'a [CorrectedPosition],
    rip_summary: &'a [RowSummary],
}

impl DeRipOutcome {
    /// per-row RIP table, one line per alignment row
    pub fn rip_summary_table(&self) -> String {
        let id_width = self
            .rip_summary
            .iter()
            .map(|row| row.id.len())
            .chain(std::iter::once(SUMMARY_COLUMNS[1].len()))
            .max()
            .unwrap_or_default();

        let mut table = format!(
            "{:<6} {:<id_width$} {:>9} {:>9} {:>8} {:>7} {:>9} {:>9} {:>9}\n",
            SUMMARY_COLUMNS[0],
            SUMMARY_COLUMNS[1],
            SUMMARY_COLUMNS[2],
            SUMMARY_COLUMNS[3],
            SUMMARY_COLUMNS[4],
            SUMMARY_COLUMNS[5],
            SUMMARY_COLUMNS[6],
            SUMMARY_COLUMNS[7],
            SUMMARY_COLUMNS[8],
        );

        for row in &self.rip_summary {
            table.push_str(&format!(
                "{:<6} {:<id_width$} {:>9} {:>9} {:>8} {:>7.4} {:>9} {:>9} {:>9}\n",
                row.index,
                row.id,
                row.rip_fwd,
                row.rip_rev,
                row.non_rip,
                row.gc,
                fmt_index(row.indices.product),
                fmt_index(row.indices.substrate),
                fmt_index(row.indices.composite),
            ));
        }

        table
    }

    /// repaired-column count, row summary and masked alignment, as printed to stdout
    pub fn report<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "Found {} columns to be repaired.\n",
            self.corrected_positions.len()
        )?;

        writeln!(writer, "RIP summary by row:")?;
        write!(writer, "{}", self.rip_summary_table())?;

        writeln!(writer, "\nMutation masked alignment:\n{}", self.masked_alignment)?;
        writeln!(
            writer,
            "{} {}\n",
            self.gapped_consensus.seq_str(),
            self.label
        )?;

        Ok(())
    }

    /// JSON descriptor of the run
    pub fn write_summary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let descriptor = Descriptor {
            consensus_name: &self.label,
            params: &self.params,
            rows: self.alignment.len(),
            columns: self.alignment.width(),
            fill_index: self.fill_index,
            fill_id: &self.alignment.records()[self.fill_index].id,
            corrected_columns: self.corrected_positions.len(),
            consensus: self.consensus.seq_str(),
            gapped_consensus: self.gapped_consensus.seq_str(),
            corrected_positions: &self.corrected_positions,
            rip_summary: &self.rip_summary,
        };

        let mut writer = get_writer(&path)?;
        serde_json::to_writer_pretty(&mut writer, &descriptor)?;
        writeln!(writer)?;
        writer.finish()?;

        info!("Summary written to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::engine::DeRip;
    use super::*;
    use rippack::{Alignment, Record};

    fn outcome() -> DeRipOutcome {
        let alignment = Alignment::new(vec![
            Record::new("first", b"ACAGT"),
            Record::new("second", b"ACAGT"),
            Record::new("third", b"ATAGT"),
        ])
        .unwrap();

        DeRip::new(alignment, DeRipParams::default())
            .calculate_rip("derip_consensus")
            .unwrap()
    }

    #[test]
    fn test_report_sections() {
        let mut buf = Vec::new();
        outcome().report(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Found 1 columns to be repaired.\n\nRIP summary by row:\n"));
        assert!(text.contains("Mutation masked alignment:\nAlignment with 3 rows and 5 columns\n"));
        assert!(text.contains("AYAGT third\n"));
        assert!(text.ends_with("ACAGT derip_consensus\n\n"));
    }

    #[test]
    fn test_rip_summary_table() {
        let table = outcome().rip_summary_table();
        let lines = table.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Index  ID "));

        let third = lines[3].split_whitespace().collect::<Vec<_>>();
        assert_eq!(third[..6], ["2", "third", "1", "0", "0", "0.2000"]);
    }

    #[test]
    fn test_write_summary_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json.gz");
        outcome().write_summary(&path).unwrap();

        let decoder = flate2::read::GzDecoder::new(std::fs::File::open(&path).unwrap());
        let value: serde_json::Value = serde_json::from_reader(decoder).unwrap();

        assert_eq!(value["consensus"], "ACAGT");
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        outcome().write_summary(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["consensus_name"], "derip_consensus");
        assert_eq!(value["corrected_columns"], 1);
        assert_eq!(value["corrected_positions"][0]["column"], 1);
        assert_eq!(value["corrected_positions"][0]["strand"], "Forward");
        assert_eq!(value["rip_summary"][2]["rip_fwd"], 1);
        assert_eq!(value["params"]["max_gaps"], 0.7);
        assert_eq!(value["fill_id"], "first");
    }
}
