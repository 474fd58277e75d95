//! FASTA alignment reader and writer
//!
//! Plain files are memory mapped and split on record headers with memchr,
//! gzipped files are decoded in full before splitting. Every record is
//! normalised (upper-case, '-' gaps) so downstream tools can compare bytes
//! directly.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use config::{get_writer, is_gz, FASTA_LINE_WIDTH, FA_NEEDLE, MIN_ALIGNMENT_ROWS};
use flate2::read::MultiGzDecoder;
use hashbrown::HashSet;
use log::{info, warn};
use memchr::memchr_iter;
use memmap2::Mmap;
use thiserror::Error;

pub mod record;
pub use record::Record;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Cli(#[from] config::CliError),
    #[error("No FASTA records found")]
    NoRecords,
    #[error("Found sequence data before the first FASTA header")]
    SequenceBeforeHeader,
    #[error("Malformed FASTA record: {0}")]
    MalformedRecord(String),
    #[error("Alignment needs at least two sequences, found {0}")]
    TooFewRows(usize),
    #[error("Sequence {id} has length {found}, expected alignment width {expected}")]
    RaggedAlignment {
        id: String,
        expected: usize,
        found: usize,
    },
}

/// read every FASTA record in a plain or gzipped file
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, PackError> {
    let file = File::open(path.as_ref())?;

    if is_gz(&path) {
        let mut data = Vec::new();
        MultiGzDecoder::new(file).read_to_end(&mut data)?;
        parse_records(&data)
    } else {
        if file.metadata()?.len() == 0 {
            return Err(PackError::NoRecords);
        }

        let mmap = unsafe { Mmap::map(&file)? };
        parse_records(&mmap)
    }
}

/// split a FASTA buffer on line-leading '>' and parse each chunk
pub fn parse_records(data: &[u8]) -> Result<Vec<Record>, PackError> {
    let headers = memchr_iter(FA_NEEDLE, data)
        .filter(|&pos| pos == 0 || data[pos - 1] == b'\n')
        .collect::<Vec<usize>>();

    let first = match headers.first() {
        Some(first) => *first,
        None => {
            return if data.iter().all(u8::is_ascii_whitespace) {
                Err(PackError::NoRecords)
            } else {
                Err(PackError::SequenceBeforeHeader)
            }
        }
    };

    if !data[..first].iter().all(u8::is_ascii_whitespace) {
        return Err(PackError::SequenceBeforeHeader);
    }

    headers
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let end = headers.get(i + 1).copied().unwrap_or(data.len());
            Record::parse(&data[*start..end])
        })
        .collect()
}

/// write records as wrapped FASTA, gzip-encoded when the path ends in .gz
pub fn write_records<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<(), PackError> {
    let mut writer = get_writer(&path)?;

    for record in records {
        record.write_fasta(&mut writer, FASTA_LINE_WIDTH)?;
    }
    writer.finish()?;

    Ok(())
}

/// A multiple sequence alignment: two or more records of identical width
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    records: Vec<Record>,
    width: usize,
}

impl Alignment {
    pub fn new(records: Vec<Record>) -> Result<Self, PackError> {
        if records.len() < MIN_ALIGNMENT_ROWS {
            return Err(PackError::TooFewRows(records.len()));
        }

        let width = records[0].len();
        if let Some(odd) = records.iter().find(|r| r.len() != width) {
            return Err(PackError::RaggedAlignment {
                id: odd.id.clone(),
                expected: width,
                found: odd.len(),
            });
        }

        {
            let mut seen = HashSet::new();
            for record in &records {
                if !seen.insert(record.id.as_str()) {
                    warn!("Duplicate sequence id in alignment: {}", record.id);
                }
            }
        }

        Ok(Self { records, width })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PackError> {
        let alignment = Self::new(read_records(&path)?)?;
        info!(
            "Alignment loaded from {}: {} rows x {} columns",
            path.as_ref().display(),
            alignment.len(),
            alignment.width()
        );

        Ok(alignment)
    }

    /// number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.records.iter().map(move |r| r.seq[col])
    }

    /// append a record of the same width
    pub fn push(&mut self, record: Record) -> Result<(), PackError> {
        let found = record.len();
        if found != self.width {
            return Err(PackError::RaggedAlignment {
                id: record.id,
                expected: self.width,
                found,
            });
        }

        self.records.push(record);
        Ok(())
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), PackError> {
        write_records(path, &self.records)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Alignment with {} rows and {} columns",
            self.len(),
            self.width
        )?;
        for record in &self.records {
            writeln!(f, "{} {}", record.seq_str(), record.id)?;
        }

        Ok(())
    }
}
