use config::{is_gap, GAP};

use std::borrow::Cow;
use std::io::Write;

use crate::PackError;

/// A single FASTA record, sequence upper-cased with '.' gaps normalised to '-'
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Record {
    pub id: String,
    pub description: String,
    pub seq: Vec<u8>,
}

impl Record {
    pub fn new<S: Into<String>>(id: S, seq: &[u8]) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            seq: normalize(seq),
        }
    }

    /// parse one record from a chunk starting at '>'
    pub fn parse(chunk: &[u8]) -> Result<Self, PackError> {
        let chunk = chunk.strip_prefix(b">").ok_or_else(|| {
            PackError::MalformedRecord("record does not start with '>'".to_string())
        })?;

        let (header, body) = match chunk.iter().position(|b| *b == b'\n') {
            Some(idx) => (&chunk[..idx], &chunk[idx + 1..]),
            None => (chunk, &chunk[chunk.len()..]),
        };

        let header = String::from_utf8_lossy(header);
        let header = header.trim();
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, desc)) => (id.to_string(), desc.trim().to_string()),
            None => (header.to_string(), String::new()),
        };

        if id.is_empty() {
            return Err(PackError::MalformedRecord(
                "empty FASTA header".to_string(),
            ));
        }

        let seq = body
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .copied()
            .collect::<Vec<u8>>();

        Ok(Self {
            id,
            description,
            seq: normalize(&seq),
        })
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// sequence with every gap removed
    pub fn ungapped(&self) -> Vec<u8> {
        self.seq.iter().filter(|b| !is_gap(**b)).copied().collect()
    }

    pub fn seq_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.seq)
    }

    /// write as FASTA wrapped at `width` columns
    pub fn write_fasta<W: Write>(&self, writer: &mut W, width: usize) -> std::io::Result<()> {
        if self.description.is_empty() {
            writeln!(writer, ">{}", self.id)?;
        } else {
            writeln!(writer, ">{} {}", self.id, self.description)?;
        }

        for line in self.seq.chunks(width.max(1)) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }

        Ok(())
    }
}

fn normalize(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|b| if *b == b'.' { GAP } else { b.to_ascii_uppercase() })
        .collect()
}
