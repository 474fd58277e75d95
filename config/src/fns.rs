use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{FASTA_EXTENSIONS, GZ_EXTENSION};

// os
#[cfg(not(windows))]
const TICK_SETTINGS: (&str, u64) = ("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ", 80);
#[cfg(windows)]
const TICK_SETTINGS: (&str, u64) = (r"+-x| ", 200);

/// return a pre-configured progress bar
pub fn get_progress_bar(length: u64, msg: &str) -> ProgressBar {
    let progressbar_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS.0)
        .template(" {spinner} {msg:<30} {wide_bar} ETA {eta_precise} ")
        .expect("no template error");

    let progress_bar = ProgressBar::new(length);

    progress_bar.set_style(progressbar_style);
    progress_bar.enable_steady_tick(Duration::from_millis(TICK_SETTINGS.1));
    progress_bar.set_message(msg.to_owned());

    progress_bar
}

/// true if the path ends in .gz
pub fn is_gz<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext == GZ_EXTENSION)
        .unwrap_or(false)
}

/// buffered file writer; call `finish` so gzip trailers and flush errors surface
pub enum OutWriter {
    Plain(BufWriter<File>),
    Gz(BufWriter<GzEncoder<File>>),
}

impl OutWriter {
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutWriter::Plain(writer) => {
                writer.into_inner().map_err(|e| e.into_error())?;
            }
            OutWriter::Gz(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
            }
        }

        Ok(())
    }
}

impl Write for OutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutWriter::Plain(writer) => writer.write(buf),
            OutWriter::Gz(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutWriter::Plain(writer) => writer.flush(),
            OutWriter::Gz(writer) => writer.flush(),
        }
    }
}

/// open a buffered writer, gzip-encoded when the path ends in .gz
pub fn get_writer<P: AsRef<Path>>(path: P) -> Result<OutWriter, CliError> {
    let file = File::create(path.as_ref())?;

    if is_gz(&path) {
        let encoder = GzEncoder::new(file, Compression::default());
        Ok(OutWriter::Gz(BufWriter::new(encoder)))
    } else {
        Ok(OutWriter::Plain(BufWriter::new(file)))
    }
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        self.check_input()?;
        self.check_thresholds()?;

        Ok(())
    }

    fn check_input(&self) -> Result<(), CliError> {
        validate(self.get_input())
    }

    fn check_thresholds(&self) -> Result<(), CliError> {
        for (name, value) in self.get_thresholds() {
            if !(0.0..=1.0).contains(&value) {
                return Err(CliError::InvalidInput(format!(
                    "--{} must be a proportion in [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    fn get_input(&self) -> &PathBuf;

    fn get_thresholds(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("The file {0:?} does not exist")]
    FileNotFound(PathBuf),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// argument validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::FileNotFound(arg.clone()));
    }

    if !arg.is_file() {
        return Err(CliError::FileNotFound(arg.clone()));
    }

    if !has_fasta_extension(arg) {
        log::warn!(
            "{:?} does not look like a FASTA file, parsing it anyway...",
            arg
        );
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => {
            Err(CliError::InvalidInput(format!("file {:?} is empty", arg)))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}

fn has_fasta_extension(path: &Path) -> bool {
    let stem = if is_gz(path) {
        path.file_stem().map(Path::new)
    } else {
        Some(path)
    };

    stem.and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| FASTA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    struct Dummy {
        input: PathBuf,
        noise: f64,
    }

    impl ArgCheck for Dummy {
        fn get_input(&self) -> &PathBuf {
            &self.input
        }

        fn get_thresholds(&self) -> Vec<(&'static str, f64)> {
            vec![("noise", self.noise)]
        }
    }

    #[test]
    fn test_validate_missing_file() {
        let path = PathBuf::from("definitely/not/here.fa");
        let err = validate(&path).unwrap_err();

        assert!(matches!(err, CliError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_validate_directory_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aln.fa");
        std::fs::create_dir(&path).unwrap();

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_plain_writer_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fa");

        let mut writer = get_writer(&path).unwrap();
        write!(writer, ">a\nACGT\n").unwrap();
        writer.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), ">a\nACGT\n");
    }

    #[test]
    fn test_validate_empty_file() {
        let file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        let err = validate(&file.path().to_path_buf()).unwrap_err();

        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_argcheck_rejects_out_of_range_threshold() {
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        writeln!(file, ">a\nACGT").unwrap();

        let args = Dummy {
            input: file.path().to_path_buf(),
            noise: 1.5,
        };
        assert!(matches!(args.check(), Err(CliError::InvalidInput(_))));

        let args = Dummy {
            input: file.path().to_path_buf(),
            noise: 0.5,
        };
        assert!(args.check().is_ok());
    }

    #[test]
    fn test_fasta_extensions() {
        assert!(has_fasta_extension(Path::new("aln.fasta")));
        assert!(has_fasta_extension(Path::new("aln.FA.gz")));
        assert!(!has_fasta_extension(Path::new("aln.bed")));
        assert!(!has_fasta_extension(Path::new("aln")));
    }

    #[test]
    fn test_get_writer_gz_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");

        let mut writer = get_writer(&path).unwrap();
        writeln!(writer, "x\ny").unwrap();
        writer.finish().unwrap();

        let mut decoder = flate2::read::GzDecoder::new(File::open(&path).unwrap());
        let mut contents = String::new();
        decoder.read_to_string(&mut contents).unwrap();

        assert_eq!(contents, "x\ny\n");
    }
}
