//! Command-line interface definition for nsrl-convert
//!
//! Provides argument parsing and validation for the hash list converter.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{ConvertError, Result};
use crate::matcher::{HashAlgorithm, MatcherConfig};
use crate::output::DEFAULT_OUTPUT_PATH;
use crate::progress::DEFAULT_PROGRESS_INTERVAL;

/// Input file used by the fixed-offset and delimited modes when none is given
pub const DEFAULT_INPUT: &str = "NSRLFile.txt";

/// Convert hash exports into canonical NSRL hash lists
///
/// Extracts one MD5, SHA-1 or SHA-256 per line and writes them uppercase,
/// one per line.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nsrl-convert",
    author = "m0h1nd4",
    version,
    about = "Convert hash exports into canonical NSRL hash lists",
    long_about = r#"
Extract MD5, SHA-1 or SHA-256 hashes from text and CSV exports and write a
canonical hash list: one uppercase hash per line, a single algorithm per file.

EXAMPLES:
    # Pull the first hash out of every line of a free-form report
    nsrl-convert report.txt

    # NSRL fixed-width export, characters 44-76 hold the MD5
    nsrl-convert --mode fixed-offset

    # Quoted MD5 in the second CSV column, sorted and deduplicated
    nsrl-convert --mode delimited --sort --dedup exports.csv

    # Check the written list and look up a hash
    nsrl-convert report.txt --verify --query d41d8cd98f00b204e9800998ecf8427e

EXIT CODES:
    0    success
    1    write failure or invalid option
    255  no input file specified
    254  input file unreadable
    252  zero hashes found
    248  more than one hash algorithm found
    240  written hash list failed verification
    239  written hash list contains duplicates
"#
)]
pub struct Args {
    /// Input file (required in free-text mode, default NSRLFile.txt otherwise)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// How hashes are located within each line
    #[arg(short, long, value_enum, default_value_t = MatchMode::FreeText)]
    pub mode: MatchMode,

    /// Character offset of the hash in fixed-offset mode
    #[arg(long, value_name = "N", default_value_t = 44)]
    pub offset: usize,

    /// Hash width in characters for fixed-offset mode (32, 40 or 64)
    #[arg(long, value_name = "N", default_value_t = 32)]
    pub width: usize,

    /// Field delimiter in delimited mode
    #[arg(long, value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,

    /// Zero-based index of the field holding the hash in delimited mode
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub field: usize,

    /// Output file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Sort output in ascending order
    #[arg(long, default_value_t = false)]
    pub sort: bool,

    /// Remove duplicate hashes
    #[arg(long, default_value_t = false)]
    pub dedup: bool,

    /// Extract and validate without writing the output file
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Reload the written list and check it is a valid hash catalog
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Look up a hash in the written list (repeatable)
    #[arg(long, value_name = "HASH")]
    pub query: Vec<String>,

    /// Records between progress updates
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_every: u64,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Strategy used to find the hash in each line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// First 64, 40 or 32 character hex run anywhere in the line
    FreeText,
    /// Fixed character range of a fixed-width record
    FixedOffset,
    /// Quoted MD5 inside one field of a delimited record
    Delimited,
}

impl Args {
    /// Resolve the input path for the selected mode
    pub fn input_path(&self) -> Result<PathBuf> {
        match (&self.input, self.mode) {
            (Some(path), _) => Ok(path.clone()),
            (None, MatchMode::FreeText) => Err(ConvertError::MissingArgument),
            (None, _) => Ok(PathBuf::from(DEFAULT_INPUT)),
        }
    }

    /// Build the matcher configuration for the selected mode
    pub fn matcher_config(&self) -> Result<MatcherConfig> {
        Ok(match self.mode {
            MatchMode::FreeText => MatcherConfig::FreeText,
            MatchMode::FixedOffset => {
                if HashAlgorithm::from_hex_len(self.width).is_none() {
                    return Err(ConvertError::InvalidArgument(format!(
                        "Invalid width {}: must be 32, 40 or 64",
                        self.width
                    )));
                }
                MatcherConfig::FixedOffset {
                    offset: self.offset,
                    width: self.width,
                }
            }
            MatchMode::Delimited => MatcherConfig::Delimited {
                delimiter: self.delimiter,
                field: self.field,
            },
        })
    }

    /// Whether the written list has to be loaded back
    pub fn needs_catalog(&self) -> bool {
        self.verify || !self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("nsrl-convert").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["hashes.txt"]);

        assert_eq!(args.mode, MatchMode::FreeText);
        assert_eq!(args.input_path().unwrap(), PathBuf::from("hashes.txt"));
        assert_eq!(args.output, PathBuf::from("src/NSRLFile.txt"));
        assert_eq!(args.progress_every, 1000);
        assert!(!args.sort && !args.dedup && !args.needs_catalog());
    }

    #[test]
    fn test_free_text_requires_input() {
        let args = parse(&[]);

        assert!(matches!(args.input_path(), Err(ConvertError::MissingArgument)));
    }

    #[test]
    fn test_fixed_offset_defaults_input() {
        let args = parse(&["--mode", "fixed-offset"]);

        assert_eq!(args.input_path().unwrap(), PathBuf::from("NSRLFile.txt"));
        assert_eq!(
            args.matcher_config().unwrap(),
            MatcherConfig::FixedOffset { offset: 44, width: 32 }
        );
    }

    #[test]
    fn test_fixed_offset_rejects_width() {
        let args = parse(&["--mode", "fixed-offset", "--width", "16"]);

        assert!(matches!(args.matcher_config(), Err(ConvertError::InvalidArgument(_))));
    }

    #[test]
    fn test_delimited_options() {
        let args = parse(&["-m", "delimited", "--delimiter", ";", "--field", "3", "--query", "AA", "--query", "BB"]);

        assert_eq!(
            args.matcher_config().unwrap(),
            MatcherConfig::Delimited { delimiter: ';', field: 3 }
        );
        assert_eq!(args.query, vec!["AA", "BB"]);
        assert!(args.needs_catalog());
    }
}
