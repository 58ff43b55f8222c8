//! Hash catalog
//!
//! Loads a canonical hash list the way a hash lookup server would: every
//! non-blank line must be a single hash of one algorithm, and the sorted list
//! must not contain duplicates. Lookups are binary searches.

use regex::Regex;
use std::path::Path;

use crate::encoding::LineScanner;
use crate::error::{ConvertError, Result};
use crate::matcher::{patterns, HashAlgorithm};
use crate::progress::{ProgressReporter, ProgressSink};

/// Sorted, duplicate-free set of uppercase hashes
#[derive(Debug, Clone)]
pub struct HashCatalog {
    hashes: Vec<String>,
    algorithm: Option<HashAlgorithm>,
}

impl HashCatalog {
    /// Load and check a canonical hash list
    pub fn load(path: &Path, progress: &mut dyn ProgressSink) -> Result<Self> {
        let canonical = Regex::new(patterns::CANONICAL_HASH)
            .map_err(|e| ConvertError::InvalidArgument(e.to_string()))?;
        let scanner = LineScanner::open(path)?;
        let mut reporter = ProgressReporter::new(progress, 1_000_000);

        let mut hashes = Vec::new();
        let mut algorithm: Option<HashAlgorithm> = None;

        for (index, line) in scanner.enumerate() {
            let mut line = line?;
            if line.is_empty() {
                continue;
            }
            line.make_ascii_uppercase();

            let corrupt = || ConvertError::CorruptHashList {
                path: path.to_path_buf(),
                line_number: index + 1,
                line: line.clone(),
            };

            if !canonical.is_match(&line) {
                return Err(corrupt());
            }
            match algorithm {
                None => algorithm = HashAlgorithm::from_hex_len(line.len()),
                Some(a) if a.hex_len() != line.len() => return Err(corrupt()),
                Some(_) => {}
            }

            hashes.push(line);
            reporter.record();
        }
        reporter.finish();

        log::info!("Read {} hashes from {:?}", hashes.len(), path);

        Self::from_sorted_check(hashes, algorithm)
    }

    fn from_sorted_check(mut hashes: Vec<String>, algorithm: Option<HashAlgorithm>) -> Result<Self> {
        hashes.sort_unstable();

        if let Some(pair) = hashes.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConvertError::DuplicateHash {
                hash: pair[0].clone(),
            });
        }

        Ok(Self { hashes, algorithm })
    }

    /// Whether `hash` is present (case-insensitive)
    pub fn contains(&self, hash: &str) -> bool {
        let query = hash.trim().to_ascii_uppercase();
        self.hashes.binary_search(&query).is_ok()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Algorithm shared by every entry, `None` for an empty catalog
    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        self.algorithm
    }
}
