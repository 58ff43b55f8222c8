//! Core conversion engine
//!
//! Scans a source file, extracts one hash per line, validates the collection,
//! normalizes it and writes the canonical hash list. Output is written only
//! after every check has passed, so a failed run leaves the previous file
//! untouched.

use std::path::{Path, PathBuf};

use crate::catalog::HashCatalog;
use crate::cli::Args;
use crate::encoding::LineScanner;
use crate::error::Result;
use crate::matcher::{HashAlgorithm, Matcher, MatcherConfig};
use crate::normalize::{normalize, NormalizeOptions};
use crate::output::{write_hash_list, DEFAULT_BUFFER_SIZE};
use crate::progress::{ConversionStats, ProgressReporter, ProgressSink, DEFAULT_PROGRESS_INTERVAL};
use crate::validate::validate_consistency;

/// Converter configuration
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub matcher: MatcherConfig,
    pub normalize: NormalizeOptions,
    pub output_path: PathBuf,
    pub buffer_size: usize,
    pub progress_interval: u64,
    pub dry_run: bool,
}

impl ConverterConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            matcher: args.matcher_config()?,
            normalize: NormalizeOptions {
                sort: args.sort,
                dedup: args.dedup,
            },
            output_path: args.output.clone(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_interval: args.progress_every,
            dry_run: args.dry_run,
        })
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::FreeText,
            normalize: NormalizeOptions::default(),
            output_path: PathBuf::from(crate::output::DEFAULT_OUTPUT_PATH),
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            dry_run: false,
        }
    }
}

/// Hashes pulled from one source file, before normalization
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub hashes: Vec<String>,
    pub lines_scanned: u64,
    pub lossy_lines: u64,
    pub input_bytes: u64,
}

/// Main converter
pub struct Converter {
    config: ConverterConfig,
    matcher: Box<dyn Matcher>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Result<Self> {
        let matcher = config.matcher.build()?;
        Ok(Self { config, matcher })
    }

    /// Run the whole pipeline on `input`
    pub fn convert(&self, input: &Path, progress: &mut dyn ProgressSink) -> Result<ConversionStats> {
        let mut stats = ConversionStats::new(
            input.to_path_buf(),
            self.config.output_path.clone(),
            self.matcher.name(),
        );
        stats.dry_run = self.config.dry_run;

        let extraction = self.extract(input, progress)?;
        stats.input_bytes = extraction.input_bytes;
        stats.lines_scanned = extraction.lines_scanned;
        stats.lossy_lines = extraction.lossy_lines;
        stats.hashes_extracted = extraction.hashes.len() as u64;

        stats.algorithm = if self.matcher.requires_uniform() {
            Some(validate_consistency(&extraction.hashes, input)?)
        } else {
            extraction
                .hashes
                .first()
                .and_then(|h| HashAlgorithm::from_hex_len(h.len()))
        };

        let normalized = normalize(extraction.hashes, self.config.normalize);
        stats.duplicates_removed = normalized.duplicates_removed as u64;

        if self.config.dry_run {
            log::info!(
                "Dry run: {} hashes would be written to {:?}",
                normalized.hashes.len(),
                self.config.output_path
            );
            return Ok(stats);
        }

        stats.hashes_written = write_hash_list(
            &self.config.output_path,
            &normalized.hashes,
            self.config.buffer_size,
        )?;

        log::info!(
            "Wrote {} hashes to {:?}",
            stats.hashes_written,
            self.config.output_path
        );

        Ok(stats)
    }

    /// Scan `input` and collect every extracted hash in encounter order
    pub fn extract(&self, input: &Path, progress: &mut dyn ProgressSink) -> Result<Extraction> {
        let mut scanner = LineScanner::open(input)?;
        let mut reporter = ProgressReporter::new(progress, self.config.progress_interval);
        let mut hashes = Vec::new();

        for line in scanner.by_ref() {
            let line = line?;
            if let Some(hash) = self.matcher.extract(&line) {
                hashes.push(hash.to_string());
                reporter.record();
            }
        }
        reporter.finish();

        log::debug!(
            "{} mode: {} hashes in {} lines of {:?} ({})",
            self.matcher.name(),
            hashes.len(),
            scanner.lines_read(),
            input,
            scanner.encoding().name()
        );

        Ok(Extraction {
            hashes,
            lines_scanned: scanner.lines_read(),
            lossy_lines: scanner.lossy_lines(),
            input_bytes: scanner.file_size(),
        })
    }

    /// Load the written output back as a catalog
    pub fn load_catalog(&self, progress: &mut dyn ProgressSink) -> Result<HashCatalog> {
        HashCatalog::load(&self.config.output_path, progress)
    }
}
