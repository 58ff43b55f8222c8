//! # nsrl-convert
//!
//! Turns hash exports into canonical hash lists for NSRL-style lookup servers.
//!
//! ## Features
//!
//! - **Free-text extraction**: first MD5, SHA-1 or SHA-256 found anywhere in a line
//! - **Fixed-offset extraction**: hash at a constant column of fixed-width exports
//! - **Delimited extraction**: quoted MD5 inside a chosen CSV field
//! - **Consistency checks**: empty results and mixed algorithms are rejected
//! - **Canonical output**: uppercase, one hash per line, optional sort and dedup
//! - **Catalog checks**: reload a list, reject corrupt lines and duplicates, look up hashes
//!
//! ## Usage
//!
//! ```bash
//! # Free-form input, writes src/NSRLFile.txt
//! nsrl-convert report.txt
//!
//! # Fixed-width NSRL export in ./NSRLFile.txt
//! nsrl-convert --mode fixed-offset --sort --dedup
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use nsrl_convert::matcher::MatcherConfig;
//! use nsrl_convert::normalize::NormalizeOptions;
//! use nsrl_convert::processor::{Converter, ConverterConfig};
//! use nsrl_convert::progress::NullProgress;
//! use std::path::{Path, PathBuf};
//!
//! let config = ConverterConfig {
//!     matcher: MatcherConfig::FixedOffset { offset: 44, width: 32 },
//!     normalize: NormalizeOptions { sort: true, dedup: true },
//!     output_path: PathBuf::from("src/NSRLFile.txt"),
//!     ..ConverterConfig::default()
//! };
//!
//! let converter = Converter::new(config).unwrap();
//! let stats = converter.convert(Path::new("NSRLFile.txt"), &mut NullProgress).unwrap();
//! println!("{} hashes written", stats.hashes_written);
//! ```

pub mod catalog;
pub mod cli;
pub mod dedup;
pub mod encoding;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod processor;
pub mod progress;
pub mod validate;

pub use cli::Args;
pub use error::ConvertError;
pub use processor::{Converter, ConverterConfig};
