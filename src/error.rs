//! Error types for hash list conversion
//!
//! Every failure that ends a run maps to a stable exit code so calling
//! scripts can branch on the cause.

use std::path::PathBuf;

use crate::matcher::HashAlgorithm;

/// Exit codes reported by the binary
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const MISSING_ARGUMENT: i32 = 255;
    pub const FILE_ACCESS: i32 = 254;
    pub const EMPTY_RESULT: i32 = 252;
    pub const MIXED_ALGORITHM: i32 = 248;
    pub const CORRUPT_HASH_LIST: i32 = 240;
    pub const DUPLICATE_HASH: i32 = 239;
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("No input file specified")]
    MissingArgument,

    #[error("Couldn't read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zero hashes found in {path} -- check to see if this is correct")]
    EmptyResult { path: PathBuf },

    #[error("Multiple different hash algorithms present in {path}: expected {expected}, found {found} ({token})")]
    MixedAlgorithm {
        path: PathBuf,
        expected: HashAlgorithm,
        found: String,
        token: String,
    },

    #[error("Hash list {path} appears corrupt at line {line_number}: '{line}'")]
    CorruptHashList {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    #[error("Hash list contains duplicates: {hash}")]
    DuplicateHash { hash: String },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

impl ConvertError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingArgument => exit_code::MISSING_ARGUMENT,
            Self::FileAccess { .. } => exit_code::FILE_ACCESS,
            Self::EmptyResult { .. } => exit_code::EMPTY_RESULT,
            Self::MixedAlgorithm { .. } => exit_code::MIXED_ALGORITHM,
            Self::CorruptHashList { .. } => exit_code::CORRUPT_HASH_LIST,
            Self::DuplicateHash { .. } => exit_code::DUPLICATE_HASH,
            Self::Output { .. } | Self::InvalidArgument(_) => exit_code::FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
