//! Hash matching module
//!
//! Extracts a candidate hash token from a single source line. Each input
//! shape has its own strategy; the caller picks one explicitly.

use regex::Regex;
use std::fmt;

use crate::error::{ConvertError, Result};

/// Hash algorithms recognised by hex length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Identify the algorithm from the number of hex characters
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Self::Md5),
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Number of hex characters in a digest
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracts at most one hash token per line
pub trait Matcher {
    /// Return the hash embedded in `line`, or `None` if the line carries none
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// Short name used in logs and summaries
    fn name(&self) -> &'static str;

    /// Whether the whole collection must share a single algorithm
    fn requires_uniform(&self) -> bool {
        false
    }
}

/// Searches anywhere in the line for a 64, 40 or 32 character hex run
#[derive(Debug, Clone)]
pub struct FreeTextMatcher {
    pattern: Regex,
}

impl FreeTextMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(patterns::ANY_HASH)?,
        })
    }
}

impl Matcher for FreeTextMatcher {
    #[inline]
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern.find(line).map(|m| m.as_str())
    }

    fn name(&self) -> &'static str {
        "free-text"
    }

    fn requires_uniform(&self) -> bool {
        true
    }
}

/// Slices a constant character range out of fixed-width records
#[derive(Debug, Clone)]
pub struct FixedOffsetMatcher {
    offset: usize,
    width: usize,
    pattern: Regex,
}

impl FixedOffsetMatcher {
    pub fn new(offset: usize, width: usize) -> Result<Self> {
        if HashAlgorithm::from_hex_len(width).is_none() {
            return Err(ConvertError::InvalidArgument(format!(
                "Invalid slice width {}: must be 32, 40 or 64",
                width
            )));
        }

        Ok(Self {
            offset,
            width,
            pattern: compile(&patterns::exact_hex(width))?,
        })
    }

    /// Characters `[offset, offset + width)` of the line, if it is long enough
    fn slice<'a>(&self, line: &'a str) -> Option<&'a str> {
        let end = self.offset.checked_add(self.width)?;

        if line.is_ascii() {
            return line.get(self.offset..end);
        }

        let mut bounds = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()));
        let start = bounds.nth(self.offset)?;
        let stop = bounds.nth(self.width - 1)?;
        Some(&line[start..stop])
    }
}

impl Matcher for FixedOffsetMatcher {
    #[inline]
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.slice(line).filter(|s| self.pattern.is_match(s))
    }

    fn name(&self) -> &'static str {
        "fixed-offset"
    }
}

/// Finds a quoted MD5 inside one field of a delimited record
#[derive(Debug, Clone)]
pub struct DelimitedFieldMatcher {
    delimiter: char,
    field: usize,
    pattern: Regex,
}

impl DelimitedFieldMatcher {
    pub fn new(delimiter: char, field: usize) -> Result<Self> {
        Ok(Self {
            delimiter,
            field,
            pattern: compile(patterns::QUOTED_MD5)?,
        })
    }
}

impl Matcher for DelimitedFieldMatcher {
    #[inline]
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let field = line.split(self.delimiter).nth(self.field)?;
        self.pattern
            .captures(field)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn name(&self) -> &'static str {
        "delimited"
    }
}

/// Which matcher to build, with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherConfig {
    FreeText,
    FixedOffset { offset: usize, width: usize },
    Delimited { delimiter: char, field: usize },
}

impl MatcherConfig {
    pub fn build(&self) -> Result<Box<dyn Matcher>> {
        let matcher: Box<dyn Matcher> = match *self {
            Self::FreeText => Box::new(FreeTextMatcher::new()?),
            Self::FixedOffset { offset, width } => Box::new(FixedOffsetMatcher::new(offset, width)?),
            Self::Delimited { delimiter, field } => {
                Box::new(DelimitedFieldMatcher::new(delimiter, field)?)
            }
        };
        Ok(matcher)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        ConvertError::InvalidArgument(format!("Invalid regex pattern '{}': {}", pattern, e))
    })
}

/// Regex patterns used by the matchers
pub mod patterns {
    /// Any supported digest, longest alternative first
    pub const ANY_HASH: &str = r"([0-9A-Fa-f]{64}|[0-9A-Fa-f]{40}|[0-9A-Fa-f]{32})";

    /// MD5 wrapped in double quotes somewhere inside a field
    pub const QUOTED_MD5: &str = r#".*"([0-9A-Fa-f]{32})".*"#;

    /// Canonical (uppercase) digest of any supported length
    pub const CANONICAL_HASH: &str = r"^(?:[0-9A-F]{64}|[0-9A-F]{40}|[0-9A-F]{32})$";

    /// Anchored hex run of exactly `width` characters
    pub fn exact_hex(width: usize) -> String {
        format!("^[0-9A-Fa-f]{{{}}}$", width)
    }
}
