//! Consistency checks for a free-text extraction
//!
//! A usable hash list holds at least one hash and exactly one algorithm.

use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::matcher::HashAlgorithm;

/// Check that `tokens` is non-empty and every token has the first token's length
///
/// Returns the algorithm shared by the collection.
pub fn validate_consistency(tokens: &[String], source: &Path) -> Result<HashAlgorithm> {
    let Some(first) = tokens.first() else {
        return Err(ConvertError::EmptyResult {
            path: source.to_path_buf(),
        });
    };

    let first_len = first.len();
    let expected = HashAlgorithm::from_hex_len(first_len).ok_or_else(|| {
        ConvertError::InvalidArgument(format!("Unsupported hash length {}: '{}'", first_len, first))
    })?;

    if let Some(odd) = tokens[1..].iter().find(|t| t.len() != first_len) {
        let found = HashAlgorithm::from_hex_len(odd.len())
            .map(|a| a.to_string())
            .unwrap_or_else(|| format!("{} hex characters", odd.len()));

        return Err(ConvertError::MixedAlgorithm {
            path: source.to_path_buf(),
            expected,
            found,
            token: odd.clone(),
        });
    }

    log::debug!("{} {} hashes passed consistency check", tokens.len(), expected);
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uniform_md5() {
        let hashes = tokens(&["a".repeat(32).as_str(), "b".repeat(32).as_str()]);
        let algorithm = validate_consistency(&hashes, Path::new("in.txt")).unwrap();

        assert_eq!(algorithm, HashAlgorithm::Md5);
    }

    #[test]
    fn test_uniform_sha256() {
        let hashes = tokens(&["0".repeat(64).as_str()]);

        assert_eq!(
            validate_consistency(&hashes, Path::new("in.txt")).unwrap(),
            HashAlgorithm::Sha256
        );
    }

    #[test]
    fn test_empty_is_error() {
        let err = validate_consistency(&[], Path::new("in.txt")).unwrap_err();

        assert!(matches!(err, ConvertError::EmptyResult { .. }));
    }

    #[test]
    fn test_mixed_is_error() {
        let sha256 = "c".repeat(64);
        let hashes = tokens(&["a".repeat(32).as_str(), "b".repeat(32).as_str(), sha256.as_str()]);
        let err = validate_consistency(&hashes, Path::new("in.txt")).unwrap_err();

        match err {
            ConvertError::MixedAlgorithm { expected, found, token, .. } => {
                assert_eq!(expected, HashAlgorithm::Md5);
                assert_eq!(found, "SHA-256");
                assert_eq!(token, sha256);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
