//! Canonical form for hash lists
//!
//! Uppercases tokens, then applies the optional sort and dedup policies.

use crate::dedup::{dedup_sorted, dedup_unsorted};

/// How the collected tokens are arranged before writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Sort ascending (lexicographic, which is numeric order for uppercase hex)
    pub sort: bool,
    /// Drop repeated tokens, keeping the first occurrence
    pub dedup: bool,
}

/// Outcome of normalization
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub hashes: Vec<String>,
    pub duplicates_removed: usize,
}

/// Bring `tokens` into canonical form
///
/// Sorting alone never removes duplicates; only `dedup` does.
pub fn normalize(tokens: Vec<String>, options: NormalizeOptions) -> Normalized {
    let mut hashes: Vec<String> = tokens
        .into_iter()
        .map(|mut t| {
            t.make_ascii_uppercase();
            t
        })
        .collect();

    let duplicates_removed = match (options.sort, options.dedup) {
        (true, true) => {
            hashes.sort_unstable();
            dedup_sorted(&mut hashes)
        }
        (true, false) => {
            hashes.sort_unstable();
            0
        }
        (false, true) => dedup_unsorted(&mut hashes),
        (false, false) => 0,
    };

    log::debug!(
        "Normalized {} hashes (sort: {}, dedup: {}, removed: {})",
        hashes.len(),
        options.sort,
        options.dedup,
        duplicates_removed
    );

    Normalized {
        hashes,
        duplicates_removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md5s(prefixes: &[&str]) -> Vec<String> {
        prefixes.iter().map(|p| p.repeat(16)).collect()
    }

    #[test]
    fn test_uppercases() {
        let out = normalize(
            vec!["d41d8cd98f00b204e9800998ecf8427e".to_string()],
            NormalizeOptions::default(),
        );

        assert_eq!(out.hashes, vec!["D41D8CD98F00B204E9800998ECF8427E"]);
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let out = normalize(md5s(&["ff", "00", "ff", "aa"]), NormalizeOptions::default());

        assert_eq!(out.hashes, md5s(&["FF", "00", "FF", "AA"]));
        assert_eq!(out.duplicates_removed, 0);
    }

    #[test]
    fn test_sort_keeps_duplicates() {
        let options = NormalizeOptions { sort: true, dedup: false };
        let out = normalize(md5s(&["FF", "00", "AA", "00"]), options);

        assert_eq!(out.hashes, md5s(&["00", "00", "AA", "FF"]));
    }

    #[test]
    fn test_sort_orders_ascending() {
        let options = NormalizeOptions { sort: true, dedup: false };
        let out = normalize(md5s(&["FF", "00", "AA"]), options);

        assert_eq!(out.hashes, md5s(&["00", "AA", "FF"]));
    }

    #[test]
    fn test_sort_and_dedup() {
        let options = NormalizeOptions { sort: true, dedup: true };
        let out = normalize(md5s(&["ff", "00", "FF", "aa", "00"]), options);

        assert_eq!(out.hashes, md5s(&["00", "AA", "FF"]));
        assert_eq!(out.duplicates_removed, 2);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let options = NormalizeOptions { sort: false, dedup: true };
        let out = normalize(md5s(&["ff", "00", "FF", "aa"]), options);

        assert_eq!(out.hashes, md5s(&["FF", "00", "AA"]));
        assert_eq!(out.duplicates_removed, 1);
    }
}
