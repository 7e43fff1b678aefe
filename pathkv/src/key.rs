//! Key canonicalization.
//!
//! Keys are printable paths, segments separated by `/`. Leading,
//! trailing, and repeated separators collapse: `/a//b/` and `a/b`
//! name the same key.

pub const SEPARATOR: char = '/';

/// Splits a raw key string into canonical, non-empty segments.
pub fn segments(raw: &str) -> Vec<&str> {
    raw.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Canonicalizes a raw key string back into its normalized `/`-joined form.
pub fn canonicalize(raw: &str) -> String {
    segments(raw).join(&SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separators() {
        assert_eq!(canonicalize("/a//b/"), "a/b");
        assert_eq!(canonicalize("a/b"), "a/b");
        assert_eq!(canonicalize("x//y///w/a////b"), "x/y/w/a/b");
    }

    #[test]
    fn empty_key_canonicalizes_to_empty() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("///"), "");
    }

    #[test]
    fn single_segment() {
        assert_eq!(segments("x"), vec!["x"]);
    }
}
