//! Edit-distance similarity between two lines

/// `(longer - levenshtein(a, b)) / longer`, over chars. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (longer - distance) as f64 / longer as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(similarity("user.save!", "user.save!"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_disjoint() {
        assert!(similarity("abc", "xyz") < 0.5);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_single_substitution() {
        let s = similarity("kitten", "sitten");
        assert!((s - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(similarity("héllo", "hello"), 0.8);
    }
}
