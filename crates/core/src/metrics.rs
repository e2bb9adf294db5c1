//! Lexical distance metrics

/// Levenshtein distance between two strings, counted in Unicode scalar values
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    strsim::levenshtein(s1, s2)
}
