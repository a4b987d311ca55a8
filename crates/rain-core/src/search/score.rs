//! Approximate string matching used by the schema index.
//!
//! A field's score is the fewest edits needed to turn the query into some
//! substring of the field, divided by the query length: `0.0` is an exact
//! substring hit, `1.0` means nothing in common.

/// Minimal edit distance between `pattern` and any substring of `text`.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    // Row 0 is all zeros: a match may start anywhere in `text`.
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for &t in text {
        let mut cur = vec![0usize; m + 1];
        for i in 1..=m {
            let substitution = prev[i - 1] + usize::from(pattern[i - 1] != t);
            cur[i] = substitution.min(prev[i] + 1).min(cur[i - 1] + 1);
        }
        best = best.min(cur[m]);
        prev = cur;
    }

    best
}

/// Normalized score in `0.0..=1.0`, case-insensitive.
pub fn field_score(query: &[char], field: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let text: Vec<char> = field.chars().flat_map(char::to_lowercase).collect();
    let distance = substring_distance(query, &text).min(query.len());
    distance as f64 / query.len() as f64
}

/// Lowercased query characters, ready for [`field_score`].
pub fn normalize_query(query: &str) -> Vec<char> {
    query.trim().chars().flat_map(char::to_lowercase).collect()
}
