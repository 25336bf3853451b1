//! "Did you mean" hints for mistyped palette and key names

/// Most suggestions returned by [`suggest`].
const MAX_SUGGESTIONS: usize = 3;

/// Edit distance between two strings (insertions, deletions and
/// substitutions each cost one).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();

    // Single rolling row over `b`
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Candidates within `max_distance` of `query`, closest first.
///
/// Comparison ignores case (Unicode lowercase); ties keep the candidates' order.
pub fn suggest<'a>(query: &str, candidates: &[&'a str], max_distance: usize) -> Vec<&'a str> {
    let query = query.to_lowercase();

    let mut scored: Vec<(usize, &'a str)> = candidates
        .iter()
        .map(|&c| (levenshtein_distance(&query, &c.to_lowercase()), c))
        .filter(|&(distance, _)| distance <= max_distance)
        .collect();

    scored.sort_by_key(|&(distance, _)| distance);
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, c)| c).collect()
}

/// Render suggestions as a sentence, or `None` when there are none.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{}'", s)).collect();
    match quoted.as_slice() {
        [] => None,
        [one] => Some(format!("Did you mean {}?", one)),
        [first, second] => Some(format!("Did you mean {} or {}?", first, second)),
        [init @ .., last] => Some(format!("Did you mean {}, or {}?", init.join(", "), last)),
    }
}
