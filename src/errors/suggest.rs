use strsim::levenshtein;

/// Up to 3 candidates closest to `needle` by edit distance.
pub fn suggest<'a>(needle: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let needle = needle.trim();
    if needle.is_empty() {
        return vec![];
    }

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| !candidate.is_empty() && *candidate != needle)
        .map(|candidate| (levenshtein(needle, candidate), candidate))
        .collect();

    let max_distance = match needle.len() {
        0..=3 => 1,
        4..=6 => 2,
        _ => 3,
    };

    scored.retain(|(distance, _)| *distance <= max_distance);
    scored.sort_by(|(da, a), (db, b)| da.cmp(db).then(a.len().cmp(&b.len())).then(a.cmp(b)));
    scored.dedup_by(|(_, a), (_, b)| a == b);

    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

pub fn did_you_mean<'a>(
    needle: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let suggestions = suggest(needle, candidates);
    match suggestions.len() {
        0 => None,
        1 => Some(format!("did you mean `{}`?", suggestions[0])),
        _ => Some(format!(
            "did you mean one of: {}?",
            suggestions
                .iter()
                .map(|suggestion| format!("`{}`", suggestion))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}
