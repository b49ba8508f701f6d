//! "Did you mean" hints for misspelled kinds and metric names, plus the
//! document id format check.

/// Closest candidate by case-insensitive edit distance, if it is within
/// half the length of the longer string.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .iter()
        .map(|&c| (c, levenshtein(&needle, &c.to_lowercase())))
        // min_by_key keeps the first of equally close candidates.
        .min_by_key(|&(_, dist)| dist)
        .filter(|&(c, dist)| dist <= input.len().max(c.len()) / 2)
        .map(|(c, _)| c)
}

/// `" (did you mean 'x'?)"` or an empty string.
pub(crate) fn did_you_mean(input: &str, candidates: &[&str]) -> String {
    fuzzy_match(input, candidates)
        .map(|hint| format!(" (did you mean '{}'?)", hint))
        .unwrap_or_default()
}

/// Edit distance with unit insert/delete/substitute costs.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Lowercase alphanumeric segments joined by single hyphens.
pub(crate) fn is_kebab_case(s: &str) -> bool {
    !s.is_empty()
        && s.split('-').all(|segment| {
            !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}
