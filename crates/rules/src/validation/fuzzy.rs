//! "Did you mean" suggestions for mistyped mode names and record types, and
//! the rule id format check.

/// Closest candidate to `input`, compared case-insensitively.
///
/// Nothing is suggested once more than half of the longer string would have
/// to change. Ties go to the earliest candidate.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let typed = input.to_lowercase();
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(&typed, &candidate.to_lowercase())))
        .min_by_key(|&(_, distance)| distance)
        .filter(|&(candidate, distance)| distance * 2 <= input.len().max(candidate.len()))
        .map(|(candidate, _)| candidate)
}

/// Insertions, deletions and substitutions needed to turn `a` into `b`.
fn edit_distance(a: &str, b: &str) -> usize {
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

/// Rule ids are lowercase words joined by single hyphens, e.g. `dxp-dns`.
pub(crate) fn is_kebab_case(id: &str) -> bool {
    id.split('-').all(|word| {
        !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    })
}
