//! Fuzzy title matching.
//!
//! Integer similarity in [0, 100] between a user-supplied fragment and
//! catalog titles, built from Levenshtein ratios. Case-insensitive;
//! identity scores 100 and a fragment contained in a title scores at
//! least 90, so substrings always clear the application threshold.

/// Maximum candidates returned by a ranking call.
pub const MATCH_LIMIT: usize = 5;

/// Minimum similarity a candidate must reach to be shown. Applied
/// after ranking: if everything ranks below it, the result is empty.
pub const MATCH_THRESHOLD: u8 = 70;

/// One scored candidate title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub title: String,
    pub score: u8,
}

/// Similarity between a fragment and a candidate title, in [0, 100].
pub fn similarity(fragment: &str, candidate: &str) -> u8 {
    let a: Vec<char> = fragment.to_lowercase().chars().collect();
    let b: Vec<char> = candidate.to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let full = ratio(&a, &b);
    // A window match on a short fragment is weaker evidence than a
    // whole-string match, so the partial ratio is discounted.
    let partial = (partial_ratio(&a, &b) as u32 * 9 / 10) as u8;

    full.max(partial)
}

/// Score the fragment against every title and return the top `limit`,
/// descending by score. The sort is stable, so ties keep the original
/// candidate order.
pub fn best_matches(fragment: &str, titles: &[String], limit: usize) -> Vec<TitleMatch> {
    let mut matches: Vec<TitleMatch> = titles
        .iter()
        .map(|title| TitleMatch {
            title: title.clone(),
            score: similarity(fragment, title),
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

/// Drop matches scoring below `threshold`, keeping the ranked order.
pub fn filter_ranked(matches: Vec<TitleMatch>, threshold: u8) -> Vec<TitleMatch> {
    matches
        .into_iter()
        .filter(|m| m.score >= threshold)
        .collect()
}

/// Levenshtein ratio scaled to [0, 100].
fn ratio(a: &[char], b: &[char]) -> u8 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100;
    }
    let distance = levenshtein(a, b);
    ((max_len - distance) * 100 / max_len) as u8
}

/// Best ratio of the shorter string against any same-length window of
/// the longer one. An exact substring yields 100.
fn partial_ratio(a: &[char], b: &[char]) -> u8 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut best = 0;
    for start in 0..=(long.len() - short.len()) {
        let window = &long[start..start + short.len()];
        best = best.max(ratio(short, window));
        if best == 100 {
            break;
        }
    }
    best
}

/// Levenshtein edit distance between two strings.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
