//! Incremental fuzzy ranking of package names.
//!
//! A candidate matches when every query character appears in it in order, ignoring
//! case. Matches are scored by their longest contiguous run, the gaps between
//! matched characters, a prefix bonus and the amount of unmatched text.

use std::cmp::Reverse;

const PREFIX_BONUS: i64 = 120;
const RUN_WEIGHT: i64 = 20;
const GAP_WEIGHT: i64 = 2;

/// Result of matching one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub score: i64,
    /// Character indices of the matched characters in the candidate.
    pub positions: Vec<usize>,
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercases `text`, pairing each folded character with the index of the
/// character it came from. Some characters lowercase to several.
fn fold_indexed(text: &str) -> (Vec<char>, Vec<usize>) {
    text.chars()
        .enumerate()
        .flat_map(|(index, c)| c.to_lowercase().map(move |lower| (lower, index)))
        .unzip()
}

/// Matches `query` against `candidate`, returning the score and matched positions.
///
/// Characters are matched greedily left to right. An empty (or all-whitespace)
/// query matches everything with score 0.
#[must_use]
pub fn fuzzy_match(query: &str, candidate: &str) -> Option<Match> {
    let query = fold(query.trim());
    if query.is_empty() {
        return Some(Match {
            score: 0,
            positions: Vec::new(),
        });
    }

    let (haystack, origins) = fold_indexed(candidate);
    let mut positions = Vec::with_capacity(query.len());
    let mut cursor = 0;
    let mut gaps: i64 = 0;
    let mut run: i64 = 0;
    let mut longest_run: i64 = 0;

    for needle in &query {
        let offset = haystack[cursor..].iter().position(|c| c == needle)?;
        let index = cursor + offset;

        if let Some(&previous) = positions.last() {
            let gap = index - previous - 1;
            gaps += i64::try_from(gap).unwrap_or(i64::MAX / 4);
            run = if gap == 0 { run + 1 } else { 1 };
        } else {
            run = 1;
        }
        longest_run = longest_run.max(run);
        positions.push(index);
        cursor = index + 1;
    }

    let prefix_bonus = if haystack.starts_with(&query) {
        PREFIX_BONUS
    } else {
        0
    };
    let slack = i64::try_from(haystack.len().saturating_sub(query.len())).unwrap_or(i64::MAX / 4);

    let mut positions: Vec<usize> = positions.into_iter().map(|index| origins[index]).collect();
    positions.dedup();

    Some(Match {
        score: prefix_bonus + longest_run * RUN_WEIGHT - gaps * GAP_WEIGHT - slack,
        positions,
    })
}

/// Scores a candidate, or returns `None` when the query is not a subsequence of it.
///
/// # Example
///
/// ```
/// use conda_browse::app::search::score;
///
/// assert_eq!(score("", "numpy"), Some(0));
/// assert!(score("pand", "numpy").is_none());
/// assert!(score("pand", "pandas") > score("pand", "geopandas"));
/// ```
#[must_use]
pub fn score(query: &str, candidate: &str) -> Option<i64> {
    fuzzy_match(query, candidate).map(|m| m.score)
}

/// Filters and ranks candidates: highest score first, ties by name ascending.
///
/// With an empty query every candidate is kept in name order.
#[must_use]
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<String> {
    let _span = tracing::debug_span!(
        "rank",
        candidate_count = candidates.len(),
        query_len = query.len()
    )
    .entered();

    let mut scored: Vec<(i64, &str)> = candidates
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|name| score(query, name).map(|s| (s, name)))
        .collect();

    scored.sort_by_key(|&(score, name)| (Reverse(score), name));

    tracing::debug!(match_count = scored.len(), "ranked candidates");
    scored.into_iter().map(|(_, name)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything_with_zero() {
        assert_eq!(score("", "anything"), Some(0));
        assert_eq!(score("   ", "anything"), Some(0));
    }

    #[test]
    fn non_subsequence_is_rejected() {
        assert_eq!(score("pand", "numpy"), None);
        assert_eq!(score("ba", "ab"), None);
        assert_eq!(score("aa", "a"), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(score("PyThOn", "python"), score("python", "python"));
        assert!(score("qt", "PyQt5").is_some());
    }

    #[test]
    fn score_combines_prefix_run_gap_and_length() {
        // prefix bonus, run of 4, no gaps, 2 unmatched characters
        assert_eq!(score("pand", "pandas"), Some(120 + 80 - 2));
        // no prefix, runs of 1, two gaps of 1, 2 unmatched characters
        assert_eq!(score("nmy", "numpy"), Some(20 - 2 * 2 - 2));
    }

    #[test]
    fn longer_runs_score_higher() {
        let spread = score("abc", "axbxcx").unwrap_or(i64::MIN);
        let tight = score("abc", "abcxxx").unwrap_or(i64::MIN);
        assert!(tight > spread);
    }

    #[test]
    fn positions_follow_greedy_match() {
        let found = fuzzy_match("np", "numpy").map(|m| m.positions);
        assert_eq!(found, Some(vec![0, 3]));
    }

    #[test]
    fn positions_index_original_characters() {
        // 'İ' lowercases to two characters
        let found = fuzzy_match("ix", "İx-tools").map(|m| m.positions);
        assert_eq!(found, Some(vec![0, 1]));
        let found = fuzzy_match("t", "İİt").map(|m| m.positions);
        assert_eq!(found, Some(vec![2]));
    }

    #[test]
    fn ranks_by_score_then_name() {
        let names = ["numpy", "pandoc", "geopandas", "pandas", "pandas-stubs"];
        let ranked = rank("pand", &names);
        assert_eq!(ranked, vec!["pandas", "pandoc", "pandas-stubs", "geopandas"]);
    }

    #[test]
    fn empty_query_ranks_alphabetically() {
        let ranked = rank("", &["b", "a", "c"]);
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }
}
