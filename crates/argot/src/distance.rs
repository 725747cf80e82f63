//! Fuzzy candidate matching for "did you mean ...?" suggestions.

use std::collections::HashSet;

/// Return the candidate most similar to `query`, or `None` when the
/// candidate set is empty.
///
/// Similarity is the Jaccard index over the *sets* of characters of
/// both strings (order-independent, case-sensitive). Candidates are
/// scanned in their natural order and a candidate that ties the best
/// score replaces it, so the last candidate reaching the maximum wins.
///
/// This only ever produces suggestions; it never decides whether a
/// parse succeeds.
pub fn closest<'a, I>(query: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query_set: HashSet<char> = query.chars().collect();
    let mut best_item = None;
    let mut best_score = 0.0_f64;
    for item in candidates {
        let item_set: HashSet<char> = item.chars().collect();
        let intersection = query_set.intersection(&item_set).count();
        let union = query_set.union(&item_set).count();
        let score = intersection as f64 / union as f64;
        if best_score <= score {
            best_score = score;
            best_item = Some(item);
        }
    }
    best_item
}

#[cfg(test)]
mod tests {
    use super::closest;

    #[test]
    fn picks_the_most_similar_candidate() {
        let candidates = ["--test", "--other", "--unrelated"];
        assert_eq!(closest("--tst", candidates), Some("--test"));
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        assert_eq!(closest("anything", std::iter::empty()), None);
    }

    #[test]
    fn ties_keep_the_last_candidate() {
        // Both candidates contain exactly the query's characters.
        assert_eq!(closest("ab", ["ba", "ab"]), Some("ab"));
        assert_eq!(closest("ab", ["ab", "ba"]), Some("ba"));
    }

    #[test]
    fn dissimilar_candidates_are_still_suggested() {
        // Zero overlap still beats the initial score, so a lone
        // candidate is always returned.
        assert_eq!(closest("xyz", ["abc"]), Some("abc"));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(closest("ABC", ["abc", "ABc"]), Some("ABc"));
    }
}
