//! Closest-name suggestions for misspelled categories and profiles.

use strsim::levenshtein;

use crate::constants::SIMILARITY_THRESHOLD_PERCENT;

/// The candidate closest to `target` by Levenshtein distance, if it is within
/// the similarity threshold.
pub fn closest_match<'a, I>(target: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let limit = (target.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);

    candidates
        .into_iter()
        .map(|candidate| (candidate, levenshtein(target, candidate)))
        .filter(|(_, distance)| *distance <= limit)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}
