use crate::core::normalizer::normalize;
use crate::models::{CandidateHit, MovieQuery};

/// Year band of the loose filter (strictly less than)
pub const LOOSE_YEAR_WINDOW: i64 = 10;

/// Year band counted as a close match (strictly less than)
pub const CLOSE_YEAR_WINDOW: i64 = 2;

/// Absolute distance between the query year and the hit's release year
#[inline]
pub fn year_distance(query: &MovieQuery, hit: &CandidateHit) -> Option<i64> {
    hit.release_year
        .map(|release| (i64::from(query.year) - i64::from(release)).abs())
}

/// Release year within the loose band. Unknown years never pass.
#[inline]
pub fn within_loose_window(query: &MovieQuery, hit: &CandidateHit) -> bool {
    year_distance(query, hit).is_some_and(|d| d < LOOSE_YEAR_WINDOW)
}

#[inline]
pub fn is_exact_year(query: &MovieQuery, hit: &CandidateHit) -> bool {
    year_distance(query, hit) == Some(0)
}

#[inline]
pub fn is_close_year(query: &MovieQuery, hit: &CandidateHit) -> bool {
    year_distance(query, hit).is_some_and(|d| d < CLOSE_YEAR_WINDOW)
}

/// Primary title normalizes to `target`
#[inline]
pub fn primary_title_matches(hit: &CandidateHit, target: &str) -> bool {
    normalize(&hit.title) == target
}

/// Primary title or any alternate title normalizes to `target`
pub fn any_title_matches(hit: &CandidateHit, target: &str) -> bool {
    hit.all_titles().any(|title| normalize(title) == target)
}
