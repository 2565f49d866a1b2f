use crate::models::{CandidateHit, MovieQuery, ScorePair};
use crate::core::{
    filters::{any_title_matches, is_close_year, is_exact_year, primary_title_matches, within_loose_window},
    normalizer::normalize,
    overrides::OverrideTable,
};

/// Result of the matching process
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Matched(&'a CandidateHit),
    NoMatch,
}

impl<'a> MatchResult<'a> {
    pub fn hit(&self) -> Option<&'a CandidateHit> {
        match self {
            MatchResult::Matched(hit) => Some(hit),
            MatchResult::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    /// Scores of the selected hit, empty when nothing matched
    pub fn scores(&self) -> ScorePair {
        self.hit().map(CandidateHit::scores).unwrap_or_default()
    }
}

/// A hit that survived the loose filter
struct LooseMatch<'a> {
    hit: &'a CandidateHit,
    primary_title: bool,
}

/// Picks the one search hit that is the queried movie
///
/// # Pipeline Stages
/// 1. Loose filter: release year within the loose band and any title equal
///    to the query title once normalized
/// 2. Ranked selection, first rule with a candidate wins:
///    exact year, close year, exact primary title, first survivor
///
/// Within every rule the earliest hit in upstream order wins.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    overrides: OverrideTable,
}

impl Matcher {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    pub fn with_default_overrides() -> Self {
        Self::new(OverrideTable::with_defaults())
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Fixed scores for the query, if it is listed in the override table
    pub fn lookup_override(&self, query: &MovieQuery) -> Option<&ScorePair> {
        self.overrides.lookup(query)
    }

    /// Select the best candidate for the query
    pub fn find_match<'a>(&self, query: &MovieQuery, candidates: &'a [CandidateHit]) -> MatchResult<'a> {
        let target = normalize(&query.title);

        let survivors: Vec<LooseMatch<'a>> = candidates
            .iter()
            .filter(|hit| within_loose_window(query, hit) && any_title_matches(hit, &target))
            .map(|hit| LooseMatch {
                hit,
                primary_title: primary_title_matches(hit, &target),
            })
            .collect();

        let selected = survivors
            .iter()
            .find(|m| is_exact_year(query, m.hit))
            .or_else(|| survivors.iter().find(|m| is_close_year(query, m.hit)))
            .or_else(|| survivors.iter().find(|m| m.primary_title))
            .or_else(|| survivors.first());

        match selected {
            Some(m) => {
                tracing::debug!(
                    "Matched {} ({}) to {:?} ({:?}) among {} of {} hits",
                    query.title,
                    query.year,
                    m.hit.title,
                    m.hit.release_year,
                    survivors.len(),
                    candidates.len()
                );
                MatchResult::Matched(m.hit)
            }
            None => MatchResult::NoMatch,
        }
    }

    /// Scores for the query: the override entry when listed, otherwise the
    /// scores of the selected candidate
    pub fn resolve(&self, query: &MovieQuery, candidates: &[CandidateHit]) -> ScorePair {
        if let Some(scores) = self.lookup_override(query) {
            return scores.clone();
        }
        self.find_match(query, candidates).scores()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(title: &str, year: i32) -> MovieQuery {
        MovieQuery::new(title, year).unwrap()
    }

    fn candidate(title: &str, year: i32, critics: u32) -> CandidateHit {
        CandidateHit::new(title, Some(year)).with_scores(Some(critics.into()), None)
    }

    #[test]
    fn test_empty_candidates() {
        let matcher = Matcher::with_default_overrides();
        let result = matcher.find_match(&query("Heat", 1995), &[]);

        assert_eq!(result, MatchResult::NoMatch);
        assert!(result.scores().is_empty());
    }

    #[test]
    fn test_exact_year_beats_order() {
        let matcher = Matcher::default();
        let candidates = vec![candidate("X", 2001, 1), candidate("X", 2000, 2)];

        let result = matcher.find_match(&query("X", 2000), &candidates);

        assert_eq!(result.hit(), Some(&candidates[1]));
    }

    #[test]
    fn test_close_year_beats_primary_title() {
        let matcher = Matcher::default();
        let candidates = vec![
            candidate("Heat", 2004, 1),
            CandidateHit::new("Heat (Re-release)", Some(1996)).with_aka_titles(["Heat"]),
        ];

        let result = matcher.find_match(&query("Heat", 1995), &candidates);

        assert_eq!(result.hit(), Some(&candidates[1]));
    }

    #[test]
    fn test_primary_title_beats_alias() {
        let matcher = Matcher::default();
        let candidates = vec![
            CandidateHit::new("Heat Wave", Some(1990)).with_aka_titles(["Heat"]),
            candidate("Heat", 2000, 2),
        ];

        let result = matcher.find_match(&query("Heat", 1995), &candidates);

        assert_eq!(result.hit(), Some(&candidates[1]));
    }

    #[test]
    fn test_first_survivor_fallback() {
        let matcher = Matcher::default();
        let candidates = vec![
            CandidateHit::new("Heat Wave", Some(1995)).with_aka_titles(["Heat"]),
            CandidateHit::new("Summer Heat", Some(2005)).with_aka_titles(["Heat"]),
        ];

        let result = matcher.find_match(&query("Heat", 2000), &candidates);

        assert_eq!(result.hit(), Some(&candidates[0]));
    }

    #[test]
    fn test_filters_titles_and_years() {
        let matcher = Matcher::default();
        let candidates = vec![
            candidate("Heat", 1985, 1),
            candidate("Cold", 1995, 2),
            CandidateHit::new("Heat", None),
        ];

        assert_eq!(matcher.find_match(&query("Heat", 1995), &candidates), MatchResult::NoMatch);
    }

    #[test]
    fn test_resolve_prefers_override() {
        let matcher = Matcher::with_default_overrides();
        let candidates = vec![candidate("9", 2009, 10)];

        let scores = matcher.resolve(&query("9", 2009), &candidates);

        assert_eq!(scores, ScorePair::from_values(57, 56));
    }

    #[test]
    fn test_find_match_is_deterministic() {
        let matcher = Matcher::default();
        let candidates = vec![candidate("Heat", 1994, 1), candidate("Heat", 1996, 2)];
        let q = query("Heat", 1995);

        let first = matcher.find_match(&q, &candidates);
        let second = matcher.find_match(&q, &candidates);

        assert_eq!(first, second);
        assert_eq!(first.hit(), Some(&candidates[0]));
    }
}
