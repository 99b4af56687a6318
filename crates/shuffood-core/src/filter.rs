//! Pure filter predicates over a fetched candidate list.
//!
//! Each filter keeps the relative order of its input and never mutates it, so
//! the whole pipeline can be re-run against the same fetched list whenever a
//! filter value changes. The three predicates commute.

use std::collections::BTreeSet;

use crate::cuisine::CategoryMatcher;
use crate::types::{Candidate, QueryFilters};

/// Keep candidates no farther than `max_miles` from the search origin.
#[must_use]
pub fn by_distance(candidates: &[Candidate], max_miles: f64) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|c| c.distance_miles <= max_miles)
        .cloned()
        .collect()
}

/// Keep candidates rated at least `min_rating`. A floor of zero keeps
/// everything, unrated venues included.
#[must_use]
pub fn by_min_rating(candidates: &[Candidate], min_rating: f64) -> Vec<Candidate> {
    if min_rating <= 0.0 {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .filter(|c| c.rating >= min_rating)
        .cloned()
        .collect()
}

/// Drop candidates that `matcher` places in any of the `excluded` categories.
#[must_use]
pub fn by_excluded_categories<M>(
    candidates: &[Candidate],
    excluded: &BTreeSet<String>,
    matcher: &M,
) -> Vec<Candidate>
where
    M: CategoryMatcher + ?Sized,
{
    if excluded.is_empty() {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .filter(|c| !matcher.excludes(c, excluded))
        .cloned()
        .collect()
}

/// Apply all three filters from `filters`.
#[must_use]
pub fn apply_filters<M>(candidates: &[Candidate], filters: &QueryFilters, matcher: &M) -> Vec<Candidate>
where
    M: CategoryMatcher + ?Sized,
{
    let within = by_distance(candidates, filters.radius_miles());
    let rated = by_min_rating(&within, filters.min_rating());
    by_excluded_categories(&rated, filters.excluded_categories(), matcher)
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
