//! Domain value types shared by the fetcher, filter pipeline and selector.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::CoreError;

/// Upper bound of the places service's rating scale.
pub const MAX_RATING: f64 = 5.0;

const DEFAULT_RADIUS_MILES: f64 = 10.0;

/// A WGS84 latitude/longitude pair.
///
/// Construct through [`Coordinate::new`], which rejects out-of-range and
/// non-finite values. Once built the value never changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either component is
    /// non-finite or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CoreError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One restaurant returned by the places service.
///
/// `distance_miles` is measured from the origin of the search that produced
/// this record. It is never recomputed; a new origin requires a new search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Formatted street address; empty when the service omits it.
    pub address: String,
    /// Rating in `[0, 5]`. Zero means the venue has no rating yet.
    pub rating: f64,
    pub location: Coordinate,
    pub distance_miles: f64,
    /// Free-form place type tags, e.g. `"sushi_restaurant"`.
    pub category_tags: BTreeSet<String>,
}

impl Candidate {
    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// Search radius, rating floor and cuisine exclusions for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilters {
    radius_miles: f64,
    min_rating: f64,
    excluded_categories: BTreeSet<String>,
}

impl QueryFilters {
    /// Builds validated filters. Category keys are lowercased and trimmed;
    /// blank keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] or [`CoreError::InvalidRating`]
    /// when a value is out of range.
    pub fn new<I, S>(radius_miles: f64, min_rating: f64, excluded: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Self::default();
        filters.set_radius_miles(radius_miles)?;
        filters.set_min_rating(min_rating)?;
        filters.excluded_categories = excluded
            .into_iter()
            .filter_map(|c| normalize_category(c.as_ref()))
            .collect();
        Ok(filters)
    }

    #[must_use]
    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    /// Minimum rating; `0` means no floor.
    #[must_use]
    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    #[must_use]
    pub fn excluded_categories(&self) -> &BTreeSet<String> {
        &self.excluded_categories
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] unless `radius_miles` is finite
    /// and strictly positive.
    pub fn set_radius_miles(&mut self, radius_miles: f64) -> Result<(), CoreError> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(CoreError::InvalidRadius(radius_miles));
        }
        self.radius_miles = radius_miles;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRating`] unless `min_rating` is within
    /// `[0, 5]`.
    pub fn set_min_rating(&mut self, min_rating: f64) -> Result<(), CoreError> {
        if !(0.0..=MAX_RATING).contains(&min_rating) {
            return Err(CoreError::InvalidRating(min_rating));
        }
        self.min_rating = min_rating;
        Ok(())
    }

    /// The same radius with no rating floor and no exclusions: what a fetch
    /// needs so that later filter edits can be applied locally.
    #[must_use]
    pub fn radius_only(&self) -> Self {
        Self {
            radius_miles: self.radius_miles,
            ..Self::default()
        }
    }

    /// Adds the category if absent, removes it if present. Returns `true`
    /// when the category is excluded after the call.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let Some(key) = normalize_category(category) else {
            return false;
        };
        if self.excluded_categories.remove(&key) {
            false
        } else {
            self.excluded_categories.insert(key);
            true
        }
    }
}

impl Default for QueryFilters {
    fn default() -> Self {
        Self {
            radius_miles: DEFAULT_RADIUS_MILES,
            min_rating: 0.0,
            excluded_categories: BTreeSet::new(),
        }
    }
}

fn normalize_category(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}
