//! HTTP client for the places `searchNearby` endpoint.
//!
//! One call is one POST: the search circle, baseline and caller exclusions,
//! and a distance ranking go out; normalized [`Candidate`]s with their
//! distance from the origin come back. No retries happen here.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::{Client, Url};
use shuffood_core::{
    miles_to_meters, AppConfig, Candidate, CategoryMatcher, Coordinate, CuisineTable, QueryFilters,
    BASELINE_EXCLUDED_TYPES,
};

use crate::error::PlacesError;
use crate::http;
use crate::normalize::normalize_place;
use crate::types::{Circle, LatLng, LocationRestriction, SearchNearbyRequest, SearchNearbyResponse};
use crate::CandidateSource;

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const SEARCH_NEARBY_PATH: &str = "v1/places:searchNearby";
const FIELD_MASK: &str = "places.id,places.name,places.displayName,places.formattedAddress,places.rating,places.location,places.types";

/// Upper bound the service accepts for a search circle.
const MAX_RADIUS_METERS: f64 = 50_000.0;
pub const MAX_RESULT_COUNT: u32 = 20;

/// Client for the places nearby-search API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests. A client without an API key can be
/// built; every search then fails with [`PlacesError::MissingCredential`]
/// before touching the network.
pub struct PlacesClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
    matcher: Arc<dyn CategoryMatcher>,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Network`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = http::build_client(timeout_secs, user_agent)?;
        let base = http::parse_base_url(base_url)?;
        let endpoint = http::join(&base, SEARCH_NEARBY_PATH)?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            endpoint,
            matcher: Arc::new(CuisineTable::builtin()),
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            config.google_maps_api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
            &config.places_base_url,
        )
    }

    /// Replaces the matcher used to translate excluded categories into
    /// structured place types for server-side exclusion.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Arc<dyn CategoryMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Searches for restaurants within `filters.radius_miles()` of `origin`.
    ///
    /// Candidates rated below a non-zero `filters.min_rating()` are dropped.
    /// Records that cannot be normalized, and repeated ids, are skipped with
    /// a warning. The service's distance ordering is passed through but
    /// callers must not depend on it.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingCredential`] if no API key is configured.
    /// - [`PlacesError::Upstream`] on a non-success HTTP status.
    /// - [`PlacesError::Network`] on timeout or transport failure.
    /// - [`PlacesError::Deserialize`] if a success body has the wrong shape.
    pub async fn search_nearby(
        &self,
        origin: Coordinate,
        filters: &QueryFilters,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(PlacesError::MissingCredential);
        };

        let request = self.build_request(origin, filters);
        tracing::debug!(
            origin = %origin,
            radius_m = request.location_restriction.circle.radius,
            excluded = ?request.excluded_types,
            "places searchNearby request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await
            .map_err(http::network_error)?;

        if !response.status().is_success() {
            let err = http::upstream_error(response).await;
            tracing::warn!(error = %err, "places searchNearby failed");
            return Err(err);
        }

        let body = response.text().await.map_err(http::network_error)?;
        let parsed: SearchNearbyResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: "places:searchNearby".to_owned(),
                source: e,
            })?;

        let raw_count = parsed.places.len();
        let candidates = Self::collect_candidates(parsed, origin, filters.min_rating());
        tracing::info!(
            raw = raw_count,
            kept = candidates.len(),
            "places searchNearby complete"
        );
        Ok(candidates)
    }

    fn collect_candidates(
        response: SearchNearbyResponse,
        origin: Coordinate,
        min_rating: f64,
    ) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        response
            .places
            .into_iter()
            .filter_map(|place| match normalize_place(place, origin) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping place record");
                    None
                }
            })
            .filter(|c| {
                let fresh = seen.insert(c.id.clone());
                if !fresh {
                    tracing::warn!(id = %c.id, "skipping duplicate place id");
                }
                fresh
            })
            .filter(|c| min_rating <= 0.0 || c.rating >= min_rating)
            .collect()
    }

    /// Builds the request body. Caller exclusions are sent only when the
    /// matcher knows a structured place type for them; the rest are left to
    /// the client-side filter pipeline.
    pub(crate) fn build_request(&self, origin: Coordinate, filters: &QueryFilters) -> SearchNearbyRequest {
        let requested = miles_to_meters(filters.radius_miles());
        let radius = requested.min(MAX_RADIUS_METERS);
        if radius < requested {
            tracing::warn!(
                requested_m = requested,
                radius_m = radius,
                "search radius exceeds service maximum; clamping"
            );
        }

        let mut excluded_types: Vec<String> = BASELINE_EXCLUDED_TYPES
            .iter()
            .map(|t| (*t).to_owned())
            .collect();
        for category in filters.excluded_categories() {
            if let Some(place_type) = self.matcher.place_type(category) {
                if !excluded_types.iter().any(|t| t == place_type) {
                    excluded_types.push(place_type.to_owned());
                }
            }
        }

        SearchNearbyRequest {
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: origin.latitude(),
                        longitude: origin.longitude(),
                    },
                    radius,
                },
            },
            included_types: vec!["restaurant".to_owned()],
            excluded_types,
            max_result_count: MAX_RESULT_COUNT,
            language_code: "en".to_owned(),
            rank_preference: "DISTANCE".to_owned(),
        }
    }
}

impl CandidateSource for PlacesClient {
    async fn search_nearby(
        &self,
        origin: Coordinate,
        filters: &QueryFilters,
    ) -> Result<Vec<Candidate>, PlacesError> {
        PlacesClient::search_nearby(self, origin, filters).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
