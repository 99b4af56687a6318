//! Reverse geocoding for a human-readable "you are here" label.
//!
//! Purely cosmetic: nothing in filtering or selection depends on it, so
//! [`GeocodeClient::label_or_coordinates`] never fails.

use reqwest::{Client, Url};
use shuffood_core::{AppConfig, Coordinate};

use crate::error::PlacesError;
use crate::http;
use crate::types::{GeocodeResponse, GeocodeResult};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const GEOCODE_PATH: &str = "maps/api/geocode/json";

pub struct GeocodeClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
}

impl GeocodeClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Network`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

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
        let endpoint = http::join(&base, GEOCODE_PATH)?;
        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            endpoint,
        })
    }

    /// # Errors
    ///
    /// See [`GeocodeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            config.google_maps_api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
            &config.geocode_base_url,
        )
    }

    /// Looks up a display label for `coordinate`.
    ///
    /// `ZERO_RESULTS` is not an error: the label falls back to the
    /// coordinate itself.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingCredential`] if no API key is configured.
    /// - [`PlacesError::Upstream`] on a non-success HTTP status or an error
    ///   status in the response envelope.
    /// - [`PlacesError::Network`] on transport failure.
    /// - [`PlacesError::Deserialize`] if the body has the wrong shape.
    pub async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String, PlacesError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(PlacesError::MissingCredential);
        };

        let url = self.build_url(coordinate, api_key);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(http::network_error)?;
        if !response.status().is_success() {
            return Err(http::upstream_error(response).await);
        }

        let body = response.text().await.map_err(http::network_error)?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: "geocode".to_owned(),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(place_label(&parsed.results, coordinate)),
            status => Err(PlacesError::Upstream {
                status: 200,
                message: parsed
                    .error_message
                    .unwrap_or_else(|| status.to_owned()),
            }),
        }
    }

    /// Like [`GeocodeClient::reverse_geocode`], but any failure yields the
    /// coordinate string instead.
    pub async fn label_or_coordinates(&self, coordinate: Coordinate) -> String {
        match self.reverse_geocode(coordinate).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding failed; using coordinates");
                coordinate.to_string()
            }
        }
    }

    fn build_url(&self, coordinate: Coordinate, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(
                "latlng",
                &format!("{},{}", coordinate.latitude(), coordinate.longitude()),
            )
            .append_pair("key", api_key);
        url
    }
}

/// Picks a label from geocoding results: the first locality name, else the
/// first comma-separated segment of the first formatted address, else the
/// coordinate to four decimal places.
#[must_use]
pub fn place_label(results: &[GeocodeResult], coordinate: Coordinate) -> String {
    let locality = results
        .iter()
        .flat_map(|r| &r.address_components)
        .find(|c| c.types.iter().any(|t| t == "locality"))
        .map(|c| c.long_name.trim())
        .filter(|name| !name.is_empty());
    if let Some(name) = locality {
        return name.to_owned();
    }

    let first_segment = results
        .first()
        .and_then(|r| r.formatted_address.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(segment) = first_segment {
        return segment.to_owned();
    }

    coordinate.to_string()
}
