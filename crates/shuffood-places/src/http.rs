//! Shared `reqwest` plumbing for the places and geocoding clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};

use crate::error::PlacesError;
use crate::types::ErrorEnvelope;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, PlacesError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Wraps a transport failure. The request URL is stripped because the
/// geocoding key travels in the query string.
pub(crate) fn network_error(err: reqwest::Error) -> PlacesError {
    PlacesError::Network(err.without_url())
}

/// Parses `base_url`, ensuring it ends with exactly one slash so that
/// [`Url::join`] appends to the path rather than replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn join(base: &Url, path: &str) -> Result<Url, PlacesError> {
    base.join(path).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Turns a non-success response into [`PlacesError::Upstream`], carrying the
/// service's own message when the body is a recognisable error envelope.
pub(crate) async fn upstream_error(response: Response) -> PlacesError {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback),
        Err(_) => fallback,
    };

    PlacesError::Upstream {
        status: status.as_u16(),
        message,
    }
}
