use thiserror::Error;

/// Errors returned by the places and geocoding clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// No API key is configured. Raised before any request is sent.
    #[error("Google Maps API key not configured; set GOOGLE_MAPS_API_KEY")]
    MissingCredential,

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport failure: timeout, DNS, connection refused or reset.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body does not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A single place record that cannot become a candidate.
    #[error("unusable place record {place_id}: {reason}")]
    Normalization { place_id: String, reason: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PlacesError {
    /// `true` for failures the user may reasonably retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            PlacesError::Network(_) => true,
            PlacesError::Upstream { status, .. } => *status == 429 || *status >= 500,
            PlacesError::MissingCredential
            | PlacesError::Deserialize { .. }
            | PlacesError::Normalization { .. }
            | PlacesError::InvalidBaseUrl { .. } => false,
        }
    }
}
