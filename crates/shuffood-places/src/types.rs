//! Wire types for the places `searchNearby` and geocoding endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub location_restriction: LocationRestriction,
    pub included_types: Vec<String>,
    pub excluded_types: Vec<String>,
    pub max_result_count: u32,
    pub language_code: String,
    pub rank_preference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub center: LatLng,
    /// Radius in meters.
    pub radius: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

/// One place record. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Option<String>,
    /// Resource name, `places/{id}`.
    pub name: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<LatLng>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

/// Google-style error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}
