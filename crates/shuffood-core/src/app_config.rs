use std::path::PathBuf;

use crate::types::Coordinate;

#[derive(Clone)]
pub struct AppConfig {
    pub google_maps_api_key: Option<String>,
    pub log_level: String,
    pub places_base_url: String,
    pub geocode_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Origin used when the location provider cannot supply one.
    pub fallback_origin: Coordinate,
    pub default_radius_miles: f64,
    pub cuisines_path: Option<PathBuf>,
    pub shuffle_ticks: u32,
    pub shuffle_tick_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("places_base_url", &self.places_base_url)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fallback_origin", &self.fallback_origin)
            .field("default_radius_miles", &self.default_radius_miles)
            .field("cuisines_path", &self.cuisines_path)
            .field("shuffle_ticks", &self.shuffle_ticks)
            .field("shuffle_tick_ms", &self.shuffle_tick_ms)
            .finish()
    }
}
