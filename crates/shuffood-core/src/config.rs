use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::cuisine::CuisineTable;
use crate::types::{Coordinate, QueryFilters};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the cuisine table named by `SHUFFOOD_CUISINES_PATH`, or the built-in
/// table when the variable is unset.
///
/// # Errors
///
/// Returns `ConfigError` if the configured file cannot be read, parsed, or
/// fails validation.
pub fn load_cuisine_table(config: &AppConfig) -> Result<CuisineTable, ConfigError> {
    match &config.cuisines_path {
        Some(path) => CuisineTable::load(path),
        None => Ok(CuisineTable::builtin()),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let log_level = or_default("SHUFFOOD_LOG_LEVEL", "info");
    let places_base_url = or_default("SHUFFOOD_PLACES_BASE_URL", "https://places.googleapis.com/");
    let geocode_base_url = or_default("SHUFFOOD_GEOCODE_BASE_URL", "https://maps.googleapis.com/");

    let request_timeout_secs = parse_u64("SHUFFOOD_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SHUFFOOD_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("SHUFFOOD_USER_AGENT", "shuffood/0.1 (restaurant-picker)");

    let fallback_lat = parse_f64("SHUFFOOD_FALLBACK_LAT", "37.7749")?;
    let fallback_lng = parse_f64("SHUFFOOD_FALLBACK_LNG", "-122.4194")?;
    let fallback_origin = Coordinate::new(fallback_lat, fallback_lng)
        .map_err(|e| invalid("SHUFFOOD_FALLBACK_LAT", e.to_string()))?;

    let default_radius_miles = parse_f64("SHUFFOOD_DEFAULT_RADIUS_MILES", "10")?;
    QueryFilters::new(default_radius_miles, 0.0, Vec::<String>::new())
        .map_err(|e| invalid("SHUFFOOD_DEFAULT_RADIUS_MILES", e.to_string()))?;

    let cuisines_path = lookup("SHUFFOOD_CUISINES_PATH").ok().map(PathBuf::from);

    let shuffle_ticks = parse_u32("SHUFFOOD_SHUFFLE_TICKS", "30")?;
    let shuffle_tick_ms = parse_u64("SHUFFOOD_SHUFFLE_TICK_MS", "100")?;
    if shuffle_tick_ms == 0 {
        return Err(invalid(
            "SHUFFOOD_SHUFFLE_TICK_MS",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        google_maps_api_key,
        log_level,
        places_base_url,
        geocode_base_url,
        request_timeout_secs,
        user_agent,
        fallback_origin,
        default_radius_miles,
        cuisines_path,
        shuffle_ticks,
        shuffle_tick_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
