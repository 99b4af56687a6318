//! Read-only `where` and `cuisines` commands.

use shuffood_core::{load_cuisine_table, AppConfig};
use shuffood_places::GeocodeClient;

use crate::search::provided_origin;
use crate::OriginArgs;

/// Print a readable label for the origin. Falls back to the configured
/// origin when none is given, and to raw coordinates when geocoding fails.
///
/// # Errors
///
/// Returns an error if the geocoding client cannot be built.
pub(crate) async fn run_where(config: &AppConfig, args: &OriginArgs) -> anyhow::Result<()> {
    let origin = provided_origin(args).unwrap_or_else(|e| {
        tracing::warn!(error = %e, fallback = %config.fallback_origin, "using fallback origin");
        config.fallback_origin
    });
    let client = GeocodeClient::from_config(config)?;
    let label = client.label_or_coordinates(origin).await;
    println!("{label} ({origin})");
    Ok(())
}

/// # Errors
///
/// Returns an error if a configured cuisine file cannot be read or parsed.
pub(crate) fn run_cuisines(config: &AppConfig) -> anyhow::Result<()> {
    let table = load_cuisine_table(config)?;
    println!("{:<16}{:<18}PLACE TYPE", "KEY", "LABEL");
    for cuisine in &table.cuisines {
        println!(
            "{:<16}{:<18}{}",
            cuisine.key,
            cuisine.label,
            cuisine.place_type.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
