//! Clients for the external places-search and reverse-geocoding services.

pub mod client;
pub mod error;
pub mod geocode;
mod http;
pub mod normalize;
pub mod types;

use std::future::Future;

use shuffood_core::{Candidate, Coordinate, QueryFilters};

pub use client::PlacesClient;
pub use error::PlacesError;
pub use geocode::{place_label, GeocodeClient};
pub use normalize::normalize_place;

/// Anything that can turn an origin and filters into a fresh candidate list.
///
/// Implemented by [`PlacesClient`]; the session layer is generic over it so
/// tests can substitute a canned source.
pub trait CandidateSource: Send + Sync {
    fn search_nearby(
        &self,
        origin: Coordinate,
        filters: &QueryFilters,
    ) -> impl Future<Output = Result<Vec<Candidate>, PlacesError>> + Send;
}
