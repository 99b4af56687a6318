//! Great-circle distance and unit conversions.

use crate::types::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const METERS_PER_MILE: f64 = 1609.34;

/// Haversine distance between `a` and `b`, in miles.
///
/// Symmetric in its arguments and zero for identical points. The
/// intermediate term is clamped to `[0, 1]` so rounding near antipodal
/// points cannot produce `NaN`.
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}
