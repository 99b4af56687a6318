//! Conversion from raw place records to [`Candidate`]s.

use shuffood_core::{distance_miles, Candidate, Coordinate, MAX_RATING};

use crate::error::PlacesError;
use crate::types::Place;

/// Normalizes one [`Place`] into a [`Candidate`] measured from `origin`.
///
/// Missing optional fields become empty strings, an empty tag set, or a zero
/// rating. The id falls back to the resource name, then to the display name.
///
/// # Errors
///
/// Returns [`PlacesError::Normalization`] when the record has no usable
/// display name or location.
pub fn normalize_place(place: Place, origin: Coordinate) -> Result<Candidate, PlacesError> {
    let display_name = place
        .display_name
        .and_then(|d| d.text)
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());

    let id = place
        .id
        .filter(|s| !s.is_empty())
        .or_else(|| place.name.clone().filter(|s| !s.is_empty()))
        .or_else(|| display_name.clone())
        .unwrap_or_default();

    let Some(name) = display_name else {
        return Err(PlacesError::Normalization {
            place_id: id,
            reason: "missing display name".into(),
        });
    };

    let location = place
        .location
        .ok_or_else(|| "missing location".to_owned())
        .and_then(|ll| Coordinate::new(ll.latitude, ll.longitude).map_err(|e| e.to_string()))
        .map_err(|reason| PlacesError::Normalization {
            place_id: id.clone(),
            reason,
        })?;

    // The service reports ratings on a 1-5 scale; anything unusable means
    // "no rating".
    let rating = place
        .rating
        .filter(|r| r.is_finite())
        .map_or(0.0, |r| r.clamp(0.0, MAX_RATING));

    Ok(Candidate {
        id,
        name,
        address: place.formatted_address.unwrap_or_default(),
        rating,
        location,
        distance_miles: distance_miles(origin, location),
        category_tags: place.types.into_iter().filter(|t| !t.is_empty()).collect(),
    })
}
