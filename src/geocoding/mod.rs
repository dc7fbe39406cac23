//! Geocoding collaborator for the enrichment driver.
//!
//! The driver only sees the [`Geocoder`] trait; [`NominatimGeocoder`] is the
//! production implementation, tests substitute scripted fakes.

pub mod providers;
pub mod types;

pub use providers::{NominatimGeocoder, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use types::{GeocodeError, Geocoded, Geocoder};
