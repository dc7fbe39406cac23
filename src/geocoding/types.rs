//! Core types for the geocoding subsystem.

use thiserror::Error;

/// A successful geocoding answer: canonical address plus coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Geocoded {
    /// Full display name from the provider (e.g. "Pattern Beauty, Los Angeles, California, United States")
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a query produced no coordinates.
///
/// `NotFound` is a plain lookup miss; every other variant is a fault inside
/// the collaborator. Callers may treat them alike, but the distinction is kept
/// so transient faults can be told apart from permanent misses.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no match for '{0}'")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("geocoding service answered HTTP {status}")]
    Service { status: u16 },
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// True for faults that might succeed if the same query is sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Service { status } => *status == 429 || *status >= 500,
            Self::NotFound(_) | Self::InvalidResponse(_) => false,
        }
    }

    /// True when the service simply had nothing for the query.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A free-text address lookup service.
pub trait Geocoder {
    /// Resolve `query` to an address and coordinate pair.
    fn geocode(&self, query: &str) -> Result<Geocoded, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, query: &str) -> Result<Geocoded, GeocodeError> {
        (**self).geocode(query)
    }
}
