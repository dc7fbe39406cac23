//! Business geocoder: enrich a JSON list of businesses with addresses and
//! coordinates from Nominatim, retrying misses with a location hint.

pub mod enrich;
pub mod geocoding;
pub mod hints;
pub mod records;

pub use enrich::{enrich_file, EnrichReport, Enricher};
pub use geocoding::{GeocodeError, Geocoded, Geocoder, NominatimGeocoder};
pub use hints::HintTable;
pub use records::BusinessRecord;
