//! Business records: a JSON array of objects read once and written once.
//!
//! Records are kept as ordered JSON maps so every field the enrichment does
//! not own passes through untouched and in its original position.

use crate::geocoding::Geocoded;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const NAME_FIELD: &str = "business_name";
pub const ADDRESS_FIELD: &str = "address";
pub const LATITUDE_FIELD: &str = "latitude";
pub const LONGITUDE_FIELD: &str = "longitude";

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a JSON array of business records: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One business entry. Only `business_name` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct BusinessRecord {
    fields: Map<String, Value>,
}

impl BusinessRecord {
    /// A record holding only a name.
    pub fn new(name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(NAME_FIELD.to_string(), Value::String(name.into()));
        Self { fields }
    }

    pub fn name(&self) -> &str {
        self.fields
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn address(&self) -> Option<&str> {
        self.fields.get(ADDRESS_FIELD).and_then(Value::as_str)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.fields.get(LATITUDE_FIELD).and_then(Value::as_f64)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.fields.get(LONGITUDE_FIELD).and_then(Value::as_f64)
    }

    /// Latitude absent or null.
    pub fn is_missing_coordinates(&self) -> bool {
        matches!(self.fields.get(LATITUDE_FIELD), None | Some(Value::Null))
    }

    /// Raw access to any field, including passthrough ones.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Overwrite the three geocoding fields. `None` means unresolved:
    /// empty address, null coordinates.
    pub fn apply(&mut self, result: Option<&Geocoded>) {
        let (address, lat, lon) = match result {
            Some(geo) => (
                Value::String(geo.address.clone()),
                Value::from(geo.latitude),
                Value::from(geo.longitude),
            ),
            None => (Value::String(String::new()), Value::Null, Value::Null),
        };
        self.fields.insert(ADDRESS_FIELD.to_string(), address);
        self.fields.insert(LATITUDE_FIELD.to_string(), lat);
        self.fields.insert(LONGITUDE_FIELD.to_string(), lon);
    }
}

impl TryFrom<Map<String, Value>> for BusinessRecord {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(NAME_FIELD) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(format!("\"{}\" must be a string, got {}", NAME_FIELD, other)),
            None => Err(format!("record without \"{}\"", NAME_FIELD)),
        }
    }
}

impl From<BusinessRecord> for Map<String, Value> {
    fn from(record: BusinessRecord) -> Self {
        record.fields
    }
}

/// Read the whole input file. Any fault here is fatal for the run.
pub fn load_records(path: &Path) -> Result<Vec<BusinessRecord>, RecordsError> {
    let data = fs::read_to_string(path).map_err(|source| RecordsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| RecordsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write all records, two-space indented, non-ASCII kept literal.
pub fn write_records(path: &Path, records: &[BusinessRecord]) -> Result<(), RecordsError> {
    let mut output = serde_json::to_string_pretty(records)?;
    output.push('\n');
    fs::write(path, output).map_err(|source| RecordsError::Write {
        path: path.to_path_buf(),
        source,
    })
}
