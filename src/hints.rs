//! Location hints used to disambiguate retry queries.
//!
//! A hint file is a flat JSON object mapping business names to a location
//! string, plus a mandatory `_default` entry:
//!
//! ```json
//! { "Pattern Beauty": "Los Angeles, CA", "_default": "United States" }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the fallback hint in a hint file.
pub const DEFAULT_KEY: &str = "_default";

/// Names we know need a city to be found.
const BUILTIN_HINTS: &[(&str, &str)] = &[
    ("Absolutely Everything Curly", "Los Angeles, CA"),
    ("Alodia Hair Care", "Los Angeles, CA"),
    ("Melanin Haircare", "Los Angeles, CA"),
    ("Pattern Beauty", "Los Angeles, CA"),
    ("Ami Colé", "New York, NY"),
    ("Eve Milan New York", "New York, NY"),
];

const BUILTIN_DEFAULT: &str = "United States";

#[derive(Debug, Error)]
pub enum HintsError {
    #[error("cannot read hint file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("hint file {} is not a JSON object of strings: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("hint file {} has no \"_default\" entry", path.display())]
    MissingDefault { path: PathBuf },
}

/// Business name → location hint, with a fallback for everything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub struct HintTable {
    hints: HashMap<String, String>,
    default: String,
}

impl HintTable {
    /// An empty table where every name gets `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            hints: HashMap::new(),
            default: default.into(),
        }
    }

    pub fn with_hint(mut self, name: impl Into<String>, hint: impl Into<String>) -> Self {
        self.hints.insert(name.into(), hint.into());
        self
    }

    /// The table shipped with the tool.
    pub fn builtin() -> Self {
        BUILTIN_HINTS
            .iter()
            .fold(Self::new(BUILTIN_DEFAULT), |table, (name, hint)| table.with_hint(*name, *hint))
    }

    /// Load a hint file. `_default` is required.
    pub fn load(path: &Path) -> Result<Self, HintsError> {
        let data = fs::read_to_string(path).map_err(|source| HintsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, String> =
            serde_json::from_str(&data).map_err(|source| HintsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::try_from(raw).map_err(|_| HintsError::MissingDefault {
            path: path.to_path_buf(),
        })
    }

    /// Replace the fallback hint.
    pub fn set_default(&mut self, default: impl Into<String>) {
        self.default = default.into();
    }

    pub fn default_hint(&self) -> &str {
        &self.default
    }

    /// Hint for `name`, falling back to the default.
    pub fn hint_for(&self, name: &str) -> &str {
        self.hints.get(name).map(String::as_str).unwrap_or(self.default.as_str())
    }

    /// The retry query for `name`: `"<name>, <hint>"`.
    pub fn query_for(&self, name: &str) -> String {
        format!("{}, {}", name, self.hint_for(name))
    }

    /// Number of name-specific overrides (the default is not counted).
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

impl Default for HintTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<HashMap<String, String>> for HintTable {
    type Error = String;

    fn try_from(mut hints: HashMap<String, String>) -> Result<Self, Self::Error> {
        let default = hints
            .remove(DEFAULT_KEY)
            .ok_or_else(|| format!("missing \"{}\" entry", DEFAULT_KEY))?;
        Ok(Self { hints, default })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_hints(json: &str) -> (PathBuf, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hints.json");
        fs::write(&path, json).unwrap();
        (path, dir)
    }

    #[test]
    fn test_builtin_override() {
        let hints = HintTable::builtin();
        assert_eq!(hints.hint_for("Pattern Beauty"), "Los Angeles, CA");
        assert_eq!(hints.hint_for("Ami Colé"), "New York, NY");
        assert_eq!(hints.len(), 6);
    }

    #[test]
    fn test_unknown_name_uses_default() {
        let hints = HintTable::builtin();
        assert_eq!(hints.hint_for("Unknown Shop"), "United States");
        assert_eq!(hints.query_for("Unknown Shop"), "Unknown Shop, United States");
    }

    #[test]
    fn test_lookup_is_exact() {
        // Accents and case matter: names are keys, not fuzzy queries.
        let hints = HintTable::builtin();
        assert_eq!(hints.hint_for("Ami Cole"), "United States");
        assert_eq!(hints.hint_for("pattern beauty"), "United States");
    }

    #[test]
    fn test_query_for_mapped_name() {
        let hints = HintTable::new("Canada").with_hint("Melanin Haircare", "Toronto, ON");
        assert_eq!(hints.query_for("Melanin Haircare"), "Melanin Haircare, Toronto, ON");
        assert_eq!(hints.query_for("Other"), "Other, Canada");
    }

    #[test]
    fn test_load_file() {
        let (path, _dir) = write_hints(
            r#"{ "Eve Milan New York": "New York, NY", "_default": "USA" }"#,
        );
        let hints = HintTable::load(&path).unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints.default_hint(), "USA");
        assert_eq!(hints.hint_for("Eve Milan New York"), "New York, NY");
        assert_eq!(hints.hint_for("Nobody"), "USA");
    }

    #[test]
    fn test_load_requires_default() {
        let (path, _dir) = write_hints(r#"{ "Pattern Beauty": "Los Angeles, CA" }"#);
        let err = HintTable::load(&path).unwrap_err();
        assert!(matches!(err, HintsError::MissingDefault { .. }));
    }

    #[test]
    fn test_load_rejects_non_string_values() {
        let (path, _dir) = write_hints(r#"{ "_default": "USA", "Shop": 3 }"#);
        let err = HintTable::load(&path).unwrap_err();
        assert!(matches!(err, HintsError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = HintTable::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, HintsError::Io { .. }));
    }

    #[test]
    fn test_set_default() {
        let mut hints = HintTable::builtin();
        hints.set_default("Georgia, USA");
        assert_eq!(hints.hint_for("Unknown Shop"), "Georgia, USA");
        assert_eq!(hints.hint_for("Pattern Beauty"), "Los Angeles, CA");
    }

    #[test]
    fn test_shipped_hint_file_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/hints.json");
        assert_eq!(HintTable::load(&path).unwrap(), HintTable::builtin());
    }

    #[test]
    fn test_deserialize_via_serde() {
        let hints: HintTable = serde_json::from_str(r#"{"_default": "US"}"#).unwrap();
        assert!(hints.is_empty());
        assert!(serde_json::from_str::<HintTable>(r#"{"a": "b"}"#).is_err());
    }
}
