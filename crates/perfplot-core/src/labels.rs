//! Human-readable names for benchmark keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Fire landscapes used by the simulator benchmarks, keyed by grid-cell count.
const FIRE_DATASETS: [(u64, &str); 11] = [
    (2_548, "2005_26"),
    (8_008, "2000_8"),
    (13_125, "2011_19W"),
    (14_161, "2005_6"),
    (15_912, "2009_3"),
    (48_614, "2011_19E"),
    (94_188, "1999_28"),
    (143_655, "1999_27j_N"),
    (1_483_274, "1999_27j_S"),
    (4_696_595, "2021_865"),
    (10_434_109, "2015_50"),
];

/// Errors produced while loading a label table.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelsError {
    /// Label file could not be read.
    Io { path: PathBuf, message: String },
    /// Label file is not a JSON object of key to name.
    Json { message: String },
}

impl LabelsError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LabelsError::Io { .. } => "LABELS_IO",
            LabelsError::Json { .. } => "LABELS_INVALID_JSON",
        }
    }
}

impl std::fmt::Display for LabelsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelsError::Io { path, message } => {
                write!(
                    f,
                    "[{}] Failed to read {}: {}",
                    self.code(),
                    path.display(),
                    message
                )
            }
            LabelsError::Json { message } => {
                write!(f, "[{}] Invalid label table: {}", self.code(), message)
            }
        }
    }
}

impl std::error::Error for LabelsError {}

/// Lookup from key to display name, falling back to the decimal key.
///
/// Serialized as a JSON object whose property names are the decimal keys:
/// `{"2548": "2005_26"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayLabels {
    names: BTreeMap<u64, String>,
}

impl DisplayLabels {
    /// An empty table; every key renders as its decimal form.
    pub fn new() -> Self {
        Self::default()
    }

    /// The known fire landscape datasets.
    pub fn fire_datasets() -> Self {
        FIRE_DATASETS
            .iter()
            .map(|(key, name)| (*key, (*name).to_string()))
            .collect()
    }

    pub fn insert(&mut self, key: u64, name: impl Into<String>) -> Option<String> {
        self.names.insert(key, name.into())
    }

    pub fn with_label(mut self, key: u64, name: impl Into<String>) -> Self {
        self.insert(key, name);
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for `key`.
    pub fn label(&self, key: u64) -> String {
        self.names
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Parse a JSON object of decimal key to name.
    ///
    /// # Errors
    ///
    /// Returns `LabelsError::Json` if the text is not such an object.
    pub fn from_json_str(text: &str) -> Result<Self, LabelsError> {
        serde_json::from_str(text).map_err(|err| LabelsError::Json {
            message: err.to_string(),
        })
    }

    /// Read and parse a JSON label file.
    ///
    /// # Errors
    ///
    /// Returns `LabelsError::Io` if the file cannot be read and
    /// `LabelsError::Json` if its content is not a label object.
    pub fn from_json_file(path: &Path) -> Result<Self, LabelsError> {
        let text = std::fs::read_to_string(path).map_err(|err| LabelsError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&text)
    }
}

impl FromIterator<(u64, String)> for DisplayLabels {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        DisplayLabels {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_fallback() {
        let labels = DisplayLabels::new().with_label(100, "small");
        assert_eq!(labels.label(100), "small");
        assert_eq!(labels.label(200), "200");
    }

    #[test]
    fn test_fire_datasets() {
        let labels = DisplayLabels::fire_datasets();
        assert_eq!(labels.len(), 11);
        assert_eq!(labels.label(2_548), "2005_26");
        assert_eq!(labels.label(10_434_109), "2015_50");
        assert_eq!(labels.label(7), "7");
    }

    #[test]
    fn test_from_json_str() {
        let labels = DisplayLabels::from_json_str(r#"{"100": "tiny", "2000": "large"}"#).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.label(2_000), "large");

        let err = DisplayLabels::from_json_str(r#"{"abc": "tiny"}"#).unwrap_err();
        assert_eq!(err.code(), "LABELS_INVALID_JSON");

        let err = DisplayLabels::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("Invalid label table"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = DisplayLabels::from_json_file(Path::new("does/not/exist.json")).unwrap_err();
        assert_eq!(err.code(), "LABELS_IO");
        let LabelsError::Io { path, .. } = &err else {
            panic!("expected an io error, got {err:?}");
        };
        assert_eq!(path, &PathBuf::from("does/not/exist.json"));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
