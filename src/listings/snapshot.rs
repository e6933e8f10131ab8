use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::Listing;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unexpected snapshot shape: {0}")]
    UnexpectedShape(String),
}

/// The already-fetched listings for one run, in source order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    listings: Vec<Listing>,
}

impl Snapshot {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let snapshot = Self::from_json_str(&contents)?;
        debug!(path = ?path, count = snapshot.len(), "Loaded snapshot.");
        Ok(snapshot)
    }

    /// Accepts either the auction feed shape `{"server": [...]}` or a bare array.
    pub fn from_json_str(contents: &str) -> Result<Self, SnapshotError> {
        let root: Value = serde_json::from_str(contents)?;
        let records = match root {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove("server") {
                Some(Value::Array(records)) => records,
                Some(other) => {
                    return Err(SnapshotError::UnexpectedShape(format!(
                        "\"server\" must be an array, found {}",
                        json_kind(&other)
                    )));
                }
                None => {
                    return Err(SnapshotError::UnexpectedShape(
                        "object without a \"server\" array".to_string(),
                    ));
                }
            },
            other => {
                return Err(SnapshotError::UnexpectedShape(format!(
                    "expected an object or array, found {}",
                    json_kind(&other)
                )));
            }
        };

        let listings = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match record {
                Value::Object(fields) => Some(Listing::new(fields)),
                other => {
                    warn!(index, kind = json_kind(&other), "Skipping snapshot entry that is not an object.");
                    None
                }
            })
            .collect();

        Ok(Self { listings })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
