//! JSON profile documents
//!
//! Reads `data/p/*.json` documents from a data root. A document is a JSON
//! object of named numeric fields; values may be numbers or numeric
//! strings. Fields are decoded one at a time so a bad field never hides a
//! good one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use ristretto_core::profile::{parse_numeric, ProfileOverride, DURATION_FIELDS, TEMP_FIELDS};
use ristretto_core::traits::ProfileSource;

/// Profile documents stored under a data root
#[derive(Debug, Clone)]
pub struct JsonProfileDocuments {
    root: PathBuf,
}

impl JsonProfileDocuments {
    /// Documents resolved relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProfileSource for JsonProfileDocuments {
    fn read_override(&mut self, path: &str) -> Option<ProfileOverride> {
        let full = self.root.join(path);
        let text = match fs::read_to_string(&full) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No profile document at {}", full.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", full.display(), e);
                return None;
            }
        };

        let document = parse_document(&text);
        if document.is_empty() {
            warn!("Profile document {} has no usable fields", full.display());
        } else {
            debug!("Profile document {}: {:?}", full.display(), document);
        }
        Some(document)
    }
}

/// Decode a profile document
///
/// Text that is not a JSON object yields an empty override, which keeps
/// every prior value.
pub fn parse_document(text: &str) -> ProfileOverride {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(text) else {
        return ProfileOverride::default();
    };

    let first = |names: &[&str]| names.iter().find_map(|name| fields.get(*name).and_then(numeric));

    ProfileOverride::from_values(first(&TEMP_FIELDS[..]), first(&DURATION_FIELDS[..]))
}

fn numeric(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}
