//! Carrier code directory and name resolution.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::error::CarrierError;

/// A single carrier as listed in the source document.
///
/// The provider's carrier dump spells the display name `_name`;
/// hand-maintained lists use plain `name`. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierRecord {
    /// Canonical numeric carrier code.
    pub key: u32,
    /// Display name. May be empty.
    #[serde(default, alias = "_name")]
    pub name: String,
}

/// Immutable directory of carriers, loaded once at startup.
///
/// Holds the records in document order, a derived key-to-name map, and the
/// raw document itself, which the carriers endpoint serves verbatim.
#[derive(Debug, Clone)]
pub struct CarrierDirectory {
    records: Vec<CarrierRecord>,
    names: HashMap<u32, String>,
    document: Option<Value>,
}

impl CarrierDirectory {
    /// Load the directory from a JSON document on disk.
    ///
    /// Failures are returned to the caller; the server treats them as
    /// non-fatal and falls back to an empty directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CarrierError> {
        let raw = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&raw)?;
        Ok(Self::from_document(document))
    }

    /// Build a directory from an already-parsed document.
    ///
    /// Accepts either a bare array of carrier records or an object wrapping
    /// the array under `data`. Any other shape yields no records, but the
    /// document is still retained for the listing endpoint.
    pub fn from_document(document: Value) -> Self {
        let items = match &document {
            Value::Array(items) => Some(items),
            Value::Object(map) => map.get("data").and_then(Value::as_array),
            _ => None,
        };

        let records: Vec<CarrierRecord> = items
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        // Duplicate keys resolve to the last occurrence.
        let names = records
            .iter()
            .map(|record| (record.key, record.name.clone()))
            .collect();

        Self {
            records,
            names,
            document: Some(document),
        }
    }

    /// An empty directory, used when the source document cannot be loaded.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            names: HashMap::new(),
            document: None,
        }
    }

    /// Resolve a carrier code from an explicit code and/or free-form text.
    ///
    /// Precision beats recall: an explicit non-zero code wins unexamined,
    /// then a leading digit run in the text (inputs like `"100 - DHL"`),
    /// then an exact case-insensitive name match, then the first record
    /// whose name contains the text. Ties go to document order.
    pub fn resolve(&self, code: Option<u32>, text: Option<&str>) -> Option<u32> {
        if let Some(code) = code {
            if code != 0 {
                return Some(code);
            }
        }

        let text = text.map(str::trim).filter(|t| !t.is_empty())?;

        let digit_len = text.bytes().take_while(u8::is_ascii_digit).count();
        if digit_len > 0 {
            if let Ok(code) = text[..digit_len].parse::<u32>() {
                return Some(code);
            }
            // Digit run too long for a real code; keep searching by name.
        }

        let target = text.to_lowercase();
        if let Some(record) = self
            .records
            .iter()
            .find(|record| record.name.to_lowercase() == target)
        {
            return Some(record.key);
        }

        self.records
            .iter()
            .find(|record| record.name.to_lowercase().contains(&target))
            .map(|record| record.key)
    }

    /// Display name for a carrier code, if the directory knows it.
    pub fn name_of(&self, key: u32) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }

    /// Number of carriers loaded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The raw source document, if one was loaded.
    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }
}
