//! Extracted-data container.
//!
//! Block behaviors that know how to read their text return an
//! [`ExtractedData`]: a small ordered map of named JSON values plus a free-form
//! comment describing what the values mean (or why only raw text is present).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Structured data pulled out of one block's raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedData {
    /// Named values, e.g. `"Energy" -> -379.259324337759`.
    pub values: BTreeMap<String, Value>,
    /// Human-oriented note about the values (units, caveats, fallbacks).
    pub comment: String,
}

impl ExtractedData {
    pub fn new(comment: impl Into<String>) -> Self {
        ExtractedData { values: BTreeMap::new(), comment: comment.into() }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// The fallback payload used when no extraction procedure exists: the raw
    /// text under a `"raw data"` key, annotated accordingly.
    pub fn raw_fallback(raw: &str) -> Self {
        ExtractedData::new(
            "No procedure for analyzing the data found, `raw data` collected. \
             Please contribute if you know how to extract values from this block.",
        )
        .with_value("raw data", raw)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
