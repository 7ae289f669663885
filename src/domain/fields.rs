// ============================================================
// Layer 3 — Field Dictionary
// ============================================================
// The values a caller wants written into a template, keyed by
// field name (e.g. "company_name" → "Acme Ltd").
//
// A key may be present with no value (JSON null). Absent and
// null values are treated the same way downstream: the matching
// placeholder is left in the document verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field key → optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDictionary(BTreeMap<String, Option<String>>);

impl FieldDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[cfg(test)]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.0.insert(key.into(), value);
    }

    /// The value for `key`, or None if the key is absent or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &FieldDictionary) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert a free-form JSON object into a dictionary.
    ///
    /// Strings are taken as-is, numbers and booleans are rendered
    /// with their JSON text, null stays absent. Arrays and nested
    /// objects are rendered as compact JSON.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut dict = Self::new();
        for (k, v) in obj {
            let rendered = match v {
                Value::Null      => None,
                Value::String(s) => Some(s.clone()),
                other            => Some(other.to_string()),
            };
            dict.insert(k.clone(), rendered);
        }
        Some(dict)
    }
}
