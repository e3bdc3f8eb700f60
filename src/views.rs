use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::code::{CodeKey, canonical_text, code_to_json};
use crate::tables::Tables;

/// Derived, read-only views of a validated table.
#[derive(Clone, Debug, Default)]
pub(crate) struct Views {
    /// Resolved labels, index-aligned with the names and codes.
    pub(crate) labels: Vec<String>,
    /// `(name, code)` pairs in declaration order.
    pub(crate) entries: Vec<(String, f64)>,
    /// `(code, label)` pairs in declaration order, for choice lists.
    pub(crate) options: Vec<(f64, String)>,
    /// Both directions flattened: `name -> code` and `code text -> label`.
    pub(crate) raw: Map<String, Value>,
    pub(crate) key_set: HashSet<String>,
    pub(crate) value_set: HashSet<CodeKey>,
    pub(crate) label_set: HashSet<String>,
}

impl Views {
    pub(crate) fn derive(tables: &Tables) -> Self {
        let labels: Vec<String> = (0..tables.names.len())
            .map(|index| {
                tables
                    .override_at(index)
                    .unwrap_or(tables.names[index].as_str())
                    .to_string()
            })
            .collect();

        let mut raw = Map::new();
        for (name, &code) in tables.names.iter().zip(&tables.codes) {
            raw.insert(name.clone(), code_to_json(code));
        }
        for (&code, label) in tables.codes.iter().zip(&labels) {
            raw.insert(canonical_text(code), Value::String(label.clone()));
        }

        let entries = tables
            .names
            .iter()
            .cloned()
            .zip(tables.codes.iter().copied())
            .collect();
        let options = tables
            .codes
            .iter()
            .copied()
            .zip(labels.iter().cloned())
            .collect();

        Self {
            key_set: tables.names.iter().cloned().collect(),
            value_set: tables.codes.iter().map(|&code| CodeKey::from(code)).collect(),
            label_set: labels.iter().cloned().collect(),
            labels,
            entries,
            options,
            raw,
        }
    }
}
