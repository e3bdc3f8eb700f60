use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{
    BdirError, Entry, Result,
    code::{CodeKey, parse_numeric_key},
};

/// Validated forward and reverse directions of a table.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
    /// Names in declaration order.
    pub(crate) names: Vec<String>,
    /// Codes in declaration order, index-aligned with `names`.
    pub(crate) codes: Vec<f64>,
    /// Name to declaration index.
    pub(crate) by_name: HashMap<String, usize>,
    /// Code to declaration index.
    pub(crate) by_code: HashMap<CodeKey, usize>,
    /// Explicit label overrides. Only codes with a reverse entry appear here.
    pub(crate) reverse: HashMap<CodeKey, String>,
}

impl Tables {
    pub(crate) fn from_entries<T>(entries: T) -> Result<Self>
    where
        T: IntoIterator<Item = Entry>,
    {
        let mut splitter = Splitter::default();
        for entry in entries {
            splitter.push(entry)?;
        }
        splitter.finish()
    }

    /// Splits a flat object carrying both directions.
    ///
    /// Each member is classified and validated before the next one is read,
    /// so the first invalid member in declaration order is the one reported.
    pub(crate) fn from_object(object: &Map<String, Value>) -> Result<Self> {
        let mut splitter = Splitter::default();
        for (key, value) in object {
            splitter.push(classify(key, value)?)?;
        }
        splitter.finish()
    }

    /// Returns the explicit label for the code at `index`, if one was given.
    pub(crate) fn override_at(&self, index: usize) -> Option<&str> {
        self.reverse
            .get(&CodeKey::from(self.codes[index]))
            .map(String::as_str)
    }
}

/// Decides whether a flat object member is a forward or a reverse entry.
///
/// Any JSON number is a forward value; the name check happens when the entry
/// is pushed. Otherwise the key must look like a code and the value must be a
/// string label.
fn classify(key: &str, value: &Value) -> Result<Entry> {
    if let Some(code) = value.as_f64() {
        return Ok(Entry::forward(key, code));
    }
    match (parse_numeric_key(key), value) {
        (Some(code), Value::String(label)) => Ok(Entry::label(code, label.as_str())),
        (Some(_), label) => Err(BdirError::LabelNotString {
            key: key.to_string(),
            label: label.clone(),
        }),
        (None, value) => Err(BdirError::InvalidEntry {
            key: key.to_string(),
            value: value.clone(),
        }),
    }
}

#[derive(Default)]
struct Splitter {
    tables: Tables,
    /// Reverse entries in declaration order, checked once all codes are known.
    labels: Vec<(f64, String)>,
}

impl Splitter {
    fn push(&mut self, entry: Entry) -> Result<()> {
        match entry {
            Entry::Forward { name, code } => self.push_forward(name, code),
            Entry::Label { code, label } => {
                self.labels.push((code, label));
                Ok(())
            }
        }
    }

    fn push_forward(&mut self, name: String, code: f64) -> Result<()> {
        if parse_numeric_key(&name).is_some() {
            return Err(BdirError::ForwardKeyNumeric { key: name, code });
        }
        if !code.is_finite() {
            return Err(BdirError::ValueNotFinite { key: name, code });
        }
        let code_key = CodeKey::from(code);
        if let Some(&index) = self.tables.by_code.get(&code_key) {
            let existing = self.tables.names[index].clone();
            return Err(BdirError::DuplicateValue { key: name, code, existing });
        }
        if self.tables.by_name.contains_key(&name) {
            return Err(BdirError::DuplicateKey { key: name, code });
        }

        let index = self.tables.names.len();
        self.tables.by_code.insert(code_key, index);
        self.tables.by_name.insert(name.clone(), index);
        self.tables.names.push(name);
        self.tables.codes.push(code);
        Ok(())
    }

    fn finish(self) -> Result<Tables> {
        let Self { mut tables, labels } = self;
        for (code, label) in labels {
            let code_key = CodeKey::from(code);
            if !tables.by_code.contains_key(&code_key) {
                return Err(BdirError::ReverseWithoutForward { code, label });
            }
            // A later label for the same code replaces an earlier one.
            tables.reverse.insert(code_key, label);
        }
        Ok(tables)
    }
}
