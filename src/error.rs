use serde_json::Value;

use crate::canonical_text;

/// Errors raised while building a [`Bdir`](crate::Bdir).
///
/// Every variant is a fatal validation failure in the input. Construction
/// stops at the first failure in declaration order, except
/// [`ReverseWithoutForward`](BdirError::ReverseWithoutForward), which is only
/// known once every entry has been read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BdirError {
    /// A name looks like a numeric code.
    #[error("bdir(): forward key \"{key}\" must not be numeric")]
    ForwardKeyNumeric { key: String, code: f64 },

    /// A declared code is `NaN` or infinite.
    #[error(
        "bdir(): value must be a finite number: [key: \"{key}\", value: \"{}\"]",
        canonical_text(*code)
    )]
    ValueNotFinite { key: String, code: f64 },

    /// Two names declare the same code. `key` is the later declaration.
    #[error(
        "bdir(): duplicate value detected: [key: \"{key}\", value: \"{}\"]",
        canonical_text(*code)
    )]
    DuplicateValue {
        key: String,
        code: f64,
        existing: String,
    },

    /// The same name is declared twice.
    #[error(
        "bdir(): duplicate key detected: [key: \"{key}\", value: \"{}\"]",
        canonical_text(*code)
    )]
    DuplicateKey { key: String, code: f64 },

    /// A reverse entry carries something other than a string label.
    #[error(
        "bdir(): label for value must be a string: [value: \"{key}\", label: \"{}\"]",
        display_value(label)
    )]
    LabelNotString { key: String, label: Value },

    /// The entry is neither a forward nor a reverse entry.
    #[error(
        "bdir(): invalid entry [\"{key}\": \"{}\"]: forward keys must be non-numeric \
         strings, forward values must be numbers, reverse keys must be numeric",
        display_value(value)
    )]
    InvalidEntry { key: String, value: Value },

    /// A label was given for a code that no name declares.
    #[error(
        "bdir(): all reverse keys must be mentioned in the forward direction: \
         invalid reverse key: \"{}\"",
        canonical_text(*code)
    )]
    ReverseWithoutForward { code: f64, label: String },
}

pub type Result<T> = std::result::Result<T, BdirError>;

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
