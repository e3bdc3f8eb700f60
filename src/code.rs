use serde_json::Value;

/// Hashable identity of a code.
///
/// Codes are plain `f64`s, which are neither `Eq` nor `Hash`. Two codes are
/// the same when their bit patterns match after folding `-0.0` onto `0.0`.
/// `NaN` is never stored, so its bit pattern never matches a table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CodeKey(u64);

impl From<f64> for CodeKey {
    fn from(code: f64) -> Self {
        if code == 0.0 { Self(0.0f64.to_bits()) } else { Self(code.to_bits()) }
    }
}

/// Returns the canonical decimal text of a code.
///
/// This is the text a code is written as when it appears as a key: integers
/// carry no fraction, magnitudes outside `[1e-6, 1e21)` use exponent form with
/// an explicit exponent sign, and both zeros render as `"0"`.
///
/// # Examples
///
/// ```
/// use bdir::canonical_text;
///
/// assert_eq!(canonical_text(2.0), "2");
/// assert_eq!(canonical_text(-1.5), "-1.5");
/// assert_eq!(canonical_text(1e21), "1e+21");
/// assert_eq!(canonical_text(f64::INFINITY), "Infinity");
/// ```
pub fn canonical_text(code: f64) -> String {
    if code.is_nan() {
        return "NaN".to_string();
    }
    if code.is_infinite() {
        return if code > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if code == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&code.abs()) {
        return format!("{code}");
    }
    let exponent_form = format!("{code:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}

/// Parses a key that looks exactly like a code.
///
/// Returns `None` unless the key is the canonical text of the number it
/// parses to, so `"01"`, `"+1"`, `"1e2"`, `" 1"` and `"1.0"` are all rejected.
pub fn parse_numeric_key(key: &str) -> Option<f64> {
    let code: f64 = key.parse().ok()?;
    (canonical_text(code) == key).then_some(code)
}

/// Returns true if the key would be read as a code rather than a name.
///
/// # Examples
///
/// ```
/// use bdir::is_numeric_key;
///
/// assert!(is_numeric_key("123"));
/// assert!(is_numeric_key("-4.25"));
/// assert!(!is_numeric_key("0123"));
/// assert!(!is_numeric_key("User"));
/// ```
pub fn is_numeric_key(key: &str) -> bool {
    parse_numeric_key(key).is_some()
}

/// Converts a code to JSON, writing integral codes as JSON integers.
pub(crate) fn code_to_json(code: f64) -> Value {
    match integral(code) {
        Some(int) => Value::from(int),
        None => Value::from(code),
    }
}

/// Returns the code as an `i64` when it is an exactly representable integer.
pub(crate) fn integral(code: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    (code.fract() == 0.0 && code.abs() <= MAX_SAFE).then(|| code as i64)
}
