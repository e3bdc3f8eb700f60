use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    Entry, Result,
    code::CodeKey,
    tables::Tables,
    views::Views,
};

/// A bidirectional lookup table of named numeric codes and display labels.
///
/// A `Bdir` maps in both directions between:
/// - Names and the numeric codes they declare (the forward direction)
/// - Codes and their human-readable labels (the reverse direction)
///
/// Every declared code has a label. A code without an explicit label entry is
/// labelled with the name that declares it. Codes are unique across names;
/// labels are not.
///
/// A `Bdir` is immutable once built. Accessors that return collections hand
/// out fresh copies, and lookups for unknown names or codes return a sentinel
/// (`""`, `-1.0`, or `false`) instead of failing.
///
/// # Examples
///
/// ```
/// use bdir::{Bdir, Entry};
///
/// let roles = Bdir::new([
///     Entry::forward("None", 0.0),
///     Entry::forward("User", 1.0),
///     Entry::forward("Admin", 2.0),
///     Entry::label(0.0, ""),
///     Entry::label(2.0, "Administrator"),
/// ])
/// .unwrap();
///
/// // Forward direction
/// assert_eq!(roles.index("User"), 1.0);
/// assert_eq!(roles.index("missing"), -1.0);
///
/// // Reverse direction
/// assert_eq!(roles.render(2.0), "Administrator");
/// assert_eq!(roles.render(1.0), "User");
/// assert_eq!(roles.reverse_index(2.0), "Admin");
///
/// assert_eq!(roles.options()[2], (2.0, "Administrator".to_string()));
/// ```
#[derive(Clone, Debug)]
pub struct Bdir {
    pub(crate) tables: Tables,
    pub(crate) views: Views,
}

impl Bdir {
    /// Builds a table from an ordered sequence of entries.
    ///
    /// Fails on the first invalid entry in declaration order. A label whose
    /// code is never declared is reported after every entry has been read.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdir::{Bdir, BdirError, Entry};
    ///
    /// let error = Bdir::new([
    ///     Entry::forward("None", 0.0),
    ///     Entry::forward("User", 0.0),
    /// ])
    /// .unwrap_err();
    /// assert!(matches!(error, BdirError::DuplicateValue { .. }));
    /// ```
    pub fn new<T>(entries: T) -> Result<Self>
    where
        T: IntoIterator<Item = Entry>,
    {
        Ok(Self::from_tables(Tables::from_entries(entries)?))
    }

    /// Builds a table from a flat JSON object carrying both directions.
    ///
    /// Members whose value is a number declare a code under a name. Members
    /// whose key looks like a code (`"2"`, `"-1"`, `"0.5"`) give that code a
    /// string label. Member order is declaration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdir::Bdir;
    /// use serde_json::json;
    ///
    /// let object = json!({"Red": 10, "Blue": 20, "10": "Rouge"});
    /// let colors = Bdir::from_object(object.as_object().unwrap()).unwrap();
    ///
    /// assert_eq!(colors.labels(), ["Rouge", "Blue"]);
    /// ```
    pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
        Ok(Self::from_tables(Tables::from_object(object)?))
    }

    /// Parses a flat JSON object and builds a table from it.
    ///
    /// Validation failures are reported as JSON data errors carrying the
    /// [`BdirError`](crate::BdirError) message.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn from_tables(tables: Tables) -> Self {
        let views = Views::derive(&tables);
        debug!(
            codes = tables.codes.len(),
            overrides = tables.reverse.len(),
            "built bdir"
        );
        Self { tables, views }
    }

    /// Returns the number of declared codes.
    pub fn len(&self) -> usize { self.tables.codes.len() }

    /// Returns true if no codes are declared.
    pub fn is_empty(&self) -> bool { self.tables.codes.is_empty() }

    /// Returns the code declared under `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.tables
            .by_name
            .get(name)
            .map(|&index| self.tables.codes[index])
    }

    /// Returns the code declared under `name`, or `-1.0` if there is none.
    pub fn index(&self, name: &str) -> f64 { self.get(name).unwrap_or(-1.0) }

    /// Returns the label of `code`, or `""` if the code is not declared.
    ///
    /// `NaN` is never declared, so it always renders as `""`.
    pub fn render(&self, code: f64) -> &str {
        self.position_of_code(code)
            .map_or("", |index| self.views.labels[index].as_str())
    }

    /// Renders an untyped value. Anything other than a declared JSON number
    /// renders as `""`.
    pub fn render_json(&self, value: &Value) -> &str {
        match value {
            Value::Number(number) => {
                number.as_f64().map_or("", |code| self.render(code))
            }
            _ => "",
        }
    }

    /// Returns the label of the code declared under `name`, or `""`.
    pub fn render_by_key(&self, name: &str) -> &str {
        self.tables
            .by_name
            .get(name)
            .map_or("", |&index| self.views.labels[index].as_str())
    }

    /// Returns the name that declares `code`, or `""`.
    pub fn reverse_index(&self, code: f64) -> &str {
        self.position_of_code(code)
            .map_or("", |index| self.tables.names[index].as_str())
    }

    /// Returns every code whose label is `label`, in declaration order.
    ///
    /// Labels are not unique, so several codes may share one.
    pub fn index_by_label(&self, label: &str) -> Vec<f64> {
        self.positions_of_label(label)
            .map(|index| self.tables.codes[index])
            .collect()
    }

    /// Returns every name whose code is labelled `label`, in declaration
    /// order.
    pub fn reverse_index_by_label(&self, label: &str) -> Vec<String> {
        self.positions_of_label(label)
            .map(|index| self.tables.names[index].clone())
            .collect()
    }

    pub fn is_key(&self, name: &str) -> bool { self.views.key_set.contains(name) }

    pub fn is_value(&self, code: f64) -> bool {
        self.views.value_set.contains(&CodeKey::from(code))
    }

    pub fn is_label(&self, label: &str) -> bool {
        self.views.label_set.contains(label)
    }

    pub fn is_optional_value(&self, code: Option<f64>) -> bool {
        code.is_none_or(|code| self.is_value(code))
    }

    pub fn is_optional_label(&self, label: Option<&str>) -> bool {
        label.is_none_or(|label| self.is_label(label))
    }

    /// Returns true only for a JSON string naming a declared code.
    pub fn is_key_json(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|name| self.is_key(name))
    }

    /// Returns true only for a JSON number equal to a declared code.
    ///
    /// A string that looks like a declared code is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdir::{Bdir, Entry};
    /// use serde_json::json;
    ///
    /// let roles = Bdir::new([Entry::forward("User", 1.0)]).unwrap();
    /// assert!(roles.is_value_json(&json!(1)));
    /// assert!(!roles.is_value_json(&json!("1")));
    /// ```
    pub fn is_value_json(&self, value: &Value) -> bool {
        value.is_number() && value.as_f64().is_some_and(|code| self.is_value(code))
    }

    /// Returns true only for a JSON string equal to a label.
    pub fn is_label_json(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|label| self.is_label(label))
    }

    /// Like [`is_value_json`](Self::is_value_json), but also accepts `null`.
    pub fn is_optional_value_json(&self, value: &Value) -> bool {
        value.is_null() || self.is_value_json(value)
    }

    /// Like [`is_label_json`](Self::is_label_json), but also accepts `null`.
    pub fn is_optional_label_json(&self, value: &Value) -> bool {
        value.is_null() || self.is_label_json(value)
    }

    /// Returns the names in declaration order.
    pub fn keys(&self) -> Vec<String> { self.tables.names.clone() }

    /// Returns the codes in declaration order.
    pub fn values(&self) -> Vec<f64> { self.tables.codes.clone() }

    /// Returns the labels, index-aligned with [`keys`](Self::keys).
    pub fn labels(&self) -> Vec<String> { self.views.labels.clone() }

    /// Returns `(name, code)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(String, f64)> { self.views.entries.clone() }

    /// Returns `(code, label)` pairs in declaration order.
    ///
    /// This is the shape wanted when rendering a list of choices.
    pub fn options(&self) -> Vec<(f64, String)> { self.views.options.clone() }

    /// Returns a snapshot of both directions as one flat object.
    ///
    /// The snapshot maps every name to its code and every code, written as
    /// canonical text, to its label. Labels that default to names are
    /// included.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdir::{Bdir, Entry};
    /// use serde_json::{Value, json};
    ///
    /// let plans = Bdir::new([
    ///     Entry::forward("Free", 0.0),
    ///     Entry::forward("Pro", 1.0),
    ///     Entry::label(1.0, "Professional"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     Value::Object(plans.raw()),
    ///     json!({"Free": 0, "Pro": 1, "0": "Free", "1": "Professional"})
    /// );
    /// ```
    pub fn raw(&self) -> Map<String, Value> { self.views.raw.clone() }

    /// Returns the resolved label of every name.
    pub fn labels_by_key(&self) -> Labels<'_> { Labels { bdir: self } }

    fn position_of_code(&self, code: f64) -> Option<usize> {
        self.tables.by_code.get(&CodeKey::from(code)).copied()
    }

    fn positions_of_label<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.views
            .labels
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| candidate.as_str() == label)
            .map(|(index, _)| index)
    }
}

/// Default implementation creates an empty table.
impl Default for Bdir {
    fn default() -> Self { Self::from_tables(Tables::default()) }
}

impl Serialize for Bdir {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.views.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bdir {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_object(&object).map_err(serde::de::Error::custom)
    }
}

/// Name to resolved label view of a [`Bdir`].
///
/// # Examples
///
/// ```
/// use bdir::{Bdir, Entry};
///
/// let colors = Bdir::new([
///     Entry::forward("Red", 10.0),
///     Entry::forward("Blue", 20.0),
///     Entry::label(10.0, "Rouge"),
/// ])
/// .unwrap();
///
/// let labels = colors.labels_by_key();
/// assert_eq!(labels.get("Red"), Some("Rouge"));
/// assert_eq!(labels.get("Blue"), Some("Blue"));
/// assert_eq!(labels.get("Green"), None);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Labels<'a> {
    bdir: &'a Bdir,
}

impl<'a> Labels<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let bdir = self.bdir;
        bdir.tables
            .by_name
            .get(name)
            .map(|&index| bdir.views.labels[index].as_str())
    }

    /// Iterates `(name, label)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let bdir = self.bdir;
        bdir.tables
            .names
            .iter()
            .zip(&bdir.views.labels)
            .map(|(name, label)| (name.as_str(), label.as_str()))
    }

    pub fn len(&self) -> usize { self.bdir.len() }

    pub fn is_empty(&self) -> bool { self.bdir.is_empty() }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::BdirError;

    fn roles() -> Bdir {
        Bdir::from_json_str(
            r#"{"None": 0, "User": 1, "Admin": 2, "0": "", "2": "Administrator"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sentinels_for_unknowns() {
        let roles = roles();
        assert_eq!(roles.render(99.0), "");
        assert_eq!(roles.render(f64::NAN), "");
        assert_eq!(roles.index("ADMIN"), -1.0);
        assert_eq!(roles.render_by_key("ADMIN"), "");
        assert_eq!(roles.reverse_index(f64::NAN), "");
        assert_eq!(roles.render_json(&json!("1")), "");
        assert_eq!(roles.render_json(&json!(null)), "");
        assert_eq!(roles.render_json(&json!(2)), "Administrator");
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let roles = roles();
        assert!(roles.is_value(-0.0));
        assert_eq!(roles.reverse_index(-0.0), "None");
    }

    #[test]
    fn test_shared_labels() {
        let status = Bdir::new([
            Entry::forward("Open", 1.0),
            Entry::forward("Reopened", 2.0),
            Entry::forward("Closed", 3.0),
            Entry::label(2.0, "Open"),
        ])
        .unwrap();

        assert_eq!(status.index_by_label("Open"), [1.0, 2.0]);
        assert_eq!(status.reverse_index_by_label("Open"), ["Open", "Reopened"]);
        assert!(status.index_by_label("Reopened").is_empty());
        assert_eq!(status.labels(), ["Open", "Open", "Closed"]);
    }

    #[test]
    fn test_optional_guards() {
        let roles = roles();
        assert!(roles.is_optional_value(None));
        assert!(roles.is_optional_value(Some(1.0)));
        assert!(!roles.is_optional_value(Some(5.0)));
        assert!(roles.is_optional_label(None));
        assert!(roles.is_optional_label(Some("Administrator")));
        assert!(!roles.is_optional_label(Some("Admin")));
        assert!(roles.is_optional_value_json(&json!(null)));
        assert!(!roles.is_optional_value_json(&json!("2")));
        assert!(roles.is_optional_label_json(&json!("")));
        assert!(!roles.is_optional_label_json(&json!(0)));
    }

    #[test]
    fn test_json_guards_reject_wrong_types() {
        let roles = roles();
        assert!(roles.is_key_json(&json!("User")));
        assert!(!roles.is_key_json(&json!(1)));
        assert!(roles.is_value_json(&json!(1)));
        assert!(roles.is_value_json(&json!(1.0)));
        assert!(!roles.is_value_json(&json!("1")));
        assert!(!roles.is_value_json(&json!(true)));
        assert!(roles.is_label_json(&json!("")));
        assert!(!roles.is_label_json(&json!(null)));
    }

    #[test]
    fn test_serde_round_trip_through_raw() {
        let roles = roles();
        let json = serde_json::to_string(&roles).unwrap();
        let rebuilt: Bdir = serde_json::from_str(&json).unwrap();

        assert_eq!(rebuilt.entries(), roles.entries());
        assert_eq!(rebuilt.options(), roles.options());
        assert_eq!(rebuilt.raw(), roles.raw());
    }

    #[test]
    fn test_from_json_str_reports_validation_errors() {
        let error = Bdir::from_json_str(r#"{"None": 0, "3": "Ghost"}"#).unwrap_err();
        assert!(error.is_data());
        assert!(error.to_string().contains("invalid reverse key: \"3\""));

        let expected = BdirError::ReverseWithoutForward {
            code: 3.0,
            label: "Ghost".to_string(),
        };
        let object = json!({"None": 0, "3": "Ghost"});
        assert_eq!(
            Bdir::from_object(object.as_object().unwrap()).unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_empty_table() {
        let empty = Bdir::default();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert!(empty.raw().is_empty());
        assert!(empty.labels_by_key().is_empty());
        assert_eq!(empty.render(0.0), "");
    }

    #[test]
    fn test_labels_view_iterates_in_order() {
        let roles = roles();
        let labels: Vec<_> = roles.labels_by_key().iter().collect();
        assert_eq!(
            labels,
            [("None", ""), ("User", "User"), ("Admin", "Administrator")]
        );
        assert_eq!(roles.labels_by_key().len(), 3);
    }
}
