use serde::{Deserialize, Serialize};

/// One declaration in a bidirectional table.
///
/// A table is declared as an ordered sequence of entries. Forward entries
/// name a code; label entries override the display label of a code that some
/// forward entry declares.
///
/// # Examples
///
/// ```
/// use bdir::{Bdir, Entry};
///
/// let roles = Bdir::new([
///     Entry::forward("User", 1.0),
///     Entry::forward("Admin", 2.0),
///     Entry::label(2.0, "Administrator"),
/// ])
/// .unwrap();
/// assert_eq!(roles.render(2.0), "Administrator");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    /// A named code: `name -> code`.
    Forward { name: String, code: f64 },
    /// A display label for a declared code: `code -> label`.
    Label { code: f64, label: String },
}

impl Entry {
    pub fn forward(name: impl Into<String>, code: f64) -> Self {
        Self::Forward { name: name.into(), code }
    }

    pub fn label(code: f64, label: impl Into<String>) -> Self {
        Self::Label { code, label: label.into() }
    }

    /// Returns the code this entry refers to.
    pub fn code(&self) -> f64 {
        match self {
            Self::Forward { code, .. } | Self::Label { code, .. } => *code,
        }
    }
}
