//! Bidirectional lookup tables of named numeric codes and display labels.
//!
//! A table is declared once, from names mapped to unique numeric codes (the
//! forward direction) plus optional label overrides for some of those codes
//! (the reverse direction). Every declared code gets a label: its override if
//! one was given, otherwise the name that declares it. The built [`Bdir`] is
//! immutable and answers lookups in both directions.
//!
//! # Basic Usage
//!
//! ```rust
//! use bdir::bdir;
//!
//! let roles = bdir! {
//!     None = 0,
//!     User = 1,
//!     Admin = 2,
//!     0 => "",
//!     2 => "Administrator",
//! }
//! .unwrap();
//!
//! assert_eq!(roles.index("User"), 1.0);
//! assert_eq!(roles.render(2.0), "Administrator");
//! assert_eq!(roles.reverse_index(2.0), "Admin");
//! assert_eq!(roles.labels(), ["", "User", "Administrator"]);
//! assert!(roles.is_label(""));
//! ```
//!
//! # Flat Object Input
//!
//! A table may also be declared as a single JSON object carrying both
//! directions. Members with number values declare codes; members whose key is
//! the canonical text of a code (`"2"`, `"-1"`, `"0.5"`) give that code a
//! label.
//!
//! ```rust
//! use bdir::{Bdir, BdirError};
//!
//! let colors: Bdir =
//!     serde_json::from_str(r#"{"Red": 10, "Blue": 20, "10": "Rouge"}"#).unwrap();
//! assert_eq!(
//!     colors.options(),
//!     [(10.0, "Rouge".to_string()), (20.0, "Blue".to_string())]
//! );
//!
//! let object = serde_json::json!({"123": 0, "User": 1});
//! let error = Bdir::from_object(object.as_object().unwrap()).unwrap_err();
//! assert!(matches!(error, BdirError::ForwardKeyNumeric { key, .. } if key == "123"));
//! ```
//!
//! # Directory Loading Feature
//!
//! When the `directory-loading` feature is enabled (default), named tables
//! can be loaded from directories of JSON files, one table per file. On first
//! access, [`BDIRS`] loads every `*.json` file in `~/.bdir/` or in the
//! directories configured beforehand:
//!
//! ```rust,ignore
//! use bdir::{set_directory_config, DirectoryConfig, BDIRS};
//!
//! set_directory_config(DirectoryConfig::with_paths(vec![
//!     "/etc/bdir".into(),
//! ])).unwrap();
//!
//! let binding = BDIRS.get();
//! let roles = binding.as_ref().unwrap().get("roles");
//! ```

mod cbor;

mod code;
pub use code::{canonical_text, is_numeric_key, parse_numeric_key};

mod entry;
pub use entry::Entry;

mod error;
pub use error::{BdirError, Result};

mod handle;
pub use handle::{Bdir, Labels};

mod macros;

mod registry;
pub use registry::{BDIRS, BdirRegistry, LazyBdirRegistry};

mod tables;

mod views;

#[cfg(feature = "directory-loading")]
mod directory_loader;

#[cfg(feature = "directory-loading")]
pub use directory_loader::{
    ConfigError, DirectoryConfig, LoadError, LoadResult, add_search_paths,
    load_from_config, load_from_directory, set_directory_config,
};
