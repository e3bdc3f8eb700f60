//! Directory-based loading of tables from JSON files.
//!
//! This module provides functionality to load named tables from JSON files
//! stored in configurable directories. It is only available when the
//! `directory-loading` feature is enabled (which is the default).
//!
//! # Overview
//!
//! The module supports loading tables from:
//! - A default directory: `~/.bdir/`
//! - Custom directories specified at runtime
//!
//! Each `*.json` file holds one table, named after the file stem. A table
//! loaded later replaces an earlier table with the same name.
//!
//! # JSON File Format
//!
//! A table file is the flat object form accepted by
//! [`Bdir::from_object`](crate::Bdir::from_object). `roles.json`:
//!
//! ```json
//! {
//!   "None": 0,
//!   "User": 1,
//!   "Admin": 2,
//!   "0": "",
//!   "2": "Administrator"
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Bdir, BdirError};

/// Errors that can occur when loading tables from directories.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An I/O error occurred while reading files.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A file is not a JSON object.
    #[error("JSON parse error in {}: {error}", file.display())]
    Json {
        /// The file that caused the error.
        file: PathBuf,
        /// The underlying JSON error.
        #[source]
        error: serde_json::Error,
    },

    /// A file parsed, but its contents are not a valid table.
    #[error("invalid table in {}: {error}", file.display())]
    Build {
        /// The file that caused the error.
        file: PathBuf,
        /// The validation failure.
        #[source]
        error: BdirError,
    },
}

/// Result of a directory loading operation.
#[derive(Debug, Default)]
pub struct LoadResult {
    /// Tables loaded, keyed by name.
    pub tables: HashMap<String, Bdir>,
    /// Files that were successfully loaded.
    pub files_processed: Vec<PathBuf>,
    /// Non-fatal errors encountered during loading.
    pub errors: Vec<(PathBuf, LoadError)>,
}

impl LoadResult {
    /// Returns the number of distinct tables loaded.
    pub fn tables_count(&self) -> usize { self.tables.len() }

    /// Returns an iterator over the loaded tables and their names.
    pub fn tables_iter(&self) -> impl Iterator<Item = (&str, &Bdir)> {
        self.tables.iter().map(|(name, bdir)| (name.as_str(), bdir))
    }

    /// Consumes the result and returns the loaded tables.
    pub fn into_tables(self) -> impl Iterator<Item = (String, Bdir)> {
        self.tables.into_iter()
    }

    /// Returns true if any errors occurred during loading.
    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }
}

/// Configuration for loading tables from directories.
///
/// Directories are processed in order, with tables from later directories
/// replacing tables from earlier directories when names collide.
///
/// # Examples
///
/// ```rust,ignore
/// use bdir::DirectoryConfig;
///
/// // Use only the default directory (~/.bdir/)
/// let config = DirectoryConfig::default_only();
///
/// // Use custom paths
/// let config = DirectoryConfig::with_paths(vec![
///     "/etc/bdir".into(),
///     "/usr/share/bdir".into(),
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    /// Search paths in priority order (later paths override earlier).
    paths: Vec<PathBuf>,
}

impl DirectoryConfig {
    /// Creates a new empty configuration with no search paths.
    pub fn new() -> Self { Self { paths: Vec::new() } }

    /// Creates configuration with only the default directory (`~/.bdir/`).
    pub fn default_only() -> Self {
        Self { paths: vec![Self::default_directory()] }
    }

    /// Creates configuration with custom paths, processed in order.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self { Self { paths } }

    /// Creates configuration with custom paths followed by the default
    /// directory, whose tables therefore take precedence.
    pub fn with_paths_and_default(mut paths: Vec<PathBuf>) -> Self {
        paths.push(Self::default_directory());
        Self { paths }
    }

    /// Returns the default directory: `~/.bdir/`
    ///
    /// Falls back to `./.bdir/` if the home directory cannot be determined.
    pub fn default_directory() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bdir")
    }

    pub fn paths(&self) -> &[PathBuf] { &self.paths }

    /// Adds a path after the existing ones.
    pub fn add_path(&mut self, path: PathBuf) { self.paths.push(path); }
}

/// Loads every table in a directory.
///
/// Returns an empty vector if the directory doesn't exist. Any I/O, JSON, or
/// validation error aborts the load.
///
/// # Examples
///
/// ```rust,ignore
/// use bdir::load_from_directory;
/// use std::path::Path;
///
/// for (name, table) in load_from_directory(Path::new("/etc/bdir"))? {
///     println!("{}: {:?}", name, table.keys());
/// }
/// ```
pub fn load_from_directory(path: &Path) -> Result<Vec<(String, Bdir)>, LoadError> {
    json_files(path)?
        .into_iter()
        .map(|file| load_single_file(&file))
        .collect()
}

/// Loads tables from all directories in the given configuration.
///
/// This function is fault-tolerant: files that fail to load are recorded in
/// the returned `LoadResult` and skipped.
pub fn load_from_config(config: &DirectoryConfig) -> LoadResult {
    let mut result = LoadResult::default();

    for dir_path in config.paths() {
        let files = match json_files(dir_path) {
            Ok(files) => files,
            Err(error) => {
                warn!(dir = %dir_path.display(), %error, "skipping bdir directory");
                result.errors.push((dir_path.clone(), error));
                continue;
            }
        };
        for file in files {
            match load_single_file(&file) {
                Ok((name, bdir)) => {
                    result.tables.insert(name, bdir);
                    result.files_processed.push(file);
                }
                Err(error) => {
                    warn!(file = %file.display(), %error, "skipping bdir file");
                    result.errors.push((file, error));
                }
            }
        }
    }

    result
}

/// Lists the `*.json` files of a directory in name order.
fn json_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let file_path = entry?.path();
        if file_path.extension().is_some_and(|ext| ext == "json") {
            files.push(file_path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads one table, named after the file stem.
fn load_single_file(path: &Path) -> Result<(String, Bdir), LoadError> {
    let content = fs::read_to_string(path)?;
    let object: Map<String, Value> =
        serde_json::from_str(&content).map_err(|error| LoadError::Json {
            file: path.to_path_buf(),
            error,
        })?;
    let bdir = Bdir::from_object(&object).map_err(|error| LoadError::Build {
        file: path.to_path_buf(),
        error,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(file = %path.display(), table = %name, codes = bdir.len(), "loaded bdir");
    Ok((name, bdir))
}

// Global configuration state
static CUSTOM_CONFIG: Mutex<Option<DirectoryConfig>> = Mutex::new(None);
static CONFIG_LOCKED: AtomicBool = AtomicBool::new(false);

/// Error returned when configuration cannot be modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Configuration was attempted after the global registry was initialized.
    #[error("Cannot modify directory configuration after BDIRS has been accessed")]
    AlreadyInitialized,
}

/// Sets custom directory configuration for the global registry.
///
/// This function must be called **before** the first access to `BDIRS`.
/// Once `BDIRS` is accessed, the configuration is locked.
///
/// # Examples
///
/// ```rust,ignore
/// use bdir::{set_directory_config, DirectoryConfig, BDIRS};
///
/// set_directory_config(DirectoryConfig::with_paths(vec![
///     "/custom/path".into(),
/// ]))?;
///
/// let binding = BDIRS.get();
/// ```
pub fn set_directory_config(config: DirectoryConfig) -> Result<(), ConfigError> {
    let mut guard = CUSTOM_CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
    if CONFIG_LOCKED.load(Ordering::SeqCst) {
        return Err(ConfigError::AlreadyInitialized);
    }
    *guard = Some(config);
    Ok(())
}

/// Adds search paths to the directory configuration.
///
/// This function must be called **before** the first access to `BDIRS`.
/// If no configuration has been set, the paths are appended to the default
/// directory.
pub fn add_search_paths(paths: Vec<PathBuf>) -> Result<(), ConfigError> {
    let mut guard = CUSTOM_CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
    if CONFIG_LOCKED.load(Ordering::SeqCst) {
        return Err(ConfigError::AlreadyInitialized);
    }
    append_search_paths(&mut guard, paths);
    Ok(())
}

/// Appends paths to a pending configuration, starting from the default
/// directory when none is set.
fn append_search_paths(
    pending: &mut Option<DirectoryConfig>,
    paths: Vec<PathBuf>,
) {
    let config = pending.get_or_insert_with(DirectoryConfig::default_only);
    for path in paths {
        config.add_path(path);
    }
}

/// Gets the current directory configuration, locking it for future
/// modifications.
///
/// The flag is only read or written while `CUSTOM_CONFIG` is held, so a
/// setter either lands before the lock or fails.
pub(crate) fn get_and_lock_config() -> DirectoryConfig {
    let mut guard = CUSTOM_CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
    CONFIG_LOCKED.store(true, Ordering::SeqCst);
    guard.take().unwrap_or_else(DirectoryConfig::default_only)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_config_default() {
        let config = DirectoryConfig::default_only();
        assert_eq!(config.paths().len(), 1);
        assert!(config.paths()[0].ends_with(".bdir"));
    }

    #[test]
    fn test_directory_config_with_default() {
        let mut config =
            DirectoryConfig::with_paths_and_default(vec![PathBuf::from("/custom")]);
        config.add_path(PathBuf::from("/last"));
        assert_eq!(config.paths().len(), 3);
        assert_eq!(config.paths()[0], PathBuf::from("/custom"));
        assert!(config.paths()[1].ends_with(".bdir"));
        assert_eq!(config.paths()[2], PathBuf::from("/last"));
        assert!(DirectoryConfig::new().paths().is_empty());
    }

    #[test]
    fn test_append_search_paths_starts_from_default() {
        let mut pending = None;
        append_search_paths(&mut pending, vec![PathBuf::from("/etc/bdir")]);
        let config = pending.as_ref().unwrap();
        assert_eq!(config.paths().len(), 2);
        assert!(config.paths()[0].ends_with(".bdir"));
        assert_eq!(config.paths()[1], PathBuf::from("/etc/bdir"));

        let mut pending =
            Some(DirectoryConfig::with_paths(vec![PathBuf::from("/a")]));
        append_search_paths(
            &mut pending,
            vec![PathBuf::from("/b"), PathBuf::from("/c")],
        );
        assert_eq!(
            pending.as_ref().unwrap().paths(),
            [PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_load_from_nonexistent_directory() {
        let result = load_from_directory(Path::new("/nonexistent/path/12345"));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_result_methods() {
        let mut result = LoadResult::default();
        assert_eq!(result.tables_count(), 0);
        assert!(!result.has_errors());

        result.tables.insert("empty".to_string(), Bdir::default());
        assert_eq!(result.tables_count(), 1);
        assert_eq!(result.tables_iter().next().map(|(name, _)| name), Some("empty"));
        assert_eq!(result.into_tables().count(), 1);
    }

    #[test]
    fn test_build_error_names_file() {
        let error = LoadError::Build {
            file: PathBuf::from("/tables/roles.json"),
            error: BdirError::DuplicateKey { key: "User".to_string(), code: 1.0 },
        };
        assert!(error.to_string().starts_with("invalid table in /tables/roles.json: "));
        assert!(std::error::Error::source(&error).is_some());
    }
}
