use std::collections::HashMap;
#[cfg(feature = "directory-loading")]
use std::path::Path;
use std::sync::{Mutex, MutexGuard, Once, PoisonError};

use crate::Bdir;

/// A store of named tables.
///
/// # Examples
///
/// ```
/// use bdir::{BdirRegistry, bdir};
///
/// let mut registry = BdirRegistry::default();
/// registry.insert("roles", bdir! { User = 1, Admin = 2 }.unwrap());
///
/// let roles = registry.get("roles").unwrap();
/// assert_eq!(roles.render(2.0), "Admin");
/// assert!(registry.get("plans").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BdirRegistry {
    tables: HashMap<String, Bdir>,
}

impl BdirRegistry {
    pub fn new<T, N>(tables: T) -> Self
    where
        T: IntoIterator<Item = (N, Bdir)>,
        N: Into<String>,
    {
        let mut registry = Self::default();
        for (name, bdir) in tables {
            registry.insert(name, bdir);
        }
        registry
    }

    /// Inserts a table, returning the one it replaces under the same name.
    pub fn insert(&mut self, name: impl Into<String>, bdir: Bdir) -> Option<Bdir> {
        self.tables.insert(name.into(), bdir)
    }

    pub fn get(&self, name: &str) -> Option<&Bdir> { self.tables.get(name) }

    /// Returns the table names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize { self.tables.len() }

    pub fn is_empty(&self) -> bool { self.tables.is_empty() }

    /// Loads every `*.json` table in a directory into the registry.
    ///
    /// Tables replace existing tables with the same name. Returns the number
    /// of tables loaded.
    ///
    /// This method is only available when the `directory-loading` feature is
    /// enabled.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use bdir::BdirRegistry;
    /// use std::path::Path;
    ///
    /// let mut registry = BdirRegistry::default();
    /// let count = registry.load_from_directory(Path::new("/etc/bdir"))?;
    /// println!("Loaded {} tables", count);
    /// ```
    #[cfg(feature = "directory-loading")]
    pub fn load_from_directory(
        &mut self,
        path: &Path,
    ) -> Result<usize, crate::LoadError> {
        let tables = crate::directory_loader::load_from_directory(path)?;
        let count = tables.len();
        for (name, bdir) in tables {
            self.insert(name, bdir);
        }
        Ok(count)
    }

    /// Loads tables from every directory in the configuration.
    ///
    /// Later directories override earlier ones for the same table name.
    /// Files that fail to load are recorded in the result and skipped.
    ///
    /// This method is only available when the `directory-loading` feature is
    /// enabled.
    #[cfg(feature = "directory-loading")]
    pub fn load_from_config(
        &mut self,
        config: &crate::DirectoryConfig,
    ) -> crate::LoadResult {
        let result = crate::directory_loader::load_from_config(config);
        for (name, bdir) in &result.tables {
            self.insert(name.clone(), bdir.clone());
        }
        result
    }
}

/// A lazily initialized, thread-safe registry of named tables.
///
/// On first access the registry is created and, with the `directory-loading`
/// feature, filled from the configured search directories.
#[derive(Debug)]
pub struct LazyBdirRegistry {
    init: Once,
    data: Mutex<Option<BdirRegistry>>,
}

impl LazyBdirRegistry {
    /// Gets the global registry, initializing it if necessary.
    ///
    /// Initialization happens exactly once, even when called from multiple
    /// threads simultaneously.
    pub fn get(&self) -> MutexGuard<'_, Option<BdirRegistry>> {
        self.init.call_once(|| {
            #[allow(unused_mut)]
            let mut registry = BdirRegistry::default();

            #[cfg(feature = "directory-loading")]
            {
                let config = crate::directory_loader::get_and_lock_config();
                let result = registry.load_from_config(&config);
                tracing::debug!(
                    tables = result.tables_count(),
                    errors = result.errors.len(),
                    "initialized global bdir registry"
                );
            }

            *self.data.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(registry);
        });
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The global registry of named tables.
///
/// # Examples
///
/// ```
/// use bdir::{BDIRS, bdir};
///
/// let mut binding = BDIRS.get();
/// let registry = binding.as_mut().unwrap();
/// registry.insert("doc_roles", bdir! { User = 1 }.unwrap());
/// assert_eq!(registry.get("doc_roles").unwrap().index("User"), 1.0);
/// ```
pub static BDIRS: LazyBdirRegistry = LazyBdirRegistry {
    init: Once::new(),
    data: Mutex::new(None),
};
