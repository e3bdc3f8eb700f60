//! Integration tests for the directory-loading feature.

#[cfg(feature = "directory-loading")]
mod tests {
    use std::path::Path;

    use bdir::{
        BDIRS, BdirRegistry, ConfigError, DirectoryConfig, LoadError,
        add_search_paths, bdir, set_directory_config,
    };
    use tempfile::TempDir;

    #[test]
    fn test_global_registry_still_works() {
        let binding = BDIRS.get();
        assert!(binding.as_ref().is_some());
    }

    #[test]
    fn test_configuration_locked_after_first_access() {
        drop(BDIRS.get());

        assert_eq!(
            set_directory_config(DirectoryConfig::new()),
            Err(ConfigError::AlreadyInitialized)
        );
        assert_eq!(
            add_search_paths(vec!["/etc/bdir".into()]),
            Err(ConfigError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_load_from_temp_directory() {
        let temp_dir = TempDir::new().unwrap();
        let json = r#"{
            "None": 0,
            "User": 1,
            "Admin": 2,
            "0": "",
            "2": "Administrator"
        }"#;
        std::fs::write(temp_dir.path().join("roles.json"), json).unwrap();

        let mut registry = BdirRegistry::new([("plans", bdir! { Free = 0 }.unwrap())]);
        let count = registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(count, 1);
        let roles = registry.get("roles").unwrap();
        assert_eq!(roles.keys(), ["None", "User", "Admin"]);
        assert_eq!(roles.render(2.0), "Administrator");

        // Existing tables are kept
        assert!(registry.get("plans").is_some());
    }

    #[test]
    fn test_loaded_table_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("roles.json"),
            r#"{"Guest": 0}"#,
        )
        .unwrap();

        let mut registry = BdirRegistry::new([("roles", bdir! { User = 1 }.unwrap())]);
        registry.load_from_directory(temp_dir.path()).unwrap();

        let roles = registry.get("roles").unwrap();
        assert!(roles.is_key("Guest"));
        assert!(!roles.is_key("User"));
    }

    #[test]
    fn test_multiple_files_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("roles.json"), r#"{"User": 1}"#)
            .unwrap();
        std::fs::write(temp_dir.path().join("plans.json"), r#"{"Pro": 1}"#)
            .unwrap();

        let mut registry = BdirRegistry::default();
        let count = registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.names(), ["plans", "roles"]);
    }

    #[test]
    fn test_later_directory_overrides_earlier() {
        let temp_dir1 = TempDir::new().unwrap();
        let temp_dir2 = TempDir::new().unwrap();
        std::fs::write(
            temp_dir1.path().join("status.json"),
            r#"{"Draft": 0, "Live": 1}"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir1.path().join("colors.json"),
            r#"{"Red": 10}"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir2.path().join("status.json"),
            r#"{"Draft": 0, "Published": 1, "1": "Live"}"#,
        )
        .unwrap();

        let config = DirectoryConfig::with_paths(vec![
            temp_dir1.path().to_path_buf(),
            temp_dir2.path().to_path_buf(),
        ]);
        let mut registry = BdirRegistry::default();
        let result = registry.load_from_config(&config);

        assert_eq!(result.tables_count(), 2);
        assert_eq!(result.files_processed.len(), 3);
        assert!(!result.has_errors());

        let status = registry.get("status").unwrap();
        assert_eq!(status.reverse_index(1.0), "Published");
        assert_eq!(status.render(1.0), "Live");
        assert!(registry.get("colors").is_some());
    }

    #[test]
    fn test_nonexistent_directory_is_ok() {
        let mut registry = BdirRegistry::default();
        let result =
            registry.load_from_directory(Path::new("/nonexistent/path/12345"));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("invalid.json"), "{ not json }")
            .unwrap();

        let mut registry = BdirRegistry::default();
        let error = registry.load_from_directory(temp_dir.path()).unwrap_err();

        assert!(matches!(error, LoadError::Json { .. }));
    }

    #[test]
    fn test_invalid_table_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("roles.json"),
            r#"{"None": 0, "User": 0}"#,
        )
        .unwrap();

        let error = bdir::load_from_directory(temp_dir.path()).unwrap_err();
        match error {
            LoadError::Build { file, error } => {
                assert!(file.ends_with("roles.json"));
                assert!(error.to_string().contains("duplicate value detected"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tolerant_loading_continues_on_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("valid.json"), r#"{"Ok": 1}"#)
            .unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{ invalid json }")
            .unwrap();
        std::fs::write(
            temp_dir.path().join("orphan.json"),
            r#"{"None": 0, "3": "Ghost"}"#,
        )
        .unwrap();

        let config =
            DirectoryConfig::with_paths(vec![temp_dir.path().to_path_buf()]);
        let result = bdir::load_from_config(&config);

        assert!(result.tables.contains_key("valid"));
        assert_eq!(result.tables_count(), 1);
        assert_eq!(result.errors.len(), 2);
        assert!(
            result
                .errors
                .iter()
                .any(|(_, error)| matches!(error, LoadError::Build { .. }))
        );
    }

    #[test]
    fn test_non_json_files_ignored() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("roles.json"), r#"{"User": 1}"#)
            .unwrap();
        std::fs::write(temp_dir.path().join("readme.txt"), "Some text").unwrap();
        std::fs::write(temp_dir.path().join("data.xml"), "<xml/>").unwrap();

        let mut registry = BdirRegistry::default();
        let count = registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(count, 1);
        assert!(registry.get("roles").is_some());
    }

    #[test]
    fn test_empty_object_is_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("empty.json"), "{}").unwrap();

        let tables = bdir::load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "empty");
        assert!(tables[0].1.is_empty());
    }
}
