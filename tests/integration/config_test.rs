use devinfo::core::config::Config;
use devinfo::core::permissions::Permission;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.granted_permissions.is_empty());
    assert!(config.platform_version.is_none());
    assert!(!config.hide_unavailable);
    assert_eq!(config.worker_threads(), 2);
}

#[test]
fn test_config_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.grant(Permission::AccessFineLocation);
    config.platform_version = Some(30);
    config.hide_unavailable = true;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_corrupt_or_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();

    let empty = temp_dir.path().join("empty.json");
    std::fs::write(&empty, "").unwrap();
    assert_eq!(Config::load_from(&empty).unwrap(), Config::default());

    let corrupt = temp_dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    assert_eq!(Config::load_from(&corrupt).unwrap(), Config::default());
}

#[test]
fn test_permissions_stored_by_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::default();
    config.grant(Permission::ReadPhoneState);
    config.save_to(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("read_phone_state"));
}
