//! Path resolution tests
//!
//! 1. Absolute paths are returned as-is
//! 2. Tilde (~) expands to the home directory
//! 3. Relative paths resolve from the current directory
//! 4. Config and output directories have sensible defaults

use openchj::config::path_resolver::{
    expand_home, get_config_dir, get_default_config_path, get_default_output_dir, resolve_path,
};
use tempfile::TempDir;

#[test]
fn test_absolute_path_unchanged() {
    let path = "/tmp/genji.txt";
    let resolved = resolve_path(path).unwrap();
    assert_eq!(resolved.to_str().unwrap(), path);
}

#[test]
fn test_tilde_expansion() {
    let resolved = expand_home("~/corpus").unwrap();
    let home = std::env::var("HOME").unwrap();
    assert_eq!(resolved.to_str().unwrap(), format!("{}/corpus", home));
}

#[test]
fn test_relative_path_from_current_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("genji.txt"), "いづれの御時にか").unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path()).unwrap();

    let resolved = resolve_path("genji.txt").unwrap();
    assert!(resolved.exists());
    assert!(resolved.is_absolute());

    std::env::set_current_dir(original_dir).unwrap();
}

#[test]
fn test_jis_mapping_path_with_tilde() {
    let resolved = resolve_path("~/.config/openchj/jis_mapping.json").unwrap();
    let home = std::env::var("HOME").unwrap();
    assert!(resolved.starts_with(&home));
    assert!(resolved.ends_with("jis_mapping.json"));
}

#[test]
fn test_config_dir_names_the_application() {
    assert!(get_config_dir().ends_with("openchj"));
    assert!(get_default_config_path().ends_with("openchj/config.toml"));
}

#[test]
fn test_default_output_dir_is_usable() {
    let dir = get_default_output_dir();
    assert!(!dir.as_os_str().is_empty());
}
