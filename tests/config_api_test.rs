//! Integration tests for config module public API.

use environaut::config::{deep_merge, ConfigHandler, DEFAULT_FILENAMES};
use environaut::EnvironautError;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn default_filenames_are_tried_in_order() {
    assert_eq!(DEFAULT_FILENAMES[0], "environaut.xml");
    assert!(DEFAULT_FILENAMES.contains(&"environaut.json"));
}

#[test]
fn directory_location_uses_first_default_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("environaut.xml"),
        "<environaut><name>from-xml</name></environaut>",
    )
    .unwrap();
    fs::write(temp.path().join("environaut.json"), r#"{"name": "from-json"}"#).unwrap();

    let mut handler = ConfigHandler::new();
    handler.add_location(temp.path()).unwrap();
    let config = handler.get_config().unwrap();
    assert_eq!(config.name(), Some("from-xml"));
}

#[test]
fn all_formats_merge_in_location_order() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(
        dir.join("a.json"),
        r#"{"name": "json", "keywords": ["json"], "cache": {"pretty": false}}"#,
    )
    .unwrap();
    fs::write(dir.join("b.yaml"), "keywords: [yaml]\ncache:\n  location: x.cache\n").unwrap();
    fs::write(
        dir.join("c.php"),
        "<?php\nreturn ['keywords' => ['php'], 'cache' => ['pretty' => true]];\n",
    )
    .unwrap();
    fs::write(
        dir.join("d.xml"),
        "<environaut><name>xml</name></environaut>",
    )
    .unwrap();

    let mut handler = ConfigHandler::new();
    for file in ["a.json", "b.yaml", "c.php", "d.xml"] {
        handler.add_location(dir.join(file)).unwrap();
    }
    let config = handler.get_config().unwrap();

    assert_eq!(config.name(), Some("xml"));
    assert_eq!(config.keywords(), vec!["json", "yaml", "php"]);
    assert_eq!(
        config.get("cache"),
        Some(&json!({"pretty": true, "location": "x.cache"}))
    );
}

#[test]
fn missing_location_is_rejected_on_add() {
    let temp = TempDir::new().unwrap();
    let mut handler = ConfigHandler::new();
    let result = handler.add_location(temp.path().join("nope.json"));
    assert!(matches!(
        result,
        Err(EnvironautError::UnreadableLocation { .. })
    ));
}

#[test]
fn parse_errors_name_the_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let mut handler = ConfigHandler::new();
    handler.add_location(&path).unwrap();
    let err = handler.get_config().unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn deep_merge_is_public() {
    let merged = deep_merge(&json!({"a": [1], "b": 1}), &json!({"a": [2], "b": 2}));
    assert_eq!(merged, json!({"a": [1, 2], "b": 2}));
}
