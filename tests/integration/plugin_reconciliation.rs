use std::fs;

use agentconf::config::PropertyValue;
use agentconf::plugin::PropertyType;
use agentconf::{version_of, ConfigError, ConfigRepository};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use crate::support::{open, plugin, property, settings_in};

#[test]
fn persisted_overrides_are_reconciled_against_descriptors() {
    let temp = TempDir::new().unwrap();
    let settings = settings_in(&temp);
    fs::write(
        settings.config_path(),
        json!({"plugins": [
            {"id": "p", "properties": {"a": true, "c": "ignored"}},
            {"id": "removed", "properties": {"x": 1}}
        ]})
        .to_string(),
    )
    .unwrap();

    let descriptors = vec![plugin(
        "p",
        vec![
            property("a", PropertyType::Boolean, Some(PropertyValue::Boolean(false))),
            property("b", PropertyType::String, Some(PropertyValue::String("x".to_string()))),
        ],
    )];
    let repo = ConfigRepository::open(&settings, descriptors).unwrap();

    let configs = repo.plugin_configs();
    assert_eq!(configs.len(), 1);
    let p = &configs[0];
    assert_eq!(p.property("a"), Some(&PropertyValue::Boolean(true)));
    assert_eq!(p.property("b"), Some(&PropertyValue::String("x".to_string())));
    assert_eq!(p.properties.len(), 2);

    let document: Value =
        serde_json::from_str(&fs::read_to_string(settings.config_path()).unwrap()).unwrap();
    assert_eq!(document["plugins"], json!([{"id": "p", "properties": {"a": true, "b": "x"}}]));
}

#[test]
fn plugins_are_ordered_ignoring_case() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let ids: Vec<String> = repo.plugin_configs().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["Jdbc", "servlet"]);
    assert_eq!(repo.plugin_descriptors()[0].id, "Jdbc");
}

#[test]
fn update_plugin_config_validates_properties() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let jdbc = repo.plugin_config("Jdbc").unwrap();
    assert_eq!(jdbc.property("stackTraceThresholdMillis"), Some(&PropertyValue::Null));

    let mut properties = Map::new();
    properties.insert("stackTraceThresholdMillis".to_string(), json!(250));
    properties.insert("unknown".to_string(), json!(true));
    repo.update_plugin_config("Jdbc", &properties, &version_of(&jdbc).unwrap())
        .unwrap();

    let updated = repo.plugin_config("Jdbc").unwrap();
    assert_eq!(
        updated.property("stackTraceThresholdMillis"),
        Some(&PropertyValue::Number(250.0))
    );
    assert!(updated.property("unknown").is_none());

    let stale = repo.update_plugin_config("Jdbc", &Map::new(), &version_of(&jdbc).unwrap());
    assert!(matches!(stale, Err(ConfigError::OptimisticLock)));
}

#[test]
fn update_unknown_plugin_fails() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let result = repo.update_plugin_config("missing", &Map::new(), "any");
    assert!(matches!(result, Err(ConfigError::PluginNotFound(id)) if id == "missing"));
}

#[test]
fn mistyped_override_falls_back_to_default() {
    let temp = TempDir::new().unwrap();
    let settings = settings_in(&temp);
    fs::write(
        settings.config_path(),
        r#"{"plugins": [{"id": "servlet", "properties": {"enabled": "yes"}}]}"#,
    )
    .unwrap();
    let repo = ConfigRepository::open(&settings, crate::support::sample_plugins()).unwrap();
    assert!(repo.plugin_config("servlet").unwrap().boolean_property("enabled"));
}
