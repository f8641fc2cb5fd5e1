use std::fs;
use std::sync::Arc;

use agentconf::config::{SmtpConfig, StorageConfig, TransactionConfig, UserInterfaceConfig};
use agentconf::store::{MemorySectionStore, SectionStore};
use agentconf::{version_of, ConfigError, ConfigRepository, RepositoryOptions};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::support::{open, sample_plugins, settings_in};

#[test]
fn every_domain_round_trips_through_the_file() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);

    let transaction = repo.transaction_config();
    repo.update_transaction_config(
        TransactionConfig {
            slow_threshold_millis: 750,
            ..(*transaction).clone()
        },
        &version_of(&*transaction).unwrap(),
    )
    .unwrap();

    let ui = repo.user_interface_config();
    repo.update_user_interface_config(
        UserInterfaceConfig {
            port: 4242,
            ..(*ui).clone()
        },
        &version_of(&*ui).unwrap(),
    )
    .unwrap();

    let smtp = repo.smtp_config();
    repo.update_smtp_config(
        SmtpConfig {
            host: "mail.example.com".to_string(),
            ..(*smtp).clone()
        },
        &version_of(&*smtp).unwrap(),
    )
    .unwrap();
    drop(repo);

    let reopened = open(&temp);
    assert_eq!(reopened.transaction_config().slow_threshold_millis, 750);
    assert_eq!(reopened.user_interface_config().port, 4242);
    assert_eq!(reopened.smtp_config().host, "mail.example.com");
}

#[test]
fn stale_version_is_rejected_and_state_kept() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);

    let original = repo.transaction_config();
    let prior = version_of(&*original).unwrap();
    let first = TransactionConfig {
        slow_threshold_millis: 1,
        ..(*original).clone()
    };
    repo.update_transaction_config(first.clone(), &prior).unwrap();

    let second = TransactionConfig {
        slow_threshold_millis: 2,
        ..(*original).clone()
    };
    let result = repo.update_transaction_config(second, &prior);
    assert!(matches!(result, Err(ConfigError::OptimisticLock)));
    assert_eq!(*repo.transaction_config(), first);
}

#[test]
fn persistence_failure_leaves_snapshot_unchanged() {
    let store = Arc::new(MemorySectionStore::new());
    let repo = ConfigRepository::create(
        store.clone(),
        sample_plugins(),
        RepositoryOptions {
            legacy_runtime: false,
            gauge_collection_interval_millis: 5000,
            secret_path: "unused".into(),
            rewrite_on_open: true,
        },
    );
    let before = repo.storage_config();
    store.fail_writes(true);

    let result = repo.update_storage_config(
        StorageConfig {
            trace_expiration_hours: 1,
            ..(*before).clone()
        },
        &version_of(&*before).unwrap(),
    );
    assert!(matches!(result, Err(ConfigError::Persistence { .. })));
    assert_eq!(*repo.storage_config(), *before);

    // the same prior version still works once the store recovers
    store.fail_writes(false);
    repo.update_storage_config(
        StorageConfig {
            trace_expiration_hours: 1,
            ..(*before).clone()
        },
        &version_of(&*before).unwrap(),
    )
    .unwrap();
    assert_eq!(
        store.get_section("storage").unwrap()["traceExpirationHours"],
        json!(1)
    );
}

#[test]
fn startup_rewrite_is_idempotent_and_keeps_unknown_sections() {
    let temp = TempDir::new().unwrap();
    let path = settings_in(&temp).config_path();
    fs::write(
        &path,
        r#"{
            "pluginHub": {"url": "https://hub"},
            "storage": {"rollupCappedDatabaseSizesMb": [1,2,3,4,5]}
        }"#,
    )
    .unwrap();

    let repo = open(&temp);
    assert_eq!(repo.storage_config().rollup_capped_database_sizes_mb, vec![1, 2, 3, 4]);
    drop(repo);
    let first = fs::read_to_string(&path).unwrap();

    drop(open(&temp));
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);

    let document: serde_json::Map<String, Value> = serde_json::from_str(&second).unwrap();
    let keys: Vec<&str> = document.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "transactions",
            "userRecording",
            "advanced",
            "plugins",
            "gauges",
            "instrumentation",
            "ui",
            "storage",
            "smtp",
            "alerts",
            "pluginHub"
        ]
    );
}

#[test]
fn undecodable_section_falls_back_to_default() {
    let temp = TempDir::new().unwrap();
    let path = settings_in(&temp).config_path();
    fs::write(&path, r#"{"transactions": "not an object"}"#).unwrap();

    let repo = open(&temp);
    assert_eq!(*repo.transaction_config(), TransactionConfig::default());
    drop(repo);

    let document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["transactions"], json!("not an object"));
}

#[test]
fn bad_list_entries_are_not_dropped_on_startup() {
    let temp = TempDir::new().unwrap();
    let path = settings_in(&temp).config_path();
    fs::write(
        &path,
        r#"{
            "instrumentation": [
                {"className": "com.example.Job", "methodName": "run", "captureKind": "timer",
                 "timerName": "job"},
                {"className": "com.example.Job", "methodName": "stop", "captureKind": "bogusKind"}
            ],
            "gauges": [{"objectName": "java.lang:type=Memory"}, {"objectName": 7}],
            "alerts": [{"kind": "transaction", "transactionType": "Web"}, {"kind": "nope"}]
        }"#,
    )
    .unwrap();

    let repo = open(&temp);
    assert_eq!(repo.instrumentation_configs().len(), 1);
    assert_eq!(repo.gauge_configs().len(), 1);
    assert_eq!(repo.alert_configs().len(), 1);

    let gauge = repo.gauge_configs()[0].clone();
    repo.update_gauge_config(gauge.clone(), &version_of(&gauge).unwrap())
        .unwrap();
    drop(repo);

    let document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let instrumentation = document["instrumentation"].as_array().unwrap();
    assert_eq!(instrumentation.len(), 2);
    assert_eq!(instrumentation[1]["captureKind"], json!("bogusKind"));
    assert_eq!(document["gauges"][1], json!({"objectName": 7}));
    assert_eq!(document["alerts"][1], json!({"kind": "nope"}));

    // a second start reads the same file and keeps it as is
    let first = fs::read_to_string(&path).unwrap();
    drop(open(&temp));
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn secret_key_survives_restart() {
    let temp = TempDir::new().unwrap();
    let key = open(&temp).secret_key().unwrap();
    assert_eq!(open(&temp).secret_key().unwrap(), key);
}
