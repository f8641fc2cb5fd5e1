use agentconf::config::{
    AlertConfig, CaptureKind, GaugeAttribute, GaugeConfig, InstrumentationConfig,
};
use agentconf::{version_of, ConfigError};
use tempfile::TempDir;

use crate::support::open;

fn gauge(object_name: &str) -> GaugeConfig {
    GaugeConfig {
        object_name: object_name.to_string(),
        attributes: vec![GaugeAttribute {
            name: "Count".to_string(),
            ever_increasing: true,
        }],
    }
}

fn timer_rule(method: &str) -> InstrumentationConfig {
    InstrumentationConfig {
        class_name: "com.example.Service".to_string(),
        method_name: method.to_string(),
        capture_kind: CaptureKind::Timer,
        timer_name: "service call".to_string(),
        ..InstrumentationConfig::default()
    }
}

#[test]
fn duplicate_gauge_name_is_rejected_and_list_unchanged() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let before = repo.gauge_configs();

    let result = repo.insert_gauge_config(gauge("java.lang:type=Memory"));
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateName(name)) if name == "java.lang:type=Memory"
    ));
    assert_eq!(repo.gauge_configs(), before);
}

#[test]
fn duplicate_check_runs_before_version_match() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);

    let result = repo.update_gauge_config(gauge("java.lang:type=Memory"), "no-such-version");
    assert!(matches!(result, Err(ConfigError::DuplicateName(_))));
}

#[test]
fn gauge_update_may_keep_its_own_name() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let memory = repo.gauge_configs()[0].clone();
    let prior = version_of(&memory).unwrap();

    let updated = GaugeConfig {
        attributes: Vec::new(),
        ..memory.clone()
    };
    repo.update_gauge_config(updated.clone(), &prior).unwrap();

    assert_eq!(repo.gauge_configs()[0], updated);
    assert!(repo.gauge_config(&prior).is_none());
    assert_eq!(
        repo.gauge_config(&version_of(&updated).unwrap()),
        Some(updated)
    );
}

#[test]
fn gauge_delete_by_version() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let count = repo.gauge_configs().len();
    let prior = version_of(&repo.gauge_configs()[1]).unwrap();

    repo.delete_gauge_config(&prior).unwrap();
    assert_eq!(repo.gauge_configs().len(), count - 1);
    assert!(matches!(
        repo.delete_gauge_config(&prior),
        Err(ConfigError::OptimisticLock)
    ));
}

#[test]
fn instrumentation_update_preserves_position() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    for method in ["first", "second", "third"] {
        repo.insert_instrumentation_config(timer_rule(method)).unwrap();
    }
    let prior = version_of(&timer_rule("second")).unwrap();
    assert_eq!(repo.instrumentation_config(&prior), Some(timer_rule("second")));

    repo.update_instrumentation_config(timer_rule("middle"), &prior)
        .unwrap();
    let methods: Vec<String> = repo
        .instrumentation_configs()
        .iter()
        .map(|c| c.method_name.clone())
        .collect();
    assert_eq!(methods, vec!["first", "middle", "third"]);

    assert!(matches!(
        repo.update_instrumentation_config(timer_rule("again"), &prior),
        Err(ConfigError::OptimisticLock)
    ));

    repo.delete_instrumentation_config(&version_of(&timer_rule("first")).unwrap())
        .unwrap();
    assert_eq!(repo.instrumentation_configs().len(), 2);
}

#[test]
fn alerts_are_addressed_by_stamped_version() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);

    let inserted = repo
        .insert_alert_config(AlertConfig {
            transaction_type: "Web".to_string(),
            transaction_percentile: Some(95.0),
            transaction_threshold_millis: Some(1000),
            time_period_seconds: 300,
            ..AlertConfig::default()
        })
        .unwrap();
    assert!(!inserted.version.is_empty());
    assert_eq!(repo.alert_config(&inserted.version), Some(inserted.clone()));

    let updated = repo
        .update_alert_config(
            AlertConfig {
                time_period_seconds: 600,
                ..inserted.clone()
            },
            &inserted.version,
        )
        .unwrap();
    assert_ne!(updated.version, inserted.version);
    assert!(repo.alert_config(&inserted.version).is_none());

    assert!(matches!(
        repo.delete_alert_config(&inserted.version),
        Err(ConfigError::OptimisticLock)
    ));
    repo.delete_alert_config(&updated.version).unwrap();
    assert!(repo.alert_configs().is_empty());
}

#[test]
fn lists_persist_across_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let repo = open(&temp);
        repo.insert_gauge_config(gauge("app:type=Cache")).unwrap();
        repo.insert_instrumentation_config(timer_rule("run")).unwrap();
    }
    let repo = open(&temp);
    assert!(repo
        .gauge_configs()
        .iter()
        .any(|g| g.object_name == "app:type=Cache"));
    assert_eq!(*repo.instrumentation_configs(), vec![timer_rule("run")]);
}
