use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use agentconf::config::UserRecordingConfig;
use agentconf::{version_of, ConfigError, ConfigRepository};
use parking_lot::Mutex;
use serde_json::Map;
use tempfile::TempDir;

use crate::support::open;

fn counter() -> (Arc<AtomicUsize>, Arc<dyn Fn() + Send + Sync>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let listener: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, listener)
}

#[test]
fn listener_fires_on_registration_and_once_per_update() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let (count, listener) = counter();
    repo.add_config_listener(Arc::new(move || listener()));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let current = repo.user_recording_config();
    repo.update_user_recording_config(
        UserRecordingConfig {
            users: vec!["alice".to_string()],
            ..(*current).clone()
        },
        &version_of(&*current).unwrap(),
    )
    .unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    // failed writes do not notify
    let stale = repo.update_user_recording_config(
        UserRecordingConfig::default(),
        &version_of(&*current).unwrap(),
    );
    assert!(matches!(stale, Err(ConfigError::OptimisticLock)));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn listener_observes_state_after_swap() {
    let temp = TempDir::new().unwrap();
    let repo = Arc::new(open(&temp));
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));

    let weak: Weak<ConfigRepository> = Arc::downgrade(&repo);
    let log = seen.clone();
    repo.add_config_listener(Arc::new(move || {
        if let Some(repo) = weak.upgrade() {
            log.lock().push(repo.user_recording_config().users.clone());
        }
    }));

    let current = repo.user_recording_config();
    repo.update_user_recording_config(
        UserRecordingConfig {
            users: vec!["bob".to_string()],
            ..(*current).clone()
        },
        &version_of(&*current).unwrap(),
    )
    .unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], vec!["bob".to_string()]);
}

#[test]
fn plugin_updates_notify_both_registries() {
    let temp = TempDir::new().unwrap();
    let repo = open(&temp);
    let (general, general_listener) = counter();
    let (plugin, plugin_listener) = counter();
    repo.add_config_listener(Arc::new(move || general_listener()));
    repo.add_plugin_config_listener(Arc::new(move || plugin_listener()));

    let servlet = repo.plugin_config("servlet").unwrap();
    repo.update_plugin_config("servlet", &Map::new(), &version_of(&servlet).unwrap())
        .unwrap();
    assert_eq!(general.load(Ordering::SeqCst), 2);
    assert_eq!(plugin.load(Ordering::SeqCst), 2);

    // non-plugin writes leave plugin listeners alone
    let ui = repo.user_interface_config();
    repo.update_user_interface_config((*ui).clone(), &version_of(&*ui).unwrap())
        .unwrap();
    assert_eq!(general.load(Ordering::SeqCst), 3);
    assert_eq!(plugin.load(Ordering::SeqCst), 2);
}
