use std::sync::{Arc, Barrier};
use std::thread;

use agentconf::config::{AdvancedConfig, GaugeConfig};
use agentconf::{version_of, ConfigError};
use tempfile::TempDir;

use crate::support::open;

#[test]
fn same_prior_version_lets_exactly_one_writer_win() {
    let temp = TempDir::new().unwrap();
    let repo = Arc::new(open(&temp));
    let current = repo.advanced_config();
    let prior = version_of(&*current).unwrap();

    let writers = 8;
    let barrier = Arc::new(Barrier::new(writers));
    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let repo = repo.clone();
            let barrier = barrier.clone();
            let prior = prior.clone();
            let updated = AdvancedConfig {
                max_trace_entries_per_transaction: 100 + i as u32,
                ..(*current).clone()
            };
            thread::spawn(move || {
                barrier.wait();
                repo.update_advanced_config(updated, &prior)
            })
        })
        .collect();

    let results: Vec<Result<(), ConfigError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ConfigError::OptimisticLock)));

    let reopened = open(&temp);
    assert_eq!(*reopened.advanced_config(), *repo.advanced_config());
}

#[test]
fn readers_see_whole_lists_during_inserts() {
    let temp = TempDir::new().unwrap();
    let repo = Arc::new(open(&temp));
    let initial = repo.gauge_configs().len();

    let writer = {
        let repo = repo.clone();
        thread::spawn(move || {
            for i in 0..20 {
                repo.insert_gauge_config(GaugeConfig {
                    object_name: format!("app:type=Pool,name={}", i),
                    attributes: Vec::new(),
                })
                .unwrap();
            }
        })
    };

    let mut last = initial;
    while !writer.is_finished() {
        let len = repo.gauge_configs().len();
        assert!(len >= last);
        last = len;
    }
    writer.join().unwrap();
    assert_eq!(repo.gauge_configs().len(), initial + 20);
}
