//! List entities: gauges, instrumentation rules and alerts.
//!
//! Gauges and instrumentation rules are addressed by the version derived from their
//! content. Alerts carry a persisted version, stamped on every insert and update.

use super::ConfigRepository;
use crate::concurrency::SnapshotCell;
use crate::config::{AlertConfig, GaugeConfig, InstrumentationConfig};
use crate::error::ConfigError;
use crate::types::section;
use crate::version::position_by_version;
use serde::Serialize;
use std::sync::Arc;

impl ConfigRepository {
    pub fn gauge_configs(&self) -> Arc<Vec<GaugeConfig>> {
        self.gauges.load()
    }

    pub fn instrumentation_configs(&self) -> Arc<Vec<InstrumentationConfig>> {
        self.instrumentation.load()
    }

    pub fn alert_configs(&self) -> Arc<Vec<AlertConfig>> {
        self.alerts.load()
    }

    pub fn gauge_config(&self, version: &str) -> Option<GaugeConfig> {
        find_by_version(&self.gauges.load(), version)
    }

    pub fn instrumentation_config(&self, version: &str) -> Option<InstrumentationConfig> {
        find_by_version(&self.instrumentation.load(), version)
    }

    pub fn alert_config(&self, version: &str) -> Option<AlertConfig> {
        self.alerts
            .load()
            .iter()
            .find(|alert| alert.version == version)
            .cloned()
    }

    pub fn insert_gauge_config(&self, gauge: GaugeConfig) -> Result<(), ConfigError> {
        self.edit_list(section::GAUGES, &self.gauges, |gauges| {
            check_unique_object_name(gauges, &gauge.object_name, None)?;
            gauges.push(gauge);
            Ok(())
        })
    }

    pub fn update_gauge_config(
        &self,
        gauge: GaugeConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.edit_list(section::GAUGES, &self.gauges, |gauges| {
            let replaced = position_by_version(gauges.as_slice(), prior_version)?;
            check_unique_object_name(gauges, &gauge.object_name, replaced)?;
            let index = replaced.ok_or(ConfigError::OptimisticLock)?;
            gauges[index] = gauge;
            Ok(())
        })
    }

    pub fn delete_gauge_config(&self, prior_version: &str) -> Result<(), ConfigError> {
        self.edit_list(section::GAUGES, &self.gauges, |gauges| {
            let index = position_by_version(gauges.as_slice(), prior_version)?
                .ok_or(ConfigError::OptimisticLock)?;
            gauges.remove(index);
            Ok(())
        })
    }

    pub fn insert_instrumentation_config(
        &self,
        config: InstrumentationConfig,
    ) -> Result<(), ConfigError> {
        self.edit_list(section::INSTRUMENTATION, &self.instrumentation, |configs| {
            configs.push(config);
            Ok(())
        })
    }

    pub fn update_instrumentation_config(
        &self,
        config: InstrumentationConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.edit_list(section::INSTRUMENTATION, &self.instrumentation, |configs| {
            let index = position_by_version(configs.as_slice(), prior_version)?
                .ok_or(ConfigError::OptimisticLock)?;
            configs[index] = config;
            Ok(())
        })
    }

    pub fn delete_instrumentation_config(&self, prior_version: &str) -> Result<(), ConfigError> {
        self.edit_list(section::INSTRUMENTATION, &self.instrumentation, |configs| {
            let index = position_by_version(configs.as_slice(), prior_version)?
                .ok_or(ConfigError::OptimisticLock)?;
            configs.remove(index);
            Ok(())
        })
    }

    /// Insert an alert; returns it with its version stamped
    pub fn insert_alert_config(&self, alert: AlertConfig) -> Result<AlertConfig, ConfigError> {
        let alert = alert.stamped()?;
        let inserted = alert.clone();
        self.edit_list(section::ALERTS, &self.alerts, |alerts| {
            alerts.push(alert);
            Ok(())
        })?;
        Ok(inserted)
    }

    /// Replace the alert whose persisted version is `prior_version`
    pub fn update_alert_config(
        &self,
        alert: AlertConfig,
        prior_version: &str,
    ) -> Result<AlertConfig, ConfigError> {
        let alert = alert.stamped()?;
        let updated = alert.clone();
        self.edit_list(section::ALERTS, &self.alerts, |alerts| {
            let index = alert_position(alerts, prior_version)?;
            alerts[index] = alert;
            Ok(())
        })?;
        Ok(updated)
    }

    pub fn delete_alert_config(&self, prior_version: &str) -> Result<(), ConfigError> {
        self.edit_list(section::ALERTS, &self.alerts, |alerts| {
            let index = alert_position(alerts, prior_version)?;
            alerts.remove(index);
            Ok(())
        })
    }

    /// Apply `edit` to a copy of the current list, then persist and swap it in
    fn edit_list<T: Serialize + Clone>(
        &self,
        name: &str,
        cell: &SnapshotCell<Vec<T>>,
        edit: impl FnOnce(&mut Vec<T>) -> Result<(), ConfigError>,
    ) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock();
        let mut entries = (*cell.load()).clone();
        edit(&mut entries)?;
        self.commit(name, cell, entries)?;
        self.config_listeners.notify();
        Ok(())
    }
}

fn find_by_version<T: Serialize + Clone>(entries: &[T], version: &str) -> Option<T> {
    match position_by_version(entries, version) {
        Ok(index) => index.map(|i| entries[i].clone()),
        Err(e) => {
            tracing::warn!("Failed to compute entry version: {}", e);
            None
        }
    }
}

fn check_unique_object_name(
    gauges: &[GaugeConfig],
    object_name: &str,
    replaced: Option<usize>,
) -> Result<(), ConfigError> {
    let duplicate = gauges
        .iter()
        .enumerate()
        .any(|(i, gauge)| Some(i) != replaced && gauge.object_name == object_name);
    if duplicate {
        return Err(ConfigError::DuplicateName(object_name.to_string()));
    }
    Ok(())
}

fn alert_position(alerts: &[AlertConfig], version: &str) -> Result<usize, ConfigError> {
    alerts
        .iter()
        .position(|alert| alert.version == version)
        .ok_or(ConfigError::OptimisticLock)
}
