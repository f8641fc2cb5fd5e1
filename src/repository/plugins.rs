//! Plugin configuration: one entry per installed plugin, schema-checked on every write.

use super::{check_versions_equal, ConfigRepository};
use crate::config::PluginConfig;
use crate::error::ConfigError;
use crate::plugin::reconcile_one;
use crate::types::section;
use crate::version::version_of;
use serde_json::{Map, Value};
use std::sync::Arc;

impl ConfigRepository {
    pub fn plugin_configs(&self) -> Arc<Vec<PluginConfig>> {
        self.plugins.load()
    }

    pub fn plugin_config(&self, plugin_id: &str) -> Option<PluginConfig> {
        self.plugins
            .load()
            .iter()
            .find(|config| config.id == plugin_id)
            .cloned()
    }

    /// Replace one plugin's properties
    ///
    /// `properties` is validated against the plugin's descriptor the same way persisted
    /// overrides are at startup: undeclared names are dropped, missing or mistyped values
    /// fall back to the declared default.
    pub fn update_plugin_config(
        &self,
        plugin_id: &str,
        properties: &Map<String, Value>,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        let descriptor = self
            .plugin_descriptors
            .iter()
            .find(|descriptor| descriptor.id == plugin_id)
            .ok_or_else(|| ConfigError::PluginNotFound(plugin_id.to_string()))?;

        let _guard = self.write_lock.lock();
        let mut configs = (*self.plugins.load()).clone();
        let index = configs
            .iter()
            .position(|config| config.id == plugin_id)
            .ok_or_else(|| ConfigError::PluginNotFound(plugin_id.to_string()))?;
        check_versions_equal(&version_of(&configs[index])?, prior_version)?;

        configs[index] = reconcile_one(descriptor, Some(properties));
        self.commit(section::PLUGINS, &self.plugins, configs)?;
        self.plugin_config_listeners.notify();
        self.config_listeners.notify();
        Ok(())
    }
}
