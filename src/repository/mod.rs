//! Configuration Repository
//!
//! Owns every mutable agent setting. On construction each section is loaded from the
//! section store into a snapshot cell, with defaults for missing sections, plugin
//! reconciliation against the installed plugins and repair of storage lists. The
//! fully populated document is then written back once. Whatever could not be decoded
//! is written back as it was found: a whole scalar section until it is next updated,
//! single list entries for as long as their list exists.
//!
//! Reads go straight to the snapshot cells and never lock. Writes serialize on one
//! repository write lock and follow the same order every time: check the caller's
//! prior version, persist, swap the snapshot, notify listeners. A failed persist
//! leaves the snapshot untouched.

mod domains;
mod lists;
mod plugins;

use crate::concurrency::SnapshotCell;
use crate::config::{
    build_rollup_configs, default_gauge_configs, AdvancedConfig, AgentConfigSnapshot,
    AlertConfig, GaugeConfig, InstrumentationConfig, PluginConfig, RollupConfig, SmtpConfig,
    StorageConfig, TransactionConfig, UserInterfaceConfig, UserRecordingConfig,
};
use crate::error::ConfigError;
use crate::listener::{ConfigListener, ListenerRegistry};
use crate::plugin::{reconcile, sorted_descriptors, PersistedPluginConfig, PluginDescriptor};
use crate::secret::{SecretKey, SecretKeyManager};
use crate::settings::RepositorySettings;
use crate::store::{
    decode_section, read_list_section, read_section, JsonFileStore, SectionRead, SectionStore,
};
use crate::types::section;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Process-level inputs that shape defaults
#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Platform runtime lacks CPU load metrics; trims the default gauges
    pub legacy_runtime: bool,
    pub gauge_collection_interval_millis: u64,
    pub secret_path: PathBuf,
    /// Write the loaded document back once on construction
    pub rewrite_on_open: bool,
}

impl RepositoryOptions {
    pub fn from_settings(settings: &RepositorySettings) -> Self {
        Self {
            legacy_runtime: settings.legacy_runtime,
            gauge_collection_interval_millis: settings.gauge_collection_interval_millis,
            secret_path: settings.secret_path(),
            rewrite_on_open: true,
        }
    }
}

/// Versioned, concurrently-safe configuration repository
pub struct ConfigRepository {
    store: Arc<dyn SectionStore>,
    /// Installed plugins in canonical order
    plugin_descriptors: Vec<PluginDescriptor>,
    options: RepositoryOptions,
    write_lock: Mutex<()>,
    config_listeners: ListenerRegistry,
    plugin_config_listeners: ListenerRegistry,
    rollup_configs: Vec<RollupConfig>,
    secret: SecretKeyManager,
    unreadable: Mutex<Unreadable>,

    transaction: SnapshotCell<TransactionConfig>,
    user_recording: SnapshotCell<UserRecordingConfig>,
    advanced: SnapshotCell<AdvancedConfig>,
    plugins: SnapshotCell<Vec<PluginConfig>>,
    gauges: SnapshotCell<Vec<GaugeConfig>>,
    instrumentation: SnapshotCell<Vec<InstrumentationConfig>>,
    ui: SnapshotCell<UserInterfaceConfig>,
    storage: SnapshotCell<StorageConfig>,
    smtp: SnapshotCell<SmtpConfig>,
    alerts: SnapshotCell<Vec<AlertConfig>>,
}

/// Persisted content the repository could not decode
#[derive(Debug, Clone, Default)]
struct Unreadable {
    /// Whole sections, by name
    sections: BTreeMap<String, Value>,
    /// Single entries of list sections, by name
    entries: BTreeMap<String, Vec<Value>>,
}

impl Unreadable {
    /// The value to persist for `name`: list entries that could not be decoded follow
    /// the decoded ones.
    fn persisted_value(&self, name: &str, mut value: Value) -> Value {
        if let (Value::Array(items), Some(kept)) = (&mut value, self.entries.get(name)) {
            items.extend(kept.iter().cloned());
        }
        value
    }

    /// Like `persisted_value`, but a section that could not be decoded at all wins
    fn document_value(&self, name: &str, value: Value) -> Value {
        match self.sections.get(name) {
            Some(raw) => raw.clone(),
            None => self.persisted_value(name, value),
        }
    }
}

/// Reads sections, remembering what could not be decoded
struct SectionLoader<'a> {
    store: &'a dyn SectionStore,
    unreadable: Unreadable,
}

impl<'a> SectionLoader<'a> {
    fn scalar<T: DeserializeOwned>(&mut self, name: &str) -> Option<T> {
        match decode_section(self.store, name) {
            SectionRead::Decoded(value) => Some(value),
            SectionRead::Absent => None,
            SectionRead::Unreadable(raw) => {
                self.unreadable.sections.insert(name.to_string(), raw);
                None
            }
        }
    }

    fn list<T: DeserializeOwned>(&mut self, name: &str) -> Option<Vec<T>> {
        match read_list_section(self.store, name) {
            SectionRead::Decoded(section) => {
                if !section.unreadable.is_empty() {
                    self.unreadable
                        .entries
                        .insert(name.to_string(), section.unreadable);
                }
                Some(section.entries)
            }
            SectionRead::Absent => None,
            SectionRead::Unreadable(raw) => {
                self.unreadable.sections.insert(name.to_string(), raw);
                None
            }
        }
    }
}

/// Values of every modeled section, in one place
struct DomainSet {
    transaction: TransactionConfig,
    user_recording: UserRecordingConfig,
    advanced: AdvancedConfig,
    plugins: Vec<PluginConfig>,
    gauges: Vec<GaugeConfig>,
    instrumentation: Vec<InstrumentationConfig>,
    ui: UserInterfaceConfig,
    storage: StorageConfig,
    smtp: SmtpConfig,
    alerts: Vec<AlertConfig>,
    unreadable: Unreadable,
}

impl DomainSet {
    fn load(
        store: &dyn SectionStore,
        descriptors: &[PluginDescriptor],
        options: &RepositoryOptions,
    ) -> Self {
        let mut loader = SectionLoader {
            store,
            unreadable: Unreadable::default(),
        };

        // plugin entries that cannot be read match no installed plugin
        let persisted_plugins =
            match read_list_section::<PersistedPluginConfig>(store, section::PLUGINS) {
                SectionRead::Decoded(section) => Some(section.entries),
                SectionRead::Absent | SectionRead::Unreadable(_) => None,
            };

        let instrumentation: Vec<InstrumentationConfig> =
            loader.list(section::INSTRUMENTATION).unwrap_or_default();
        for config in &instrumentation {
            // kept as-is so the rule stays visible for correction
            if let Err(e) = config.validate() {
                tracing::error!("Invalid instrumentation config loaded: {}", e);
            }
        }

        let storage = match loader.scalar::<StorageConfig>(section::STORAGE) {
            Some(storage) if storage.has_list_issues() => {
                tracing::info!("Correcting storage list lengths to match rollup levels");
                storage.with_corrected_lists()
            }
            Some(storage) => storage,
            None => StorageConfig::default(),
        };

        DomainSet {
            transaction: loader.scalar(section::TRANSACTIONS).unwrap_or_default(),
            user_recording: loader.scalar(section::USER_RECORDING).unwrap_or_default(),
            advanced: loader.scalar(section::ADVANCED).unwrap_or_default(),
            plugins: reconcile(persisted_plugins.as_deref(), descriptors),
            gauges: loader
                .list(section::GAUGES)
                .unwrap_or_else(|| default_gauge_configs(options.legacy_runtime)),
            instrumentation,
            ui: loader.scalar(section::UI).unwrap_or_default(),
            storage,
            smtp: loader.scalar(section::SMTP).unwrap_or_default(),
            alerts: loader.list(section::ALERTS).unwrap_or_default(),
            unreadable: loader.unreadable,
        }
    }

    fn defaults(descriptors: &[PluginDescriptor], options: &RepositoryOptions) -> Self {
        DomainSet {
            transaction: TransactionConfig::default(),
            user_recording: UserRecordingConfig::default(),
            advanced: AdvancedConfig::default(),
            plugins: reconcile(None, descriptors),
            gauges: default_gauge_configs(options.legacy_runtime),
            instrumentation: Vec::new(),
            ui: UserInterfaceConfig::default(),
            storage: StorageConfig::default(),
            smtp: SmtpConfig::default(),
            alerts: Vec::new(),
            unreadable: Unreadable::default(),
        }
    }

    /// Sections in canonical document order
    fn sections(&self) -> Result<Vec<(String, Value)>, ConfigError> {
        let entry = |name: &str, value: Value| -> (String, Value) {
            (name.to_string(), self.unreadable.document_value(name, value))
        };
        Ok(vec![
            entry(section::TRANSACTIONS, serde_json::to_value(&self.transaction)?),
            entry(section::USER_RECORDING, serde_json::to_value(&self.user_recording)?),
            entry(section::ADVANCED, serde_json::to_value(&self.advanced)?),
            entry(section::PLUGINS, serde_json::to_value(&self.plugins)?),
            entry(section::GAUGES, serde_json::to_value(&self.gauges)?),
            entry(section::INSTRUMENTATION, serde_json::to_value(&self.instrumentation)?),
            entry(section::UI, serde_json::to_value(&self.ui)?),
            entry(section::STORAGE, serde_json::to_value(&self.storage)?),
            entry(section::SMTP, serde_json::to_value(&self.smtp)?),
            entry(section::ALERTS, serde_json::to_value(&self.alerts)?),
        ])
    }
}

impl ConfigRepository {
    /// Open the repository described by process settings
    pub fn open(
        settings: &RepositorySettings,
        plugin_descriptors: Vec<PluginDescriptor>,
    ) -> Result<Self, ConfigError> {
        let store = JsonFileStore::open(settings.config_path())?;
        Ok(Self::create(
            Arc::new(store),
            plugin_descriptors,
            RepositoryOptions::from_settings(settings),
        ))
    }

    /// Open for inspection: nothing is written back and a malformed file stays in place
    pub fn open_read_only(
        settings: &RepositorySettings,
        plugin_descriptors: Vec<PluginDescriptor>,
    ) -> Result<Self, ConfigError> {
        let store = JsonFileStore::open_read_only(settings.config_path())?;
        Ok(Self::create(
            Arc::new(store),
            plugin_descriptors,
            RepositoryOptions {
                rewrite_on_open: false,
                ..RepositoryOptions::from_settings(settings)
            },
        ))
    }

    /// Build the repository over any section store
    ///
    /// A failure of the one-time startup rewrite is logged, not returned; the loaded
    /// values are still served. With `rewrite_on_open` unset the store is left as found.
    pub fn create(
        store: Arc<dyn SectionStore>,
        plugin_descriptors: Vec<PluginDescriptor>,
        options: RepositoryOptions,
    ) -> Self {
        let plugin_descriptors = sorted_descriptors(&plugin_descriptors);
        let loaded = DomainSet::load(store.as_ref(), &plugin_descriptors, &options);

        let repository = Self {
            secret: SecretKeyManager::new(options.secret_path.clone()),
            unreadable: Mutex::new(loaded.unreadable),
            rollup_configs: build_rollup_configs(),
            write_lock: Mutex::new(()),
            config_listeners: ListenerRegistry::new(),
            plugin_config_listeners: ListenerRegistry::new(),
            transaction: SnapshotCell::new(loaded.transaction),
            user_recording: SnapshotCell::new(loaded.user_recording),
            advanced: SnapshotCell::new(loaded.advanced),
            plugins: SnapshotCell::new(loaded.plugins),
            gauges: SnapshotCell::new(loaded.gauges),
            instrumentation: SnapshotCell::new(loaded.instrumentation),
            ui: SnapshotCell::new(loaded.ui),
            storage: SnapshotCell::new(loaded.storage),
            smtp: SnapshotCell::new(loaded.smtp),
            alerts: SnapshotCell::new(loaded.alerts),
            store,
            plugin_descriptors,
            options,
        };

        if !repository.options.rewrite_on_open {
            tracing::info!(
                location = %repository.store.location(),
                "Configuration loaded without rewrite"
            );
            return repository;
        }

        match repository.write_all() {
            Ok(()) => tracing::info!(
                location = %repository.store.location(),
                plugins = repository.plugin_descriptors.len(),
                "Configuration loaded"
            ),
            Err(e) => tracing::error!(
                location = %repository.store.location(),
                "Failed to rewrite configuration on startup: {}",
                e
            ),
        }
        repository
    }

    fn current(&self) -> DomainSet {
        DomainSet {
            transaction: (*self.transaction.load()).clone(),
            user_recording: (*self.user_recording.load()).clone(),
            advanced: (*self.advanced.load()).clone(),
            plugins: (*self.plugins.load()).clone(),
            gauges: (*self.gauges.load()).clone(),
            instrumentation: (*self.instrumentation.load()).clone(),
            ui: (*self.ui.load()).clone(),
            storage: (*self.storage.load()).clone(),
            smtp: (*self.smtp.load()).clone(),
            alerts: (*self.alerts.load()).clone(),
            unreadable: self.unreadable.lock().clone(),
        }
    }

    fn install(&self, domains: DomainSet) {
        self.transaction.store(domains.transaction);
        self.user_recording.store(domains.user_recording);
        self.advanced.store(domains.advanced);
        self.plugins.store(domains.plugins);
        self.gauges.store(domains.gauges);
        self.instrumentation.store(domains.instrumentation);
        self.ui.store(domains.ui);
        self.storage.store(domains.storage);
        self.smtp.store(domains.smtp);
        self.alerts.store(domains.alerts);
        *self.unreadable.lock() = domains.unreadable;
    }

    fn write_all(&self) -> Result<(), ConfigError> {
        self.store.put_all(self.current().sections()?)
    }

    /// Persist one section, then swap its snapshot
    ///
    /// Undecodable list entries loaded at startup are carried along; a section that
    /// could not be decoded as a whole is replaced.
    fn commit<T: Serialize>(
        &self,
        name: &str,
        cell: &SnapshotCell<T>,
        value: T,
    ) -> Result<(), ConfigError> {
        let mut unreadable = self.unreadable.lock();
        let persisted = unreadable.persisted_value(name, serde_json::to_value(&value)?);
        self.store.put_section(name, persisted)?;
        unreadable.sections.remove(name);
        cell.store(value);
        tracing::debug!(section = name, "Config section updated");
        Ok(())
    }

    /// Restore every section to its default and rewrite the store
    pub fn reset_all_config(&self) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock();
        let defaults = DomainSet::defaults(&self.plugin_descriptors, &self.options);
        self.store.put_all(defaults.sections()?)?;
        self.install(defaults);
        tracing::info!("All configuration reset to defaults");
        self.config_listeners.notify();
        self.plugin_config_listeners.notify();
        Ok(())
    }

    /// Register a listener for any configuration change; fires once immediately
    ///
    /// Listeners run on the writer's thread while the write lock is held, so they
    /// must only read from the repository.
    pub fn add_config_listener(&self, listener: Arc<dyn ConfigListener>) {
        self.config_listeners.add(listener);
    }

    /// Register a listener for plugin configuration changes; fires once immediately
    pub fn add_plugin_config_listener(&self, listener: Arc<dyn ConfigListener>) {
        self.plugin_config_listeners.add(listener);
    }

    /// Agent-side domains bundled for the weaver and collectors
    pub fn agent_config(&self) -> AgentConfigSnapshot {
        AgentConfigSnapshot {
            transaction_config: self.transaction.load(),
            user_recording_config: self.user_recording.load(),
            advanced_config: self.advanced.load(),
            plugin_configs: self.plugins.load(),
            instrumentation_configs: self.instrumentation.load(),
            gauge_configs: self.gauges.load(),
        }
    }

    pub fn rollup_configs(&self) -> &[RollupConfig] {
        &self.rollup_configs
    }

    pub fn gauge_collection_interval_millis(&self) -> u64 {
        self.options.gauge_collection_interval_millis
    }

    /// Installed plugins in canonical order
    pub fn plugin_descriptors(&self) -> &[PluginDescriptor] {
        &self.plugin_descriptors
    }

    /// Symmetric key, created on first use
    pub fn secret_key(&self) -> Result<SecretKey, ConfigError> {
        self.secret.secret_key()
    }

    /// Current JSON value of any section, as it would be persisted
    pub fn section_value(&self, name: &str) -> Result<Option<Value>, ConfigError> {
        if !section::is_known(name) {
            return Ok(self.store.get_section(name));
        }
        let sections = self.current().sections()?;
        Ok(sections
            .into_iter()
            .find(|(section_name, _)| section_name == name)
            .map(|(_, value)| value))
    }

    /// Section exactly as the store holds it, decoded or not
    pub fn persisted_section(&self, name: &str) -> Option<Value> {
        self.store.get_section(name)
    }

    /// Read a section the repository does not model itself
    pub fn other_section<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        read_section(self.store.as_ref(), name)
    }

    /// Write a section the repository does not model itself
    pub fn update_other_section<T: Serialize>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<(), ConfigError> {
        if section::is_known(name) {
            return Err(ConfigError::Validation(format!(
                "section {} is managed by the repository",
                name
            )));
        }
        let _guard = self.write_lock.lock();
        self.store.put_section(name, serde_json::to_value(value)?)
    }
}

fn check_versions_equal(current: &str, prior: &str) -> Result<(), ConfigError> {
    if current != prior {
        return Err(ConfigError::OptimisticLock);
    }
    Ok(())
}
