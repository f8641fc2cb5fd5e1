//! CLI command definitions and execution.

use crate::error::ConfigError;
use crate::plugin::PluginDescriptor;
use crate::repository::ConfigRepository;
use crate::settings::{RepositorySettings, SettingsLoader};
use crate::types::section;
use crate::version::version_of;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// agentconf - inspect and maintain a monitoring agent's configuration
#[derive(Parser)]
#[command(name = "agentconf")]
#[command(about = "Inspect and maintain a monitoring agent's configuration repository")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Directory holding config.json and the secret key (overrides settings)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// JSON file with the installed plugin descriptors
    #[arg(long)]
    pub plugins: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print one section, or the whole document, as JSON
    Show {
        /// Section name, e.g. transactions or gauges
        section: Option<String>,
    },
    /// Print the current version of every section and list entry
    Versions,
    /// Create the secret key if needed and print where it lives
    Secret,
    /// Print the effective settings as TOML
    Settings,
    /// Restore every section to its default
    Reset,
}

/// Settings from the optional file and environment, with command-line overrides
pub fn load_settings(cli: &Cli) -> Result<RepositorySettings, ConfigError> {
    let mut settings = SettingsLoader::load(cli.settings.as_deref())?;
    if let Some(base_dir) = &cli.base_dir {
        settings.base_dir = base_dir.clone();
    }
    Ok(settings)
}

/// Plugin descriptors from a JSON array file
pub fn load_plugin_descriptors(path: &Path) -> Result<Vec<PluginDescriptor>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::persistence(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// A repository opened for inspection plus the settings it was opened with
///
/// Without a plugin descriptors file the persisted plugin overrides cannot be
/// reconciled, so they are shown as stored and `reset` is refused.
pub struct CliContext {
    settings: RepositorySettings,
    repository: ConfigRepository,
    plugins_known: bool,
}

impl CliContext {
    pub fn new(
        settings: RepositorySettings,
        plugins: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let descriptors = match plugins {
            Some(path) => load_plugin_descriptors(path)?,
            None => Vec::new(),
        };
        let repository = ConfigRepository::open_read_only(&settings, descriptors)?;
        Ok(Self {
            settings,
            repository,
            plugins_known: plugins.is_some(),
        })
    }

    pub fn repository(&self) -> &ConfigRepository {
        &self.repository
    }

    /// Run a command, returning its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, ConfigError> {
        match command {
            Commands::Show { section } => self.show(section.as_deref()),
            Commands::Versions => self.versions(),
            Commands::Secret => {
                self.repository.secret_key()?;
                Ok(format!(
                    "Secret key ready at {}",
                    self.settings.secret_path().display()
                ))
            }
            Commands::Settings => self.settings.to_toml(),
            Commands::Reset => {
                if !self.plugins_known {
                    return Err(ConfigError::Validation(
                        "reset needs --plugins to rebuild plugin settings".to_string(),
                    ));
                }
                self.repository.reset_all_config()?;
                Ok(format!(
                    "Configuration reset to defaults in {}",
                    self.settings.config_path().display()
                ))
            }
        }
    }

    fn show(&self, name: Option<&str>) -> Result<String, ConfigError> {
        let value = match name {
            Some(name) => self.section_value(name)?.ok_or_else(|| {
                ConfigError::Validation(format!("section {} not found", name))
            })?,
            None => {
                let mut document = serde_json::Map::new();
                for name in section::CANONICAL_ORDER {
                    if let Some(value) = self.section_value(name)? {
                        document.insert(name.to_string(), value);
                    }
                }
                serde_json::Value::Object(document)
            }
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn section_value(&self, name: &str) -> Result<Option<serde_json::Value>, ConfigError> {
        if name == section::PLUGINS && !self.plugins_known {
            return Ok(self.repository.persisted_section(name));
        }
        self.repository.section_value(name)
    }

    fn versions(&self) -> Result<String, ConfigError> {
        let repo = &self.repository;
        let mut out = String::new();
        let scalars = [
            (section::TRANSACTIONS, version_of(&*repo.transaction_config())?),
            (section::USER_RECORDING, version_of(&*repo.user_recording_config())?),
            (section::ADVANCED, version_of(&*repo.advanced_config())?),
            (section::UI, version_of(&*repo.user_interface_config())?),
            (section::STORAGE, version_of(&*repo.storage_config())?),
            (section::SMTP, version_of(&*repo.smtp_config())?),
        ];
        for (name, version) in scalars {
            let _ = writeln!(out, "{:<16} {}", name, version);
        }
        for plugin in repo.plugin_configs().iter() {
            let _ = writeln!(out, "plugin:{:<9} {}", plugin.id, version_of(plugin)?);
        }
        for gauge in repo.gauge_configs().iter() {
            let _ = writeln!(out, "gauge            {}  {}", version_of(gauge)?, gauge.object_name);
        }
        for config in repo.instrumentation_configs().iter() {
            let _ = writeln!(
                out,
                "instrumentation  {}  {}.{}",
                version_of(config)?,
                config.class_name,
                config.method_name
            );
        }
        for alert in repo.alert_configs().iter() {
            let _ = writeln!(out, "alert            {}", alert.version);
        }
        Ok(out.trim_end().to_string())
    }
}
