//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come from the
//! `[logging]` table of the settings file, overridden by `AGENTCONF_LOG*` environment
//! variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "agentconf.log";

/// Resolve the log file path: `AGENTCONF_LOG_FILE`, then the configured path, then
/// `agentconf.log` under `base_dir`.
pub fn resolve_log_file_path(configured: Option<PathBuf>, base_dir: &Path) -> PathBuf {
    if let Ok(env_path) = std::env::var("AGENTCONF_LOG_FILE") {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }
    match configured {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => base_dir.join(LOG_FILE_NAME),
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means `<base_dir>/agentconf.log`
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Install the global subscriber
///
/// Priority order (highest to lowest): environment variables, the given config,
/// defaults. File output without a configured path goes to `agentconf.log` in the
/// platform data directory.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ConfigError> {
    let base_dir = crate::settings::default_base_dir();
    init_logging_in(config, &base_dir)
}

/// Install the global subscriber, resolving a default log file under `base_dir`
pub fn init_logging_in(config: Option<&LoggingConfig>, base_dir: &Path) -> Result<(), ConfigError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ConfigError::Settings(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let terminal_color = config.map(|c| c.color).unwrap_or(true) && !output.file;

    let writer = if output.file {
        let path = resolve_log_file_path(config.and_then(|c| c.file.clone()), base_dir);
        let file = Arc::new(open_log_file(&path)?);
        if output.stderr {
            BoxMakeWriter::new(file.and(std::io::stderr))
        } else {
            BoxMakeWriter::new(file)
        }
    } else if output.stdout && output.stderr {
        BoxMakeWriter::new(std::io::stdout.and(std::io::stderr))
    } else if output.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let (json_layer, text_layer) = if format == "json" {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(terminal_color)
            .with_writer(writer);
        (None, Some(layer))
    };

    Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| ConfigError::Settings(format!("Failed to install logger: {}", e)))
}

fn open_log_file(path: &Path) -> Result<fs::File, ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Settings(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConfigError::Settings(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Build environment filter from `AGENTCONF_LOG` or the config
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env("AGENTCONF_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            filter = filter.add_directive(parse_directive(module, module_level)?);
        }
    }

    if let Ok(modules) = std::env::var("AGENTCONF_LOG_MODULES") {
        for spec in modules.split(',') {
            if let Some((module, module_level)) = spec.split_once('=') {
                filter = filter.add_directive(parse_directive(module.trim(), module_level.trim())?);
            }
        }
    }

    Ok(filter)
}

fn parse_directive(
    module: &str,
    level: &str,
) -> Result<tracing_subscriber::filter::Directive, ConfigError> {
    format!("{}={}", module, level)
        .parse()
        .map_err(|e| {
            ConfigError::Settings(format!("Invalid log directive {}={}: {}", module, level, e))
        })
}

/// Output format, `AGENTCONF_LOG_FORMAT` first
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, ConfigError> {
    if let Ok(format) = std::env::var("AGENTCONF_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(ConfigError::Settings(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, ConfigError> {
    if let Ok(output) = std::env::var("AGENTCONF_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    parse_output_destinations(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ConfigError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(ConfigError::Settings(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', \
                 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
