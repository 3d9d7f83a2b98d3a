use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Once;

use javelin_types::Severity;
use parking_lot::ReentrantMutex;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod diagnostics;
mod schema;

pub use diagnostics::ConfigDiagnostics;
pub use schema::json_schema;

/// Environment variable overriding config discovery.
pub const JAVELIN_CONFIG_ENV_VAR: &str = "JAVELIN_CONFIG_PATH";

/// Top-level `javelin.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct JavelinConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub checks: ChecksConfig,
}

/// Per-check settings, one table per built-in check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Redundant `String` calls such as `s.indexOf(s)` or `s.substring(0, s.length())`.
    #[serde(default)]
    pub silly_string_operations: CheckConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct CheckConfig {
    /// Whether the check runs at all.
    #[serde(default = "CheckConfig::default_enabled")]
    pub enabled: bool,

    /// Overrides the severity reported by the check.
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl CheckConfig {
    fn default_enabled() -> bool {
        true
    }

    /// The severity to report, falling back to the check's own default.
    #[must_use]
    pub fn severity_or(&self, default: Severity) -> Severity {
        self.severity.unwrap_or(default)
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            severity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Javelin crates.
    ///
    /// Either a simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled, log events are discarded.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    /// The effective `EnvFilter`: the configured level, with `RUST_LOG` appended when set.
    pub fn env_filter(&self) -> EnvFilter {
        let rust_log = with_config_env_lock(|| std::env::var("RUST_LOG").ok());
        self.env_filter_with(rust_log.as_deref())
    }

    /// Tries `level,rust_log`, then `rust_log` alone, then `level` alone, and settles
    /// on `info` when none of them parse.
    fn env_filter_with(&self, rust_log: Option<&str>) -> EnvFilter {
        let configured = Self::normalize_level_directives(&self.level);
        let rust_log = rust_log.map(str::trim).filter(|value| !value.is_empty());

        rust_log
            .into_iter()
            .flat_map(|env| [format!("{configured},{env}"), env.to_owned()])
            .chain(std::iter::once(configured.clone()))
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl JavelinConfig {
    /// Load a config file from TOML, ignoring unknown keys.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    /// Parse a config from a TOML string, ignoring unknown keys.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file from TOML and report unknown keys.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    /// Parse a config from a TOML string and report unknown keys.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<JavelinConfig>(text)?;

        for key in &unknown_keys {
            tracing::warn!(target: "javelin.config", key = %key, "ignoring unknown config key");
        }

        Ok((config, ConfigDiagnostics { unknown_keys }))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn config_env_lock() -> &'static ReentrantMutex<()> {
    static LOCK: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());
    &LOCK
}

/// Run `f` while holding the lock that guards reads of [`JAVELIN_CONFIG_ENV_VAR`] and
/// `RUST_LOG`.
///
/// Tests that mutate either variable should do so inside this closure.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

fn discover_config_path_unlocked(workspace_root: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(JAVELIN_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            workspace_root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["javelin.toml", ".javelin.toml"]
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Discover the Javelin configuration file for a workspace root.
///
/// Search order:
/// 1) `JAVELIN_CONFIG_PATH` (absolute or relative to `workspace_root`)
/// 2) `javelin.toml` in `workspace_root`
/// 3) `.javelin.toml` in `workspace_root`
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    discover_config_path_unlocked(workspace_root)
}

/// Load the configuration for a workspace root.
///
/// If no config is present, returns [`JavelinConfig::default`] and `None`.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(JavelinConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        tracing::debug!(
            target: "javelin.config",
            root = %workspace_root.display(),
            "no config file found; using defaults"
        );
        return Ok((JavelinConfig::default(), None));
    };

    let config = JavelinConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber described by `config`.
///
/// Returns `true` only from the call that installed it. Later calls, and a first call
/// that finds another subscriber already in place, return `false`.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| installed = install_subscriber(config));
    installed
}

fn install_subscriber(config: &LoggingConfig) -> bool {
    let writer = if config.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::sink)
    };
    let fmt = tracing_subscriber::fmt::layer().with_writer(writer);
    let fmt = if config.json {
        fmt.json().boxed()
    } else {
        fmt.boxed()
    };

    match tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                target: "javelin.config",
                error = %err,
                "a global tracing subscriber was already installed; keeping it"
            );
            false
        }
    }
}
