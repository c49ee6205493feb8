//! Logging System
//!
//! Structured logging using the `tracing` crate. Overlay warnings, applied
//! fields and validation decisions are emitted as `tracing` events; this
//! module installs a subscriber for binaries and tests that want to see them.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Rendering of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogOutput {
    fn to_stdout(self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }

    fn to_stderr(self) -> bool {
        matches!(
            self,
            LogOutput::Stderr | LogOutput::FileAndStderr | LogOutput::Both
        )
    }

    fn to_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            ))),
        }
    }
}

/// Logging configuration. Missing keys take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// trace, debug, info, warn, error or off
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file when `output` includes a file; `None` uses the platform state dir
    pub file: Option<PathBuf>,
    /// ANSI colors for text lines on stdout/stderr
    pub color: bool,
    /// Per-target levels, e.g. `"envlay::overlay" = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Log file path: `ENVLAY_LOG_FILE`, then `configured`, then
/// `<state dir>/envlay.log`.
pub fn resolve_log_file_path(configured: Option<&Path>) -> Result<PathBuf, ApiError> {
    match std::env::var_os("ENVLAY_LOG_FILE") {
        Some(path) if !path.is_empty() => return Ok(PathBuf::from(path)),
        _ => {}
    }
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }

    let dirs = directories::ProjectDirs::from("", "envlay", "envlay").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    Ok(dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .join("envlay.log"))
}

/// Install the global subscriber.
///
/// `ENVLAY_LOG`, `ENVLAY_LOG_MODULES`, `ENVLAY_LOG_FORMAT`, `ENVLAY_LOG_OUTPUT`
/// and `ENVLAY_LOG_FILE` take precedence over `config`, which takes precedence
/// over the defaults. Fails if a global subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = effective_format(config);
    let output = effective_output(config)?;

    if output.to_file() {
        let file = Mutex::new(open_log_file(&resolve_log_file_path(config.file.as_deref())?)?);
        if output.to_stderr() {
            install(filter, format, false, file.and(std::io::stderr))
        } else {
            install(filter, format, false, file)
        }
    } else {
        let ansi = config.color;
        match (output.to_stdout(), output.to_stderr()) {
            (true, true) => install(filter, format, ansi, std::io::stdout.and(std::io::stderr)),
            (true, false) => install(filter, format, ansi, std::io::stdout),
            _ => install(filter, format, ansi, std::io::stderr),
        }
    }
}

fn install<W>(filter: EnvFilter, format: LogFormat, ansi: bool, writer: W) -> Result<(), ApiError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let registry = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
    };
    result.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("ENVLAY_LOG") {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var("ENVLAY_LOG_MODULES").unwrap_or_default();
    let env_pairs = from_env
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(module, level)| (module.trim(), level.trim()));
    let config_pairs = config
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), level.as_str()));

    config_pairs
        .chain(env_pairs)
        .try_fold(
            EnvFilter::new(&config.level),
            |filter, (module, level)| -> Result<EnvFilter, ApiError> {
                let directive = format!("{}={}", module, level)
                    .parse()
                    .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?;
                Ok(filter.add_directive(directive))
            },
        )
}

/// An unrecognised `ENVLAY_LOG_FORMAT` is ignored.
fn effective_format(config: &LoggingConfig) -> LogFormat {
    std::env::var("ENVLAY_LOG_FORMAT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(config.format)
}

fn effective_output(config: &LoggingConfig) -> Result<LogOutput, ApiError> {
    match std::env::var("ENVLAY_LOG_OUTPUT") {
        Ok(value) => value.parse(),
        Err(_) => Ok(config.output),
    }
}
