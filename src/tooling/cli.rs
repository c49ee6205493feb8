//! CLI Tooling
//!
//! Command-line inspection of the naming contract and of the overrides the
//! current environment would apply. Values are never printed; they may be
//! secrets.

use crate::error::{ApiError, OverlayError, OverlayWarning};
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::naming;
use crate::overlay::Overlay;
use crate::types::{process_env, EnvSnapshot};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Envlay CLI - environment overrides for typed configuration
#[derive(Parser)]
#[command(name = "envlay")]
#[command(about = "Inspect environment-variable overrides for configuration fields")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging configuration with command line flags applied over defaults.
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::default();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.format = format;
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
            config.output = LogOutput::FileAndStderr;
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the environment key that overrides each field
    EnvKey {
        /// Environment prefix, e.g. MYAPP
        #[arg(long)]
        prefix: String,
        /// Camel-case field names
        #[arg(required = true)]
        fields: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the field each environment key overrides
    FieldName {
        /// Environment prefix, e.g. MYAPP
        #[arg(long)]
        prefix: String,
        /// Environment keys, e.g. MYAPP_RETRY_COUNT
        #[arg(required = true)]
        keys: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List environment variables carrying the prefix and their fields
    Scan {
        /// Environment prefix, e.g. MYAPP
        #[arg(long)]
        prefix: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Status of one scanned environment key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Ok,
    Malformed,
    Conflicting,
}

impl ScanStatus {
    fn label(self) -> &'static str {
        match self {
            ScanStatus::Ok => "ok",
            ScanStatus::Malformed => "malformed",
            ScanStatus::Conflicting => "conflicting",
        }
    }
}

/// One row of `scan` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRow {
    pub env_key: String,
    pub field: Option<String>,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct EnvKeyRow<'a> {
    field: &'a str,
    env_key: String,
}

#[derive(Serialize)]
struct FieldNameRow<'a> {
    env_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// CLI execution context holding the environment snapshot commands run against.
pub struct CliContext {
    env: EnvSnapshot,
}

impl CliContext {
    /// Context over the current process environment.
    pub fn from_process() -> Self {
        Self { env: process_env() }
    }

    /// Context over a supplied snapshot.
    pub fn with_env(env: EnvSnapshot) -> Self {
        Self { env }
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::EnvKey {
                prefix,
                fields,
                format,
            } => {
                check_format(format)?;
                if prefix.is_empty() {
                    return Err(OverlayError::EmptyPrefix.into());
                }
                let rows: Vec<EnvKeyRow> = fields
                    .iter()
                    .map(|field| EnvKeyRow {
                        field,
                        env_key: naming::to_env_key(prefix, field),
                    })
                    .collect();
                if format == "json" {
                    return to_json(&rows);
                }
                Ok(rows
                    .iter()
                    .map(|row| row.env_key.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Commands::FieldName {
                prefix,
                keys,
                format,
            } => {
                check_format(format)?;
                let mut rows = Vec::with_capacity(keys.len());
                for key in keys {
                    let row = match naming::to_field_name(prefix, key) {
                        Ok(field) => FieldNameRow {
                            env_key: key,
                            field: Some(field),
                            error: None,
                        },
                        Err(OverlayError::MalformedKey { reason, .. }) => FieldNameRow {
                            env_key: key,
                            field: None,
                            error: Some(reason),
                        },
                        Err(err) => return Err(err.into()),
                    };
                    rows.push(row);
                }
                if format == "json" {
                    return to_json(&rows);
                }
                Ok(rows
                    .iter()
                    .map(|row| match (&row.field, &row.error) {
                        (Some(field), _) => field.clone(),
                        (None, Some(error)) => format!("{}: malformed ({})", row.env_key, error),
                        (None, None) => row.env_key.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Commands::Scan { prefix, format } => {
                check_format(format)?;
                let rows = self.scan(prefix)?;
                info!(prefix = %prefix, matched = rows.len(), "Scanned environment");
                if format == "json" {
                    return to_json(&rows);
                }
                Ok(format_scan_table(prefix, &rows))
            }
        }
    }

    /// Match and translate the snapshot, one row per matching key.
    pub fn scan(&self, prefix: &str) -> Result<Vec<ScanRow>, ApiError> {
        let translated = Overlay::new(prefix).translate(&self.env)?;

        let mut rows: Vec<ScanRow> = translated
            .entries
            .into_iter()
            .map(|entry| ScanRow {
                env_key: entry.env_key,
                field: Some(entry.field),
                status: ScanStatus::Ok,
                detail: None,
            })
            .collect();

        for warning in translated.warnings {
            let row = match warning {
                OverlayWarning::MalformedKey { key, reason } => ScanRow {
                    env_key: key,
                    field: None,
                    status: ScanStatus::Malformed,
                    detail: Some(reason),
                },
                OverlayWarning::ConflictingOverride {
                    field,
                    kept,
                    ignored,
                } => ScanRow {
                    env_key: ignored,
                    field: Some(field),
                    status: ScanStatus::Conflicting,
                    detail: Some(format!("shadowed by {}", kept)),
                },
                // Raised by the engine against a target type, never by translation.
                OverlayWarning::UnknownOverrideKey { .. } => continue,
            };
            rows.push(row);
        }

        rows.sort_by(|a, b| a.env_key.cmp(&b.env_key));
        Ok(rows)
    }
}

fn check_format(format: &str) -> Result<(), ApiError> {
    if format == "text" || format == "json" {
        Ok(())
    } else {
        Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            format
        )))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::OutputError(e.to_string()))
}

fn format_scan_table(prefix: &str, rows: &[ScanRow]) -> String {
    if rows.is_empty() {
        return format!("No environment variables start with {}.", prefix);
    }

    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Environment Key", "Field", "Status", "Detail"]);
    for row in rows {
        table.add_row(vec![
            row.env_key.as_str(),
            row.field.as_deref().unwrap_or("-"),
            row.status.label(),
            row.detail.as_deref().unwrap_or(""),
        ]);
    }
    table.to_string()
}
