//! `logweave config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use logweave_core::LogweaveConfig;
use logweave_core::error::{ConfigError, LogweaveError};

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Load the effective configuration (file + env overrides + defaults).
///
/// A missing file is only an error when the user named it explicitly;
/// otherwise defaults are used.
pub fn load_effective(path: &Path, explicit: bool) -> Result<LogweaveConfig, LogweaveError> {
    match LogweaveConfig::load(path) {
        Err(LogweaveError::Config(ConfigError::FileNotFound { .. })) if !explicit => {
            debug!(path = %path.display(), "config file not found, using defaults");
            let mut config = LogweaveConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        other => other,
    }
}

/// Execute the `config` command.
pub fn execute(
    args: ConfigArgs,
    config_path: &Path,
    explicit: bool,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, explicit, writer),
        ConfigAction::Show { section } => execute_show(config_path, explicit, section, writer),
    }
}

/// Load and validate the configuration file, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails.
fn execute_validate(
    config_path: &Path,
    explicit: bool,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path, explicit);
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// Build the validation report for a config file.
///
/// Beyond the file's own rules, the parsing filter must only name log types
/// this build provides.
pub fn validation_report(config_path: &Path, explicit: bool) -> ConfigValidationReport {
    let mut errors = Vec::new();
    match load_effective(config_path, explicit) {
        Ok(config) => errors.extend(
            config
                .parsing
                .enabled_log_types
                .iter()
                .filter(|name| !logweave_parsers::LOG_TYPES.contains(&name.as_str()))
                .map(|name| format!("parsing.enabled_log_types: unknown log type '{name}'")),
        ),
        Err(e) => errors.push(e.to_string()),
    }

    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Load and display the effective configuration.
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if section name is invalid.
fn execute_show(
    config_path: &Path,
    explicit: bool,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = load_effective(config_path, explicit)?;
    let report = config_report(&config, config_path, section)?;
    writer.render(&report)?;
    Ok(())
}

/// Render the whole configuration or one section as TOML.
pub fn config_report(
    config: &LogweaveConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let (config_toml, json) = match section.as_deref() {
        None => (to_toml(config)?, serde_json::to_value(config)?),
        Some("general") => (
            to_toml(&config.general)?,
            serde_json::to_value(&config.general)?,
        ),
        Some("parsing") => (
            to_toml(&config.parsing)?,
            serde_json::to_value(&config.parsing)?,
        ),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: general, parsing)"
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config: json,
        config_toml,
    })
}

fn to_toml<T: Serialize>(value: &T) -> Result<String, CliError> {
    toml::to_string_pretty(value)
        .map_err(|e| CliError::Command(format!("failed to render configuration: {e}")))
}

/// Configuration display report.
///
/// JSON output carries the structured configuration; text output the TOML form.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Structured configuration
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
