//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file, silently skipped when absent.
pub const DEFAULT_CONFIG_PATH: &str = "logweave.toml";

/// logweave -- normalize security log lines into typed events.
///
/// Use `logweave <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logweave", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logweave.toml configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration path and whether the user named it explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered log types.
    Types,

    /// Print the schema of a log type.
    Schema(SchemaArgs),

    /// Parse log lines and print one normalized event per line.
    Parse(ParseArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- schema ----

/// Print the composed schema (record fields + envelope fields).
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Registered log type name, e.g. `Zeek.DNS`.
    pub log_type: String,
}

// ---- parse ----

/// Parse a file (or stdin) with a single log type.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Registered log type name, e.g. `Apache.AccessCombined`.
    pub log_type: String,

    /// Input file (default: stdin).
    pub file: Option<PathBuf>,

    /// Stop at the first line that fails to parse.
    #[arg(long)]
    pub fail_fast: bool,
}

// ---- config ----

/// Manage logweave configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parsing).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_types() {
        let cli = Cli::try_parse_from(["logweave", "types"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Types));
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_schema_requires_log_type() {
        assert!(Cli::try_parse_from(["logweave", "schema"]).is_err());

        let cli = Cli::try_parse_from(["logweave", "schema", "Zeek.DNS"]).expect("parse succeeded");
        match cli.command {
            Commands::Schema(args) => assert_eq!(args.log_type, "Zeek.DNS"),
            _ => panic!("expected Schema command"),
        }
    }

    #[test]
    fn test_cli_parse_parse_stdin() {
        let cli = Cli::try_parse_from(["logweave", "parse", "Apache.AccessCommon"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.log_type, "Apache.AccessCommon");
                assert!(args.file.is_none(), "file should default to stdin");
                assert!(!args.fail_fast, "fail_fast should default to false");
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_parse_file_fail_fast() {
        let cli = Cli::try_parse_from([
            "logweave",
            "parse",
            "Suricata.DNS",
            "/var/log/suricata/eve.json",
            "--fail-fast",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.file, Some(PathBuf::from("/var/log/suricata/eve.json")));
                assert!(args.fail_fast);
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["logweave", "config", "show", "--section", "parsing"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("parsing".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["logweave", "config", "validate"]).expect("parse succeeded");
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn test_config_path_defaults_and_explicit() {
        let cli = Cli::try_parse_from(["logweave", "types"]).expect("parse succeeded");
        assert_eq!(cli.config_path(), (PathBuf::from(DEFAULT_CONFIG_PATH), false));

        let cli = Cli::try_parse_from(["logweave", "-c", "/etc/logweave.toml", "types"])
            .expect("parse succeeded");
        assert_eq!(cli.config_path(), (PathBuf::from("/etc/logweave.toml"), true));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["logweave", "types", "--output", "json", "--log-level", "debug"])
            .expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level, Some("debug".to_owned()));
    }

    #[test]
    fn test_cli_parse_invalid_output_fails() {
        assert!(Cli::try_parse_from(["logweave", "--output", "yaml", "types"]).is_err());
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["logweave"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        assert_eq!(cmd.get_name(), "logweave");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for name in ["types", "schema", "parse", "config"] {
            assert!(subcommands.contains(&name), "should have '{name}' subcommand");
        }
    }
}
