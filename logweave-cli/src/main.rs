//! logweave -- command-line entry point

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use logweave_cli::cli::{Cli, Commands};
use logweave_cli::commands;
use logweave_cli::error::CliError;
use logweave_cli::logging;
use logweave_cli::output::OutputWriter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let (config_path, explicit) = cli.config_path();

    let loaded = commands::config::load_effective(&config_path, explicit);
    let mut general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    logweave_core::metrics::describe_all();

    // `config validate` must report a broken file instead of failing on it.
    if let Commands::Config(args) = cli.command {
        return commands::config::execute(args, &config_path, explicit, &writer);
    }

    let config = loaded?;
    debug!(path = %config_path.display(), explicit, "configuration loaded");
    let registry = commands::build_registry(&config)?;

    match cli.command {
        Commands::Types => commands::types::execute(&registry, &writer),
        Commands::Schema(args) => commands::schema::execute(&registry, &args.log_type, &writer),
        Commands::Parse(args) => commands::parse::execute(&registry, args, &writer),
        Commands::Config(_) => Ok(()),
    }
}
