//! Command handlers -- one module per subcommand

pub mod config;
pub mod parse;
pub mod schema;
pub mod types;

use std::sync::Arc;

use logweave_core::{LogType, LogweaveConfig, Registry};
use logweave_parsers::{ParserConfig, register_all};

use crate::error::CliError;

/// Build the registry with every log type enabled by `config.parsing`.
///
/// Any registration failure is a packaging defect and aborts the command.
pub fn build_registry(config: &LogweaveConfig) -> Result<Registry, CliError> {
    let registry = Registry::new();
    register_all(&registry, &ParserConfig::from_core(&config.parsing))?;
    Ok(registry)
}

/// Look up a log type, mapping a miss to [`CliError::UnknownLogType`].
pub(crate) fn lookup(registry: &Registry, name: &str) -> Result<Arc<LogType>, CliError> {
    registry.get(name).ok_or_else(|| CliError::UnknownLogType {
        name: name.to_owned(),
    })
}
