//! `logweave types` command handler

use std::io::Write;

use serde::Serialize;

use logweave_core::Registry;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `types` command.
pub fn execute(registry: &Registry, writer: &OutputWriter) -> Result<(), CliError> {
    writer.render(&TypesReport::from_registry(registry))
}

/// Registered log types, sorted by name.
#[derive(Serialize)]
pub struct TypesReport {
    pub log_types: Vec<LogTypeEntry>,
}

#[derive(Serialize)]
pub struct LogTypeEntry {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_url: Option<String>,
}

impl TypesReport {
    pub fn from_registry(registry: &Registry) -> Self {
        let log_types = registry
            .available_types()
            .iter()
            .map(|t| LogTypeEntry {
                name: t.name().to_owned(),
                description: t.description().to_owned(),
                reference_url: t.reference_url().map(str::to_owned),
            })
            .collect();
        Self { log_types }
    }
}

impl Render for TypesReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if self.log_types.is_empty() {
            writeln!(w, "No log types registered.")?;
            return Ok(());
        }

        let width = self
            .log_types
            .iter()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0);

        writeln!(w, "{:<width$}  {}", "NAME".bold(), "DESCRIPTION".bold())?;
        for entry in &self.log_types {
            writeln!(w, "{:<width$}  {}", entry.name, entry.description)?;
        }
        writeln!(w)?;
        writeln!(w, "{} log types", self.log_types.len())?;
        Ok(())
    }
}
