//! `logweave schema <LOG_TYPE>` command handler

use std::io::Write;

use serde::Serialize;

use logweave_core::{FieldDescriptor, FieldType, Registry, SchemaDescriptor};

use crate::commands::lookup;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `schema` command.
pub fn execute(registry: &Registry, name: &str, writer: &OutputWriter) -> Result<(), CliError> {
    let log_type = lookup(registry, name)?;
    writer.render(&SchemaReport(log_type.schema()))
}

/// Composed schema of one log type. JSON output is the descriptor itself.
#[derive(Serialize)]
#[serde(transparent)]
pub struct SchemaReport(pub SchemaDescriptor);

impl Render for SchemaReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let schema = &self.0;
        writeln!(w, "{}", schema.log_type.bold())?;
        writeln!(w, "{}", schema.description)?;
        if let Some(url) = &schema.reference_url {
            writeln!(w, "Reference: {url}")?;
        }
        writeln!(w)?;

        let mut rows = Vec::new();
        flatten("", &schema.fields, &mut rows);
        let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
        let type_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);

        for (name, ty, field) in &rows {
            let marker = if field.required { "required" } else { "optional" };
            writeln!(
                w,
                "  {name:<name_width$}  {ty:<type_width$}  {marker:<8}  {}",
                field.description
            )?;
        }
        Ok(())
    }
}

/// Walk nested objects depth-first, naming children `parent.child`.
fn flatten<'a>(
    prefix: &str,
    fields: &'a [FieldDescriptor],
    rows: &mut Vec<(String, String, &'a FieldDescriptor)>,
) {
    for field in fields {
        let name = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        rows.push((name.clone(), type_label(&field.field_type), field));
        if let FieldType::Object(children) = &field.field_type {
            flatten(&name, children, rows);
        }
    }
}

/// Short display name of a field type, e.g. `array<string>`.
pub fn type_label(field_type: &FieldType) -> String {
    match field_type {
        FieldType::String => "string".to_owned(),
        FieldType::Integer => "integer".to_owned(),
        FieldType::Float => "float".to_owned(),
        FieldType::Boolean => "boolean".to_owned(),
        FieldType::Timestamp => "timestamp".to_owned(),
        FieldType::Json => "json".to_owned(),
        FieldType::Array(inner) => format!("array<{}>", type_label(inner)),
        FieldType::Map(inner) => format!("map<{}>", type_label(inner)),
        FieldType::Object(_) => "object".to_owned(),
    }
}
