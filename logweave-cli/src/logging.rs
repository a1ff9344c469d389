//! Tracing setup for the logweave CLI.
//!
//! Everything is written to stderr; stdout is reserved for normalized events
//! and command reports.

use anyhow::{Result, bail};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use logweave_core::config::GeneralConfig;

type FormatLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `[general]`.
///
/// `RUST_LOG` takes precedence over `config.log_level`. An unknown
/// `log_format` is rejected before anything is installed.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let format = format_layer(&config.log_format)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install {} subscriber: {e}", config.log_format))
}

/// stderr fmt layer for `json` (one object per line) or `pretty`.
fn format_layer(log_format: &str) -> Result<FormatLayer> {
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    Ok(match log_format {
        "json" => layer.json().boxed(),
        "pretty" => layer.pretty().boxed(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    })
}
