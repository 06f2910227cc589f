use std::io::{self, Read};

use anyhow::Context;
use tether::config::ParseConfig;
use tether::parser::parse;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an optional JSON `ParseConfig`.
const CONFIG_VAR: &str = "TETHER_CONFIG";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> anyhow::Result<ParseConfig> {
    match std::env::var(CONFIG_VAR) {
        Ok(json) => ParseConfig::from_json(&json)
            .with_context(|| format!("invalid configuration in {CONFIG_VAR}")),
        Err(_) => Ok(ParseConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = load_config()?;
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read source from stdin")?;
    info!(chars = source.chars().count(), "read source");

    let program = parse(&source, &config)?;
    print!("{program}");

    Ok(())
}
