use anyhow::Context;
use clap::Parser;

use stockdesk_cli::Cli;
use stockdesk_infra::{Config, LogFormat};
use stockdesk_observability::Format;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid STOCKDESK_* configuration")?;

    stockdesk_observability::init(match config.log_format {
        LogFormat::Json => Format::Json,
        LogFormat::Pretty => Format::Pretty,
    });

    let output = stockdesk_cli::run(&cli, &config, chrono::Utc::now())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to encode output")?
    );
    Ok(())
}
