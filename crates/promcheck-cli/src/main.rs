mod config;
mod run;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use promcheck_client::PromClient;
use promcheck_common::rules::RuleFile;
use promcheck_report::OutputFormat;
use tracing_subscriber::EnvFilter;

use config::{Cli, ReplayWindow};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only reporter output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("promcheck_cli=info".parse()?)
                .add_directive("promcheck_engine=info".parse()?)
                .add_directive("promcheck_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let window = ReplayWindow::resolve(cli.at.as_deref(), &cli.window, Utc::now())?;
    let step = cli.step_duration()?;
    let format: OutputFormat = cli
        .output
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if window.realtime {
        tracing::info!("replay mode: realtime (now)");
    } else {
        tracing::info!("replay mode: time travel");
    }
    tracing::info!(
        start = %window.start,
        end = %window.end,
        file = %cli.file,
        url = %cli.url,
        "replay window resolved"
    );

    let rule_file = RuleFile::load(&cli.file)?;
    let client = PromClient::new(&cli.url)?;
    let mut reporter = format.create_reporter();

    run::run(&client, &rule_file, &window, step, reporter.as_mut()).await
}
