mod cli;

use clap::{Parser, crate_version};
use energy_monitor::{Configuration, Summary, prelude::*, tables::build_summary_table};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::cli::{Args, Command, OutputFormat, SummarizeArgs};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Summarize(args) => summarize(&args)?,
    }

    Ok(())
}

#[instrument(skip_all)]
fn summarize(args: &SummarizeArgs) -> Result {
    let configuration = Configuration::from_toml_file(&args.config)?;
    let snapshot = args.read_snapshot()?;
    let summary = Summary::compute(&snapshot, &configuration);
    match args.output {
        OutputFormat::Table => println!("{}", build_summary_table(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
