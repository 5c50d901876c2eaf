use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use energy_monitor::{RawSnapshot, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the power balance summary of a current-data snapshot.
    #[clap(name = "summarize")]
    Summarize(SummarizeArgs),
}

#[derive(Parser)]
pub struct SummarizeArgs {
    /// Device categories and rated power, TOML.
    #[clap(long, env = "ENERGY_MONITOR_CONFIG", default_value = "energy-monitor.toml")]
    pub config: PathBuf,

    /// Current data snapshot, JSON.
    #[clap(long, env = "ENERGY_MONITOR_SNAPSHOT")]
    pub snapshot: PathBuf,

    #[clap(
        long,
        value_enum,
        default_value_t = SnapshotLayout::Nested,
        env = "ENERGY_MONITOR_LAYOUT"
    )]
    pub layout: SnapshotLayout,

    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl SummarizeArgs {
    pub fn read_snapshot(&self) -> Result<RawSnapshot> {
        let path = self.snapshot.display();
        let contents =
            fs::read_to_string(&self.snapshot).with_context(|| format!("failed to read `{path}`"))?;
        match self.layout {
            SnapshotLayout::Nested => serde_json::from_str(&contents)
                .with_context(|| format!("failed to deserialize the snapshot from `{path}`")),
            SnapshotLayout::Flat => RawSnapshot::from_flat_json(&contents)
                .with_context(|| format!("failed to deserialize the snapshot from `{path}`")),
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum SnapshotLayout {
    /// `{"ess0": {"Soc": 55}}`
    Nested,

    /// `{"ess0/Soc": 55}`
    Flat,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
