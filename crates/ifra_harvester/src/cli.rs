use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ifra_engine::ProbeMode;

use crate::config::FileConfig;
use crate::logging::LogDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Walk every viable strategy and merge the results.
    Pool,
    /// Stop at the first strategy that yields records.
    FirstViable,
}

impl From<ModeArg> for ProbeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pool => ProbeMode::Pool,
            ModeArg::FirstViable => ProbeMode::FirstViable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "ifra-harvester",
    version,
    about = "Harvest the IFRA transparency list into a normalized CSV"
)]
pub struct Args {
    /// RON configuration file. Flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listing URL the strategies are resolved against.
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// CSV file name inside the output directory.
    #[arg(long)]
    pub output_file: Option<String>,

    /// Header for the natural key column.
    #[arg(long)]
    pub key_column: Option<String>,

    /// Page ceiling per strategy.
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Minimum pause between fetches, in milliseconds.
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Per-request timeout, in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// RON strategy table replacing the built-in one.
    #[arg(long)]
    pub strategies: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Layer the flags that were given over `config`.
    pub fn apply(&self, config: &mut FileConfig) {
        if let Some(url) = &self.base_url {
            config.harvest.base_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(file) = &self.output_file {
            config.export.output_filename = file.clone();
        }
        if let Some(column) = &self.key_column {
            config.export.key_column = column.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.harvest.max_pages = max_pages;
        }
        if let Some(pause_ms) = self.pause_ms {
            config.harvest.pause_ms = pause_ms;
        }
        if let Some(timeout) = self.timeout_secs {
            config.fetch.timeout_secs = timeout;
        }
        if let Some(mode) = self.mode {
            config.harvest.mode = mode.into();
        }
        if let Some(path) = &self.strategies {
            config.strategies = Some(path.clone());
        }
    }
}
