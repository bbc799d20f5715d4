//! RON configuration files: run settings and strategy tables.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use ifra_engine::{ExportOptions, FetchSettings, HarvestSettings, StrategyTable};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("strategy table {0:?} lists no strategies")]
    EmptyStrategyTable(PathBuf),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Transport limits as they appear in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn settings(&self) -> FetchSettings {
        let mut settings = FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        };
        if let Some(agent) = &self.user_agent {
            settings.user_agent = agent.clone();
        }
        settings
    }
}

/// Everything a run can be configured with. Missing sections take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub harvest: HarvestSettings,
    pub fetch: FetchConfig,
    pub export: ExportOptions,
    pub output_dir: PathBuf,
    /// RON strategy table replacing the built-in one.
    pub strategies: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            harvest: HarvestSettings::default(),
            fetch: FetchConfig::default(),
            export: ExportOptions::default(),
            output_dir: PathBuf::from("."),
            strategies: None,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = read_ron(path)?;
        engine_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        parse_ron(text, Path::new("<inline>"))
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.harvest.max_pages == 0 {
            return Err(ConfigError::Invalid("max_pages must be at least 1".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if self.export.output_filename.trim().is_empty() {
            return Err(ConfigError::Invalid("output file name is empty".into()));
        }
        if self.export.key_column.trim().is_empty() {
            return Err(ConfigError::Invalid("key column header is empty".into()));
        }
        Ok(())
    }

    /// The configured strategy table, or the built-in IFRA table.
    pub fn strategy_table(&self) -> Result<StrategyTable, ConfigError> {
        match &self.strategies {
            Some(path) => load_strategy_table(path),
            None => Ok(StrategyTable::ifra_default()),
        }
    }
}

pub fn load_strategy_table(path: &Path) -> Result<StrategyTable, ConfigError> {
    let table: StrategyTable = read_ron(path)?;
    if table.is_empty() {
        return Err(ConfigError::EmptyStrategyTable(path.to_path_buf()));
    }
    engine_info!(
        "Loaded {} strategies from {:?}",
        table.strategies.len(),
        path
    );
    Ok(table)
}

pub fn parse_strategy_table(text: &str) -> Result<StrategyTable, ConfigError> {
    parse_ron(text, Path::new("<inline>"))
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ron(&content, path)
}

fn parse_ron<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T, ConfigError> {
    ron::from_str(text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
