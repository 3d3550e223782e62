use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::aggregate::FilterMode;

/// Name of the environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PREVPANEL_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "prevpanel.yaml";

/// Optional YAML configuration. Every field has a command-line override;
/// the file only supplies defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the delimited survey export.
    pub dataset: Option<PathBuf>,
    /// Question to aggregate when none is given on the command line.
    pub question: Option<String>,
    /// Default selection filter mode.
    pub filter: Option<FilterMode>,
}

impl Config {
    /// Load the config file named by `PREVPANEL_CONFIG`, falling back to
    /// `prevpanel.yaml` in the working directory. A missing file is an
    /// empty config; an unreadable or malformed file is an error.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "config file loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_is_empty_config() -> Result<()> {
        let config = Config::from_path(Path::new("/no/such/prevpanel.yaml"))?;
        assert!(config.dataset.is_none());
        assert!(config.question.is_none());
        assert!(config.filter.is_none());
        Ok(())
    }

    #[test]
    fn parses_all_fields() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "dataset: data/brfss.csv")?;
        writeln!(tmp, "question: Do you smoke?")?;
        writeln!(tmp, "filter: more")?;
        let config = Config::from_path(tmp.path())?;
        assert_eq!(config.dataset, Some(PathBuf::from("data/brfss.csv")));
        assert_eq!(config.question.as_deref(), Some("Do you smoke?"));
        assert_eq!(config.filter, Some(FilterMode::More));
        Ok(())
    }

    #[test]
    fn rejects_unknown_fields() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "dataset: data/brfss.csv")?;
        writeln!(tmp, "mystery: true")?;
        assert!(Config::from_path(tmp.path()).is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed_yaml() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "dataset: [unclosed")?;
        assert!(Config::from_path(tmp.path()).is_err());
        Ok(())
    }
}
