//! Command line configuration: an optional TOML file plus flag overrides

use std::{
    fs,
    path::{Path, PathBuf},
};

use busgraph_core::{Error as EngineError, loading::GraphConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Contents of the TOML config file
///
/// ```toml
/// database_url = "postgres://localhost/transit"
///
/// [graph]
/// dataset_root = "Dataset"
/// feeds = ["hanoi_gtfs_am", "hanoi_gtfs_pm"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub graph: GraphConfig,
    /// Relational source tried before the feed files
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::from_env(),
            database_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the config file when one is given, defaults (honouring `DATASET_PATH`)
    /// otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Applies `--dataset` and `--feed` flags
    #[must_use]
    pub fn with_overrides(mut self, dataset: Option<PathBuf>, feeds: Vec<String>) -> Self {
        if let Some(root) = dataset {
            self.graph.dataset_root = root;
        }
        if !feeds.is_empty() {
            self.graph.feeds = feeds;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use busgraph_core::MERGE_RADIUS_M;

    use super::*;

    #[test]
    fn parses_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            database_url = "postgres://localhost/transit"

            [graph]
            dataset_root = "/data/hanoi"
            transfer_radius_m = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/transit"));
        assert_eq!(config.graph.dataset_root, PathBuf::from("/data/hanoi"));
        assert_eq!(config.graph.transfer_radius_m, 250.0);
        assert_eq!(config.graph.merge_radius_m, MERGE_RADIUS_M);
        assert_eq!(config.graph.feeds.len(), 3);
    }

    #[test]
    fn rejects_malformed_file() {
        assert!(matches!(
            AppConfig::from_toml("[graph]\nfeeds = 3"),
            Err(CliError::ParseConfig(_))
        ));
    }

    #[test]
    fn loads_from_disk_and_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\nfeeds = [\"a\"]").unwrap();

        let config = AppConfig::load(Some(file.path()))
            .unwrap()
            .with_overrides(Some(PathBuf::from("elsewhere")), Vec::new());
        assert_eq!(config.graph.feeds, ["a"]);
        assert_eq!(config.graph.dataset_root, PathBuf::from("elsewhere"));

        let config = config.with_overrides(None, vec!["b".into(), "c".into()]);
        assert_eq!(config.graph.feeds, ["b", "c"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
    }
}
