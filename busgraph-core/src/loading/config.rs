use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, MERGE_RADIUS_M, TRANSFER_RADIUS_M, WALKING_SPEED_MPS};

/// Environment variable overriding the dataset root
pub const DATASET_PATH_ENV: &str = "DATASET_PATH";

/// Configuration of the flat-file graph build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Directory holding one sub-directory per feed period
    pub dataset_root: PathBuf,
    /// Feed sub-directories to read, in order
    pub feeds: Vec<String>,
    /// Raw stops within this distance are merged
    pub merge_radius_m: f64,
    /// Canonical stops within this distance get walking transfers
    pub transfer_radius_m: f64,
    /// Walking speed for synthesized transfers
    pub walking_speed_mps: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("Dataset"),
            feeds: vec![
                "hanoi_gtfs_am".to_string(),
                "hanoi_gtfs_md".to_string(),
                "hanoi_gtfs_pm".to_string(),
            ],
            merge_radius_m: MERGE_RADIUS_M,
            transfer_radius_m: TRANSFER_RADIUS_M,
            walking_speed_mps: WALKING_SPEED_MPS,
        }
    }
}

impl GraphConfig {
    pub fn new(dataset_root: impl AsRef<Path>) -> Self {
        Self {
            dataset_root: dataset_root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Default configuration with the dataset root taken from `DATASET_PATH` when set
    pub fn from_env() -> Self {
        match std::env::var_os(DATASET_PATH_ENV) {
            Some(root) if !root.is_empty() => Self::new(PathBuf::from(root)),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn with_feeds<I, S>(mut self, feeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feeds = feeds.into_iter().map(Into::into).collect();
        self
    }

    pub fn feed_dirs(&self) -> Vec<PathBuf> {
        self.feeds
            .iter()
            .map(|feed| self.dataset_root.join(feed))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.merge_radius_m) {
            return Err(Error::InvalidData(format!(
                "merge radius must be positive, got {}",
                self.merge_radius_m
            )));
        }
        if !positive(self.transfer_radius_m) {
            return Err(Error::InvalidData(format!(
                "transfer radius must be positive, got {}",
                self.transfer_radius_m
            )));
        }
        if !positive(self.walking_speed_mps) {
            return Err(Error::InvalidData(format!(
                "walking speed must be positive, got {}",
                self.walking_speed_mps
            )));
        }
        Ok(())
    }
}
