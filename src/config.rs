// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeler configuration.
//!
//! The configuration file names where the label store lives:
//!
//! ```yaml
//! REGIONS_OF_INTEREST:
//!   image_roi: ./image_rois.json
//! ```

use crate::io::serialization;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "REGIONS_OF_INTEREST")]
    pub regions_of_interest: RegionsOfInterest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionsOfInterest {
    /// Path of the persisted label store.
    pub image_roi: PathBuf,
}

impl Config {
    /// Load the configuration from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        let config: Config = serialization::read_file(path)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        if config.regions_of_interest.image_roi.as_os_str().is_empty() {
            anyhow::bail!(
                "REGIONS_OF_INTEREST.image_roi is empty in {}",
                path.display()
            );
        }
        Ok(config)
    }

    /// Path of the persisted label store.
    pub fn store_path(&self) -> &Path {
        &self.regions_of_interest.image_roi
    }
}
