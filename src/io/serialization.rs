// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label store and configuration serialization.
//!
//! Files are read and written as YAML or JSON depending on their
//! extension. JSON is used when the extension is not recognized.

use crate::models::store::LabelStore;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// On-disk format of a serialized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

/// Deserialize a value from `path`, format chosen by extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = match Format::from_path(path) {
        Format::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?,
        Format::Json => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?,
    };
    Ok(value)
}

/// Serialize `value` to `path`, replacing the file atomically.
///
/// The data is written to a sibling temporary file which is then renamed
/// over the target, so readers never observe a half-written file.
pub fn write_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = match Format::from_path(path) {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp = temp_path(path);
    std::fs::write(&tmp, text).with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        if let Err(cleanup) = std::fs::remove_file(&tmp) {
            log::warn!("Failed to remove {}: {}", tmp.display(), cleanup);
        }
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load the label store, or start an empty one if the file does not exist.
pub fn load_store(path: &Path) -> Result<LabelStore> {
    if !path.exists() {
        log::info!("No label store at {}, starting empty", path.display());
        return Ok(LabelStore::new());
    }
    let store: LabelStore = read_file(path)?;
    log::info!(
        "Loaded {} labeled images ({} regions) from {}",
        store.len(),
        store.region_count(),
        path.display()
    );
    Ok(store)
}

/// Persist the full label store.
pub fn save_store(store: &LabelStore, path: &Path) -> Result<()> {
    write_file(store, path)?;
    log::debug!("Saved {} labeled images to {}", store.len(), path.display());
    Ok(())
}
