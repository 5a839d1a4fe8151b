// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Selection of the images a labeling session should visit.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Which discovered images to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ProcessMode {
    /// Every discovered image.
    All,
    /// Images with no entry in the label store yet.
    #[default]
    New,
    /// Images that already have labels (review or re-label).
    Existing,
}

/// Label store key for an image path.
pub fn image_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Pick the images to process, keeping discovery order.
pub fn select_images(
    discovered: &[PathBuf],
    labeled: &BTreeSet<String>,
    mode: ProcessMode,
) -> Vec<PathBuf> {
    discovered
        .iter()
        .filter(|path| match mode {
            ProcessMode::All => true,
            ProcessMode::New => !labeled.contains(&image_key(path)),
            ProcessMode::Existing => labeled.contains(&image_key(path)),
        })
        .cloned()
        .collect()
}
