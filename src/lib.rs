// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region-of-interest labeling and video frame extraction.
//!
//! Prepares an image classification dataset: operators draw and name
//! regions on images (`label-rois`), and videos are split into still
//! frames (`extract-frames`).

pub mod app;
pub mod config;
pub mod filter;
pub mod io;
pub mod labeler;
pub mod models;
pub mod ui;
pub mod util;

pub use config::Config;
pub use filter::{select_images, ProcessMode};
pub use labeler::{LabelPrompt, LabelSummary, Labeler, RegionSelector};
pub use models::{
    region::{Rect, Region},
    store::{LabelEntry, LabelStore},
};
