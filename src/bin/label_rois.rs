// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label regions of interest on a directory of images.

use anyhow::Result;
use clap::Parser;
use roi_labeler::io::serialization;
use roi_labeler::ui::{EguiLabelPrompt, EguiRegionSelector};
use roi_labeler::{config, labeler, Config, Labeler, ProcessMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Select regions of interest and assign classes", long_about = None)]
struct Cli {
    /// Directory searched recursively for images
    #[arg(long = "image_dir")]
    image_dir: PathBuf,

    /// Which images to visit
    #[arg(long, value_enum, default_value_t = ProcessMode::New)]
    process: ProcessMode,

    /// Configuration file naming the label store
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let mut store = serialization::load_store(config.store_path())?;

    let selected = labeler::session_images(&cli.image_dir, &store, cli.process)?;
    if selected.is_empty() {
        println!("Nothing to label");
        return Ok(());
    }

    let mut labeler = Labeler::new(EguiRegionSelector, EguiLabelPrompt, config.store_path());
    let summary = labeler.run(&selected, &mut store)?;

    println!("Labeling complete: {} (saved to {})", summary, labeler.store_path().display());
    Ok(())
}
