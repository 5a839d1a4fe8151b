// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Convert a video into numbered still frames.

use anyhow::Result;
use clap::Parser;
use roi_labeler::io::video;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Process video into frames", long_about = None)]
struct Cli {
    /// Path to the video to be converted
    #[arg(long)]
    video: PathBuf,

    /// Directory the frames are written to
    #[arg(long = "output-path")]
    output_path: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let frames = video::extract_video(&cli.video, &cli.output_path)?;

    println!("Video conversion successful ({} frames)", frames);
    Ok(())
}
