// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native operator windows.
//!
//! Each interaction opens its own window and blocks until it is closed,
//! which keeps the labeling loop strictly sequential.

pub mod canvas;
pub mod toolbar;

use crate::app::{CropPromptApp, RegionSelectorApp};
use crate::labeler::{LabelPrompt, RegionSelector};
use crate::models::region::Rect;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;

/// Run an app in a native window until the window closes.
fn run_window(title: &str, inner_size: [f32; 2], app: impl eframe::App + 'static) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_min_inner_size([320.0, 240.0])
            .with_title(title),
        run_and_return: true,
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Ok(Box::new(app) as Box<dyn eframe::App>)),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {}", e))
}

/// Window size that shows the image at native scale where it fits.
fn window_size(image: &RgbaImage, max: [f32; 2], chrome: f32) -> [f32; 2] {
    [
        (image.width() as f32).clamp(320.0, max[0]),
        (image.height() as f32 + chrome).clamp(240.0, max[1]),
    ]
}

/// Rectangle selection in a native window.
#[derive(Debug, Default)]
pub struct EguiRegionSelector;

impl RegionSelector for EguiRegionSelector {
    fn select_regions(&mut self, key: &str, image: &RgbaImage) -> Result<Vec<Rect>> {
        let result = Rc::new(RefCell::new(Vec::new()));
        let app = RegionSelectorApp::new(image.clone(), Rc::clone(&result));

        run_window(key, window_size(image, [1280.0, 800.0], 40.0), app)
            .with_context(|| format!("Region selection failed for {}", key))?;

        let rects = result.take();
        log::debug!("{} regions selected on {}", rects.len(), key);
        Ok(rects)
    }
}

/// Class entry for a cropped region in a native window.
#[derive(Debug, Default)]
pub struct EguiLabelPrompt;

impl LabelPrompt for EguiLabelPrompt {
    fn prompt_class(&mut self, crop: &RgbaImage, rect: &Rect) -> Result<String> {
        let result = Rc::new(RefCell::new(None));
        let app = CropPromptApp::new(crop.clone(), *rect, Rc::clone(&result));

        run_window("Region class", window_size(crop, [800.0, 600.0], 48.0), app)?;

        result
            .take()
            .with_context(|| format!("Class prompt for {} closed without a class", rect))
    }
}
