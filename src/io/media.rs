// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image discovery, loading and cropping.
//!
//! Discovery walks a directory tree and keeps every file that has a
//! supported extension and actually decodes as an image. Files that fail
//! to decode are reported and skipped.

use crate::models::region::Rect;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions considered during discovery (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "gif"];

/// Check whether the path has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// True if JPEG data ends with the end-of-image marker.
///
/// Trailing zero padding after the marker is allowed.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_EOI)
}

/// Open and fully decode the file to make sure it is a usable image.
///
/// The JPEG decoder recovers from missing data, so JPEG files must also
/// carry their end-of-image marker.
pub fn verify_image(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes.as_slice())).with_guessed_format()?;

    if reader.format() == Some(image::ImageFormat::Jpeg) && !jpeg_is_complete(&bytes) {
        anyhow::bail!("{} is truncated (no JPEG end marker)", path.display());
    }

    reader
        .decode()
        .with_context(|| format!("{} is not a decodable image", path.display()))?;
    Ok(())
}

/// Recursively collect the valid images under `root`, in file-name order.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Image directory not found: {}", root.display());
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported_image(path) {
            continue;
        }
        match verify_image(path) {
            Ok(()) => images.push(path.to_path_buf()),
            Err(e) => log::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    log::info!("Discovered {} images under {}", images.len(), root.display());
    Ok(images)
}

/// Load an image as RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Copy the pixels under `rect` out of `image`.
///
/// The rectangle is clipped to the image bounds first.
pub fn crop_region(image: &RgbaImage, rect: &Rect) -> RgbaImage {
    let r = rect.clamp_to(image.width(), image.height());
    image::imageops::crop_imm(image, r.x, r.y, r.width, r.height).to_image()
}
