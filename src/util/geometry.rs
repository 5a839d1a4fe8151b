// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! pixel coordinates and normalized coordinates, and for fitting an image
//! into the space available on screen.

use crate::models::region::{Point, Rect};

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

/// Size of an image scaled to fit `available` while keeping its aspect ratio.
pub fn fit_size(img_width: u32, img_height: u32, available: (f32, f32)) -> (f32, f32) {
    let img_aspect = img_width as f32 / img_height as f32;
    let available_aspect = available.0 / available.1;

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        (available.0, available.0 / img_aspect)
    } else {
        // Image is taller - fit to height
        (available.1 * img_aspect, available.1)
    }
}

/// Pixel rectangle spanned by two normalized corners, in any order.
///
/// Corners are clamped to the image.
pub fn corners_to_rect(a: &Point, b: &Point, width: u32, height: u32) -> Rect {
    let (ax, ay) = denormalize_coordinates(a, width, height);
    let (bx, by) = denormalize_coordinates(b, width, height);

    let clamp_x = |v: f64| v.round().clamp(0.0, width as f64) as u32;
    let clamp_y = |v: f64| v.round().clamp(0.0, height as f64) as u32;

    let (x0, x1) = (clamp_x(ax.min(bx)), clamp_x(ax.max(bx)));
    let (y0, y1) = (clamp_y(ay.min(by)), clamp_y(ay.max(by)));
    Rect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Normalized corners of a pixel rectangle, for drawing it back on screen.
pub fn rect_to_corners(rect: &Rect, width: u32, height: u32) -> (Point, Point) {
    (
        normalize_coordinates(rect.x as f64, rect.y as f64, width, height),
        normalize_coordinates(
            (rect.x + rect.width) as f64,
            (rect.y + rect.height) as f64,
            width,
            height,
        ),
    )
}
