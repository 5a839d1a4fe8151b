// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region data structures.
//!
//! This module defines the rectangles an operator draws on an image and
//! the labeled regions that end up in the label store.

use serde::{Deserialize, Serialize};

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel coordinates, top-left origin.
///
/// Serialized as `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32, u32, u32)", into = "(u32, u32, u32, u32)")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// True if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip the rectangle so it lies inside an image of the given size.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Rect {
        let x = self.x.min(image_width);
        let y = self.y.min(image_height);
        Rect {
            x,
            y,
            width: self.width.min(image_width - x),
            height: self.height.min(image_height - y),
        }
    }
}

impl From<(u32, u32, u32, u32)> for Rect {
    fn from((x, y, width, height): (u32, u32, u32, u32)) -> Self {
        Rect::new(x, y, width, height)
    }
}

impl From<Rect> for (u32, u32, u32, u32) {
    fn from(rect: Rect) -> Self {
        (rect.x, rect.y, rect.width, rect.height)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {} {} {}]", self.x, self.y, self.width, self.height)
    }
}

/// A labeled region: the rectangle an operator selected and the class
/// they assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub coords: Rect,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl Region {
    pub fn new(coords: Rect, class_name: impl Into<String>) -> Self {
        Self {
            coords,
            class_name: class_name.into(),
        }
    }
}
