// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and rectangle selection.
//!
//! This module provides the canvas area where the operator views an image
//! and drags out rectangles. Interaction is reported back as a
//! [`CanvasAction`]; the caller owns the selection state.

use crate::models::region::{Point, Rect};
use crate::util::geometry;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    StartDrag(Point),
    Drag(Point),
    StopDrag,
}

/// Upload an image to the GPU for display.
pub fn load_texture(ctx: &egui::Context, name: &str, image: &image::RgbaImage) -> egui::TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

/// Screen rectangle of an image fitted and centered in the available space.
pub fn fit_image_rect(ui: &egui::Ui, image_size: (u32, u32)) -> egui::Rect {
    let available = ui.available_size();
    let (display_width, display_height) =
        geometry::fit_size(image_size.0, image_size.1, (available.x, available.y));

    let x_offset = (available.x - display_width) / 2.0;
    let y_offset = (available.y - display_height) / 2.0;

    egui::Rect::from_min_size(
        ui.min_rect().min + egui::vec2(x_offset, y_offset),
        egui::vec2(display_width, display_height),
    )
}

/// Paint a texture into a screen rectangle.
pub fn paint_image(painter: &egui::Painter, texture: &egui::TextureHandle, image_rect: egui::Rect) {
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Display the image with the accepted and pending rectangles and handle
/// mouse dragging.
pub fn show(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    image_size: (u32, u32),
    accepted: &[Rect],
    pending: Option<&Rect>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let image_rect = fit_image_rect(ui, image_size);
        paint_image(ui.painter(), texture, image_rect);

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());
        if response.drag_stopped() {
            action = CanvasAction::StopDrag;
        } else if let Some(pos) = response.interact_pointer_pos() {
            // Convert screen coordinates to normalized coordinates
            let point = Point::new(
                ((pos.x - image_rect.min.x) / image_rect.width()) as f64,
                ((pos.y - image_rect.min.y) / image_rect.height()) as f64,
            );
            if response.drag_started() {
                action = CanvasAction::StartDrag(point);
            } else if response.dragged() {
                action = CanvasAction::Drag(point);
            }
        }

        let painter = ui.painter();
        for (index, rect) in accepted.iter().enumerate() {
            draw_rect(painter, rect, image_size, &image_rect, egui::Color32::YELLOW);
            let (top_left, _) = geometry::rect_to_corners(rect, image_size.0, image_size.1);
            painter.text(
                to_screen(&top_left, &image_rect) + egui::vec2(4.0, 2.0),
                egui::Align2::LEFT_TOP,
                index.to_string(),
                egui::FontId::proportional(14.0),
                egui::Color32::YELLOW,
            );
        }
        if let Some(rect) = pending {
            draw_rect(painter, rect, image_size, &image_rect, egui::Color32::LIGHT_BLUE);
        }
    });

    action
}

fn to_screen(point: &Point, image_rect: &egui::Rect) -> egui::Pos2 {
    egui::pos2(
        image_rect.min.x + (point.x as f32) * image_rect.width(),
        image_rect.min.y + (point.y as f32) * image_rect.height(),
    )
}

/// Draw a pixel rectangle on the canvas.
fn draw_rect(
    painter: &egui::Painter,
    rect: &Rect,
    image_size: (u32, u32),
    image_rect: &egui::Rect,
    color: egui::Color32,
) {
    let (top_left, bottom_right) = geometry::rect_to_corners(rect, image_size.0, image_size.1);
    let screen_rect = egui::Rect::from_two_pos(
        to_screen(&top_left, image_rect),
        to_screen(&bottom_right, image_rect),
    );
    painter.rect_stroke(screen_rect, 0.0, egui::Stroke::new(2.0, color));
}
