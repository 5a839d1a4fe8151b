// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! egui App implementations for the operator windows.
//!
//! [`RegionSelectorApp`] lets the operator draw rectangles on an image and
//! [`CropPromptApp`] asks for the class of one cropped region. Each app
//! publishes its result through a shared cell so the caller can read it
//! once the window has closed.

use crate::models::region::{Point, Rect};
use crate::ui::{canvas, toolbar};
use crate::util::geometry;
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;

/// Rectangle selection window state.
pub struct RegionSelectorApp {
    /// Pixels waiting to be uploaded as a texture on the first frame
    pixels: Option<RgbaImage>,

    /// Image dimensions (width, height)
    image_size: (u32, u32),

    /// Loaded image texture for display
    texture: Option<egui::TextureHandle>,

    /// Normalized point where the current drag started
    drag_start: Option<Point>,

    /// Rectangle drawn but not yet accepted
    pending: Option<Rect>,

    /// Accepted rectangles, in selection order
    accepted: Vec<Rect>,

    /// Accepted rectangles as seen by the caller
    result: Rc<RefCell<Vec<Rect>>>,
}

impl RegionSelectorApp {
    pub fn new(image: RgbaImage, result: Rc<RefCell<Vec<Rect>>>) -> Self {
        Self {
            image_size: image.dimensions(),
            pixels: Some(image),
            texture: None,
            drag_start: None,
            pending: None,
            accepted: Vec::new(),
            result,
        }
    }

    fn accept_pending(&mut self) {
        if let Some(rect) = self.pending.take() {
            self.accepted.push(rect);
            log::info!("Accepted region {} {}", self.accepted.len() - 1, rect);
            self.publish();
        }
    }

    fn remove_last(&mut self) {
        if let Some(rect) = self.accepted.pop() {
            log::info!("Removed region {}", rect);
            self.publish();
        }
    }

    fn publish(&self) {
        *self.result.borrow_mut() = self.accepted.clone();
    }

    fn finish(&mut self, ctx: &egui::Context) {
        self.publish();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn drag_rect(&self, point: &Point) -> Option<Rect> {
        let start = self.drag_start.as_ref()?;
        let rect = geometry::corners_to_rect(start, point, self.image_size.0, self.image_size.1);
        (!rect.is_empty()).then_some(rect)
    }
}

impl eframe::App for RegionSelectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(pixels) = self.pixels.take() {
            self.texture = Some(canvas::load_texture(ctx, "selection_image", &pixels));
        }

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.accepted.len(), self.pending.is_some()))
            .inner;

        // Handle keyboard events
        let (accept, discard, undo, done) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if accept || toolbar_action == toolbar::ToolbarAction::Accept {
            self.accept_pending();
        }
        if discard {
            self.pending = None;
        }
        if undo {
            self.remove_last();
        }
        if done || toolbar_action == toolbar::ToolbarAction::Finish {
            self.finish(ctx);
            return;
        }

        let Some(texture) = self.texture.clone() else {
            return;
        };

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &texture,
                    self.image_size,
                    &self.accepted,
                    self.pending.as_ref(),
                )
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::StartDrag(point) => {
                self.drag_start = Some(point);
                self.pending = None;
            }
            canvas::CanvasAction::Drag(point) => {
                self.pending = self.drag_rect(&point);
            }
            canvas::CanvasAction::StopDrag => {
                self.drag_start = None;
            }
            canvas::CanvasAction::None => {}
        }
    }
}

/// Class entry window state.
pub struct CropPromptApp {
    pixels: Option<RgbaImage>,
    crop_size: (u32, u32),
    texture: Option<egui::TextureHandle>,
    rect: Rect,
    class_name: String,
    focus_requested: bool,
    result: Rc<RefCell<Option<String>>>,
}

impl CropPromptApp {
    pub fn new(crop: RgbaImage, rect: Rect, result: Rc<RefCell<Option<String>>>) -> Self {
        Self {
            crop_size: crop.dimensions(),
            pixels: Some(crop),
            texture: None,
            rect,
            class_name: String::new(),
            focus_requested: false,
            result,
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        let class_name = self.class_name.trim();
        if class_name.is_empty() {
            return;
        }
        *self.result.borrow_mut() = Some(class_name.to_string());
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for CropPromptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(pixels) = self.pixels.take() {
            self.texture = Some(canvas::load_texture(ctx, "crop_image", &pixels));
        }

        let mut submit = false;
        egui::TopBottomPanel::bottom("class_entry").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Enter class for co-ordinates {}:", self.rect));
                let response = ui.text_edit_singleline(&mut self.class_name);
                if !self.focus_requested {
                    response.request_focus();
                    self.focus_requested = true;
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                let has_text = !self.class_name.trim().is_empty();
                if ui.add_enabled(has_text, egui::Button::new("OK")).clicked() {
                    submit = true;
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(texture) = &self.texture {
                ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
                let image_rect = canvas::fit_image_rect(ui, self.crop_size);
                canvas::paint_image(ui.painter(), texture, image_rect);
            }
        });

        if submit {
            self.submit(ctx);
        }
    }
}
