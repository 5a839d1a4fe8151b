// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hint bar for the region selector.
//!
//! Shows the keyboard controls, the selection state and a "Done" button.

/// Action requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Accept,
    Finish,
}

/// Display the toolbar and report which button was pressed.
pub fn show(ui: &mut egui::Ui, accepted: usize, has_pending: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(format!("Regions: {}", accepted));

        ui.separator();

        if ui.add_enabled(has_pending, egui::Button::new("✔ Accept")).clicked() {
            action = ToolbarAction::Accept;
        }
        if ui.button("⏹ Done").clicked() {
            action = ToolbarAction::Finish;
        }

        ui.separator();

        let hint = if has_pending {
            "Enter/Space to accept, C to discard, drag again to redraw"
        } else {
            "Drag to draw a region, Backspace removes the last one, Esc when done"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
