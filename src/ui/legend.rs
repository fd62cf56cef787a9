//! Legend naming each body in its trail color.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::dock::colors;
use super::icons;
use crate::playback::PlaybackController;
use crate::render::colors::legend_rgb;
use crate::render::projector::orbit_label;

/// Legend rows: label and color for every body.
pub fn legend_entries(total: usize) -> Vec<(String, egui::Color32)> {
    (0..total)
        .map(|body| {
            let [r, g, b] = legend_rgb(body, total);
            (orbit_label(body), egui::Color32::from_rgb(r, g, b))
        })
        .collect()
}

pub fn legend_system(mut contexts: EguiContexts, controller: Res<PlaybackController>) {
    let Some(dataset) = controller.dataset() else {
        return;
    };
    if dataset.body_count() == 0 {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let title = controller
        .active_run()
        .map_or_else(|| "Legend".to_string(), |run| format!("Run {run}"));

    egui::Window::new("legend")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 56.0))
        .frame(
            egui::Frame::NONE
                .fill(colors::DOCK_BG)
                .inner_margin(10)
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 60, 80)))
                .corner_radius(4),
        )
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(title).strong().size(13.0).color(colors::TEXT));
            ui.separator();
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for (label, color) in legend_entries(dataset.body_count()) {
                    ui.label(
                        egui::RichText::new(format!("{} {label}", icons::ORBIT))
                            .size(13.0)
                            .color(color),
                    );
                }
            });
        });
}
