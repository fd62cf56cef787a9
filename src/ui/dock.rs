//! Dock (bottom bar) with playback controls.
//!
//! The dock provides a single horizontal strip with:
//! - Play/Pause (or replay) toggle
//! - Reveal-all button
//! - Cursor progress and playback state
//! - Last error or notice
//! - Help button with shortcuts tooltip

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::icons;
use crate::config::PlaybackPolicy;
use crate::playback::{
    PlaybackCommand, PlaybackController, PlaybackCursor, PlaybackState, PlaybackStatus,
};

/// Colors for the dock UI.
pub(super) mod colors {
    use bevy_egui::egui::Color32;

    pub const DOCK_BG: Color32 = Color32::from_rgba_premultiplied(26, 26, 36, 240);
    pub const PLAY_ICON: Color32 = Color32::from_rgb(85, 221, 136);
    pub const PAUSE_ICON: Color32 = Color32::from_rgb(221, 170, 85);
    pub const TEXT: Color32 = Color32::from_rgb(220, 220, 230);
    pub const MUTED: Color32 = Color32::from_rgb(120, 120, 130);
    pub const ERROR: Color32 = Color32::from_rgb(230, 90, 90);
}

/// Resource for help tooltip visibility.
#[derive(Resource, Default)]
pub struct HelpTooltipState {
    pub visible: bool,
}

/// Icon, tooltip and command of the primary dock button.
pub fn primary_action(
    state: PlaybackState,
    policy: PlaybackPolicy,
) -> (&'static str, &'static str, PlaybackCommand) {
    match (state, policy) {
        (PlaybackState::Advancing, _) => (icons::PAUSE, "Pause (Space)", PlaybackCommand::Pause),
        (PlaybackState::Complete, PlaybackPolicy::Incremental) => {
            (icons::REPLAY, "Replay (Space)", PlaybackCommand::Play)
        }
        _ => (icons::PLAY, "Play (Space)", PlaybackCommand::Play),
    }
}

pub fn progress_label(cursor: PlaybackCursor) -> String {
    format!("{} / {}", cursor.position(), cursor.len())
}

pub fn state_label(state: PlaybackState, fetching: bool) -> &'static str {
    if fetching {
        return "Loading";
    }
    match state {
        PlaybackState::Idle => "Idle",
        PlaybackState::Ready => "Ready",
        PlaybackState::Advancing => "Playing",
        PlaybackState::Complete => "Complete",
    }
}

/// System that renders the dock at the bottom.
pub fn dock_system(
    mut contexts: EguiContexts,
    controller: Res<PlaybackController>,
    status: Res<PlaybackStatus>,
    mut help_state: ResMut<HelpTooltipState>,
    mut commands: MessageWriter<PlaybackCommand>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("dock")
        .exact_height(48.0)
        .frame(
            egui::Frame::NONE
                .fill(colors::DOCK_BG)
                .inner_margin(egui::Margin::symmetric(20, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 14.0;
                let has_run = controller.active_run().is_some();

                let (icon, tooltip, command) =
                    primary_action(controller.state(), controller.policy());
                let color = if command == PlaybackCommand::Pause {
                    colors::PAUSE_ICON
                } else {
                    colors::PLAY_ICON
                };
                let button = egui::Button::new(egui::RichText::new(icon).size(22.0).color(color))
                    .min_size(egui::vec2(40.0, 32.0));
                if ui.add_enabled(has_run, button).on_hover_text(tooltip).clicked() {
                    commands.write(command);
                }

                let reveal = egui::Button::new(egui::RichText::new(icons::REVEAL).size(18.0))
                    .min_size(egui::vec2(32.0, 32.0));
                if ui
                    .add_enabled(has_run, reveal)
                    .on_hover_text("Show whole trajectory (A)")
                    .clicked()
                {
                    commands.write(PlaybackCommand::RevealAll);
                }

                ui.separator();

                ui.label(
                    egui::RichText::new(progress_label(controller.cursor()))
                        .monospace()
                        .size(14.0)
                        .color(colors::TEXT),
                );
                ui.label(
                    egui::RichText::new(state_label(controller.state(), controller.is_fetching()))
                        .size(14.0)
                        .color(colors::MUTED),
                );

                ui.separator();

                render_status(ui, &status);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let help = egui::Button::new(egui::RichText::new(icons::HELP).size(18.0))
                        .selected(help_state.visible)
                        .min_size(egui::vec2(32.0, 32.0));
                    if ui.add(help).on_hover_text("Keyboard shortcuts").clicked() {
                        help_state.visible = !help_state.visible;
                    }
                });
            });
        });

    if help_state.visible {
        render_help_overlay(ctx);
    }
}

fn render_status(ui: &mut egui::Ui, status: &PlaybackStatus) {
    if let Some(err) = &status.error {
        ui.label(
            egui::RichText::new(format!("{} {err}", icons::WARNING))
                .size(14.0)
                .color(colors::ERROR),
        );
    } else if let Some(notice) = &status.notice {
        ui.label(
            egui::RichText::new(format!("{} {notice}", icons::INFO))
                .size(14.0)
                .color(colors::TEXT),
        );
    }
}

/// Render the help overlay showing keyboard shortcuts.
fn render_help_overlay(ctx: &egui::Context) {
    egui::Window::new("Keyboard Shortcuts")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-70.0, -60.0))
        .frame(
            egui::Frame::NONE
                .fill(egui::Color32::from_rgba_premultiplied(26, 26, 36, 245))
                .inner_margin(16)
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 60, 80))),
        )
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;

            let shortcuts = [
                ("Enter", "Plot selected run"),
                ("Space", "Play/Pause"),
                ("A", "Show whole trajectory"),
                ("F", "Fit view"),
                ("Scroll", "Zoom"),
                ("Right drag", "Pan"),
            ];

            egui::Grid::new("shortcuts_grid")
                .num_columns(2)
                .spacing([20.0, 6.0])
                .show(ui, |ui| {
                    for (key, action) in shortcuts {
                        ui.label(egui::RichText::new(key).strong().monospace().size(14.0));
                        ui.label(egui::RichText::new(action).size(14.0));
                        ui.end_row();
                    }
                });
        });
}
