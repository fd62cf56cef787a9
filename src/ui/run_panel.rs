//! Top bar: run selection and backend actions.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::dock::colors;
use super::icons;
use crate::catalog::RunCatalog;
use crate::config::PlaybackPolicy;
use crate::playback::{PlaybackCommand, PlaybackController};
use crate::types::RunId;

pub fn run_panel_system(
    mut contexts: EguiContexts,
    catalog: Res<RunCatalog>,
    controller: Res<PlaybackController>,
    mut commands: MessageWriter<PlaybackCommand>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("run_panel")
        .frame(
            egui::Frame::NONE
                .fill(colors::DOCK_BG)
                .inner_margin(egui::Margin::symmetric(16, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 10.0;
                let active = controller.active_run();

                ui.label(egui::RichText::new("Run").color(colors::TEXT));
                if let Some(run) = render_run_selector(ui, &catalog, active) {
                    commands.write(PlaybackCommand::Select(run));
                }

                if catalog.is_loading() {
                    ui.label(egui::RichText::new(icons::LOADING).color(colors::MUTED))
                        .on_hover_text("Listing runs");
                } else if ui
                    .small_button(icons::REFRESH)
                    .on_hover_text("List runs again")
                    .clicked()
                {
                    commands.write(PlaybackCommand::ReloadCatalog);
                }
                ui.label(
                    egui::RichText::new(format!(
                        "{} runs, {} body sets",
                        catalog.runs().len(),
                        catalog.nbody_ids().len()
                    ))
                    .color(colors::MUTED),
                );

                ui.separator();

                let has_run = active.is_some();
                let plot = egui::Button::new(format!("{} Plot!", icons::PLOT));
                if ui
                    .add_enabled(has_run && !controller.is_fetching(), plot)
                    .on_hover_text("Fetch and plot the selected run (Enter)")
                    .clicked()
                {
                    commands.write(PlaybackCommand::Plot);
                }
                if ui
                    .add_enabled(has_run, egui::Button::new(icons::REFRESH))
                    .on_hover_text("Fetch the run again")
                    .clicked()
                {
                    commands.write(PlaybackCommand::Refresh);
                }
                if ui
                    .add_enabled(has_run, egui::Button::new(icons::RESET))
                    .on_hover_text("Reset the run on the backend")
                    .clicked()
                {
                    commands.write(PlaybackCommand::Reset);
                }
                if ui
                    .add_enabled(has_run, egui::Button::new(icons::CLOSE))
                    .on_hover_text("Deselect the run")
                    .clicked()
                {
                    commands.write(PlaybackCommand::Clear);
                }

                ui.separator();

                if let Some(policy) = render_policy_toggle(ui, controller.policy()) {
                    commands.write(PlaybackCommand::SetPolicy(policy));
                }
            });
        });
}

/// Combo box over the listed runs. Returns a newly chosen run.
fn render_run_selector(
    ui: &mut egui::Ui,
    catalog: &RunCatalog,
    active: Option<&RunId>,
) -> Option<RunId> {
    let mut chosen = None;
    let selected_text = active.map_or_else(|| "Select a run".to_string(), RunId::to_string);

    egui::ComboBox::from_id_salt("run_selector")
        .selected_text(selected_text)
        .width(120.0)
        .show_ui(ui, |ui| {
            for run in catalog.runs() {
                let is_active = active == Some(run);
                if ui.selectable_label(is_active, run.to_string()).clicked() && !is_active {
                    chosen = Some(run.clone());
                }
            }
        });

    chosen
}

fn render_policy_toggle(ui: &mut egui::Ui, current: PlaybackPolicy) -> Option<PlaybackPolicy> {
    let mut chosen = None;
    for (policy, label, tooltip) in [
        (PlaybackPolicy::FullReveal, "Full", "Show the whole trajectory at once"),
        (
            PlaybackPolicy::Incremental,
            "Incremental",
            "Reveal the trajectory tick by tick",
        ),
    ] {
        if ui
            .selectable_label(current == policy, label)
            .on_hover_text(tooltip)
            .clicked()
            && current != policy
        {
            chosen = Some(policy);
        }
    }
    chosen
}
