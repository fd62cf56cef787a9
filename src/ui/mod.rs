//! UI module providing egui-based interface.
//!
//! A top bar selects runs and talks to the backend, a bottom dock drives
//! playback, and a floating legend names the bodies. Every control sends a
//! [`PlaybackCommand`]; nothing here mutates playback state directly.

mod dock;
pub mod icons;
mod legend;
mod run_panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::playback::{PlaybackCommand, PlaybackController, PlaybackState};

pub use dock::{HelpTooltipState, primary_action, progress_label, state_label};
pub use legend::legend_entries;

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HelpTooltipState>()
            .init_resource::<icons::FontsInitialized>()
            // Keyboard shortcuts don't need egui context - can stay in Update
            .add_systems(Update, playback_keyboard)
            // Icons render as tofu until the font is in
            .add_systems(
                EguiPrimaryContextPass,
                icons::install_icon_font.run_if(|init: Res<icons::FontsInitialized>| !init.0),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    run_panel::run_panel_system,
                    dock::dock_system,
                    legend::legend_system,
                )
                    .chain()
                    .after(icons::install_icon_font)
                    .run_if(|init: Res<icons::FontsInitialized>| init.0),
            );
    }
}

/// Shortcut keys mapped onto playback commands.
pub fn playback_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    controller: Res<PlaybackController>,
    mut commands: MessageWriter<PlaybackCommand>,
) {
    if keys.just_pressed(KeyCode::Enter) {
        commands.write(PlaybackCommand::Plot);
    }
    if keys.just_pressed(KeyCode::Space) {
        let command = if controller.state() == PlaybackState::Advancing {
            PlaybackCommand::Pause
        } else {
            PlaybackCommand::Play
        };
        commands.write(command);
    }
    if keys.just_pressed(KeyCode::KeyA) {
        commands.write(PlaybackCommand::RevealAll);
    }
}
