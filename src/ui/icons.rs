//! Phosphor icon definitions for the UI.
//!
//! The glyphs come from the Phosphor icon font, installed by
//! [`install_icon_font`] on the first egui pass.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Set once the icon font is installed in the primary egui context.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// egui's default fonts with the Phosphor glyphs appended as a fallback.
pub fn icon_fonts() -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    fonts
}

/// Install [`icon_fonts`] once the primary context exists.
pub fn install_icon_font(mut contexts: EguiContexts, mut installed: ResMut<FontsInitialized>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    ctx.set_fonts(icon_fonts());
    installed.0 = true;
    debug!("Icon font installed");
}

// Browse all icons at https://phosphoricons.com/

pub const PLAY: &str = egui_phosphor::regular::PLAY;
pub const PAUSE: &str = egui_phosphor::regular::PAUSE;
/// Replay from the start
pub const REPLAY: &str = egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE;
/// Fetch and plot the selected run
pub const PLOT: &str = egui_phosphor::regular::CHART_LINE;
/// Show the whole trajectory
pub const REVEAL: &str = egui_phosphor::regular::FAST_FORWARD;
/// Fetch again from the backend
pub const REFRESH: &str = egui_phosphor::regular::ARROWS_CLOCKWISE;
/// Reset the run on the backend
pub const RESET: &str = egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE;
pub const CLOSE: &str = egui_phosphor::regular::X;
pub const HELP: &str = egui_phosphor::regular::QUESTION;

// Status icons
pub const WARNING: &str = egui_phosphor::regular::WARNING;
pub const INFO: &str = egui_phosphor::regular::INFO;
pub const LOADING: &str = egui_phosphor::regular::HOURGLASS;
/// Orbit/path icon
pub const ORBIT: &str = egui_phosphor::regular::PATH;
