//! Rendering of the trajectory plot.
//!
//! Projection and coloring are plain functions over the dataset; the systems
//! here only map their output into world space and draw it.

pub mod colors;
pub mod frame;
pub mod projector;
mod trails;

#[cfg(test)]
mod proptest_render;

use bevy::prelude::*;

use self::trails::{TrailPlugin, draw_trails, fit_plot_frame};
use crate::playback::PlaybackSet;

pub use self::frame::PlotFrame;
pub use self::trails::TrailSettings;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TrailPlugin)
            // Draw what playback produced this frame, in the frame it was fitted to
            .add_systems(
                Update,
                (fit_plot_frame, draw_trails).chain().after(PlaybackSet),
            );
    }
}
