//! Trajectory trails using Bevy Gizmos.
//!
//! Each body is drawn as a polyline through its revealed window with a filled
//! marker at the current position, in the body's palette color.

use bevy::prelude::*;

use super::colors::color_for;
use super::frame::PlotFrame;
use crate::playback::PlaybackController;

/// Plugin drawing the revealed trajectories.
pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrailSettings>()
            .init_resource::<PlotFrame>();
    }
}

#[derive(Resource)]
pub struct TrailSettings {
    pub visible: bool,
    /// Marker radius in world units.
    pub marker_radius: f32,
    /// Alpha applied to trail lines; markers are opaque.
    pub line_alpha: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            visible: true,
            marker_radius: 4.0,
            line_alpha: 0.85,
        }
    }
}

/// Keep the plot frame fitted to the loaded dataset.
pub fn fit_plot_frame(controller: Res<PlaybackController>, mut frame: ResMut<PlotFrame>) {
    if frame.bypass_change_detection().refit(controller.dataset()) {
        frame.set_changed();
        debug!("Plot frame refitted (scale {:.3e})", frame.scale());
    }
}

pub fn draw_trails(
    mut gizmos: Gizmos,
    settings: Res<TrailSettings>,
    controller: Res<PlaybackController>,
    frame: Res<PlotFrame>,
) {
    if !settings.visible {
        return;
    }
    let Some(dataset) = controller.dataset() else {
        return;
    };
    let total = dataset.body_count();

    for series in controller.visible_series() {
        let color = color_for(series.body, total);

        if series.points.len() > 1 {
            gizmos.linestrip_2d(
                series.points.iter().map(|&p| frame.to_world(p)),
                color.with_alpha(settings.line_alpha),
            );
        }

        if let Some(marker) = series.marker {
            gizmos
                .circle_2d(
                    Isometry2d::from_translation(frame.to_world(marker)),
                    settings.marker_radius,
                    color,
                )
                .resolution(24);
        }
    }
}
