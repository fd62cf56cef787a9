//! Plot camera.
//!
//! Provides zoom, pan and fit-to-plot controls for viewing trajectories.

use bevy::{
    camera::ScalingMode,
    input::common_conditions::input_just_pressed,
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};

use crate::render::PlotFrame;
use crate::render::frame::PLOT_HALF_EXTENT;

/// Minimum zoom level (closest zoom).
pub const MIN_ZOOM: f32 = 0.01;

/// Maximum zoom level (furthest zoom).
pub const MAX_ZOOM: f32 = 20.0;

pub const DEFAULT_ZOOM: f32 = 1.0;

/// Viewport height in world units at zoom 1.0: the plot square plus a border.
pub const VIEWPORT_HEIGHT: f32 = PLOT_HALF_EXTENT * 2.2;

/// Zoom speed multiplier for scroll wheel.
pub const ZOOM_SPEED: f32 = 0.1;

/// Marker component for the plot camera.
#[derive(Component)]
pub struct PlotCamera;

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (
                camera_zoom,
                camera_pan,
                fit_view.run_if(plot_refitted.or(input_just_pressed(KeyCode::KeyF))),
            ),
        );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEWPORT_HEIGHT,
            },
            scale: DEFAULT_ZOOM,
            ..OrthographicProjection::default_2d()
        }),
        PlotCamera,
    ));
}

fn plot_refitted(frame: Res<PlotFrame>) -> bool {
    frame.is_changed()
}

/// Center the camera on the plot and restore the default zoom.
fn fit_view(mut camera_query: Query<(&mut Transform, &mut Projection), With<PlotCamera>>) {
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };
    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
    if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scale = DEFAULT_ZOOM;
    }
}

/// Handle mouse scroll wheel for zoom.
fn camera_zoom(
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<&mut Projection, With<PlotCamera>>,
) {
    if mouse_scroll.delta.y == 0.0 {
        return;
    }

    let Ok(mut projection) = camera_query.single_mut() else {
        return;
    };

    let Projection::Orthographic(ref mut ortho) = *projection else {
        return;
    };

    // Logarithmic zoom: multiply scale by factor based on scroll direction
    let zoom_factor = 1.0 - mouse_scroll.delta.y * ZOOM_SPEED;
    ortho.scale = (ortho.scale * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
}

/// Pan with the middle or right mouse button.
fn camera_pan(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    window_query: Query<&Window>,
    mut camera_query: Query<(&mut Transform, &Projection), With<PlotCamera>>,
) {
    if !mouse_buttons.any_pressed([MouseButton::Middle, MouseButton::Right]) {
        return;
    }

    let Ok((mut transform, projection)) = camera_query.single_mut() else {
        return;
    };

    let Projection::Orthographic(ortho) = projection else {
        return;
    };

    // Pixels to world units: the viewport height is fixed in world units
    let window_height = window_query
        .iter()
        .next()
        .map_or(VIEWPORT_HEIGHT, |window| window.height().max(1.0));
    let delta = mouse_motion.delta * (VIEWPORT_HEIGHT / window_height) * ortho.scale;

    transform.translation.x -= delta.x;
    transform.translation.y += delta.y; // Invert Y for natural feel
}
