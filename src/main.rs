//! N-body trajectory plotter
//!
//! A desktop viewer that lists integration runs from an N-body backend and
//! plays their trajectories back as colored trails.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clap::Parser;

use nbody_plotter::backend::HttpBackend;
use nbody_plotter::camera::CameraPlugin;
use nbody_plotter::config::Cli;
use nbody_plotter::playback::{Backend, InitialRun, PlaybackPlugin};
use nbody_plotter::render::RenderPlugin;
use nbody_plotter::ui::UiPlugin;

fn main() {
    let cli = Cli::parse();
    let backend_config = cli.backend_config();
    let settings = cli.playback_settings();
    let initial_run = cli.initial_run();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "N-body plotter".to_string(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(EguiPlugin::default())
    .insert_resource(ClearColor(Color::srgb(0.06, 0.06, 0.09)))
    // Insert resources before plugins that depend on them
    .insert_resource(Backend(Arc::new(HttpBackend::new(&backend_config))))
    .insert_resource(settings);

    match initial_run {
        Ok(run) => {
            app.insert_resource(InitialRun(run));
        }
        Err(err) => warn!("Ignoring --run: {err}"),
    }

    app.add_plugins((PlaybackPlugin, CameraPlugin, RenderPlugin, UiPlugin))
        .run();
}
