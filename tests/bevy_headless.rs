//! Headless Bevy integration tests.
//!
//! These tests run the playback plugin against an in-memory backend without
//! a window or GPU. Backend calls run on the IO task pool, so tests update
//! the app until a condition holds, with an upper bound on frames.

mod common;

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use common::{MockBackend, diverging_pair, straight_lines};
use nbody_plotter::catalog::RunCatalog;
use nbody_plotter::config::{PlaybackPolicy, PlaybackSettings};
use nbody_plotter::playback::{
    Backend, InitialRun, PendingTasks, PlaybackCommand, PlaybackController, PlaybackError,
    PlaybackPlugin, PlaybackState, PlaybackStatus,
};
use nbody_plotter::types::RunId;

/// Frame length; also the tick interval so every frame is one tick.
const FRAME: Duration = Duration::from_millis(200);

fn create_app(backend: Arc<MockBackend>, policy: PlaybackPolicy) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_resource(Backend(backend))
        .insert_resource(PlaybackSettings {
            policy,
            tick_interval: FRAME,
            ..Default::default()
        })
        .add_plugins(PlaybackPlugin);
    app
}

/// Update until `done` holds. Panics after a bounded number of frames.
fn update_until(app: &mut App, done: impl Fn(&World) -> bool) {
    for _ in 0..500 {
        app.update();
        if done(app.world()) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("condition not reached");
}

fn settle(app: &mut App) {
    update_until(app, |world| world.resource::<PendingTasks>().outstanding() == 0);
}

fn send(app: &mut App, command: PlaybackCommand) {
    app.world_mut().write_message(command);
}

fn controller(app: &App) -> &PlaybackController {
    app.world().resource::<PlaybackController>()
}

#[test]
fn test_catalog_selects_first_run() {
    let backend = Arc::new(
        MockBackend::default()
            .with_run(7, diverging_pair())
            .with_run(3, diverging_pair()),
    );
    let mut app = create_app(backend, PlaybackPolicy::FullReveal);
    settle(&mut app);

    let catalog = app.world().resource::<RunCatalog>();
    assert_eq!(catalog.runs(), &[RunId::Number(3), RunId::Number(7)]);
    assert!(!catalog.is_loading());
    assert_eq!(controller(&app).active_run(), Some(&RunId::Number(3)));
    assert_eq!(controller(&app).state(), PlaybackState::Idle);
}

#[test]
fn test_initial_run_is_preferred() {
    let backend = Arc::new(
        MockBackend::default()
            .with_run(3, diverging_pair())
            .with_run(7, diverging_pair()),
    );
    let mut app = create_app(backend, PlaybackPolicy::FullReveal);
    app.insert_resource(InitialRun(Some(RunId::Number(7))));
    settle(&mut app);

    assert_eq!(controller(&app).active_run(), Some(&RunId::Number(7)));
}

#[test]
fn test_plot_full_reveal() {
    let backend = Arc::new(MockBackend::default().with_run(1, diverging_pair()));
    let mut app = create_app(backend.clone(), PlaybackPolicy::FullReveal);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().state() == PlaybackState::Complete
    });

    assert_eq!(controller(&app).cursor().position(), 3);
    assert_eq!(backend.fetches(), 1);

    // Plotting again is served from the store
    send(&mut app, PlaybackCommand::Plot);
    settle(&mut app);
    assert_eq!(backend.fetches(), 1);
}

#[test]
fn test_incremental_ticks_once_per_interval() {
    let backend = Arc::new(MockBackend::default().with_run(1, straight_lines(2, 20)));
    let mut app = create_app(backend, PlaybackPolicy::Incremental);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().state() == PlaybackState::Advancing
    });

    let before = controller(&app).cursor().position();
    app.update();
    assert_eq!(controller(&app).cursor().position(), before + 1);
    app.update();
    assert_eq!(controller(&app).cursor().position(), before + 2);

    send(&mut app, PlaybackCommand::Pause);
    app.update();
    let paused_at = controller(&app).cursor().position();
    app.update();
    assert_eq!(controller(&app).cursor().position(), paused_at);
    assert_eq!(controller(&app).state(), PlaybackState::Ready);

    send(&mut app, PlaybackCommand::Play);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().state() == PlaybackState::Complete
    });
    assert_eq!(controller(&app).cursor().position(), 20);
}

#[test]
fn test_switching_runs_stops_ticks() {
    let backend = Arc::new(
        MockBackend::default()
            .with_run(1, straight_lines(1, 100))
            .with_run(2, straight_lines(3, 100)),
    );
    let mut app = create_app(backend, PlaybackPolicy::Incremental);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().cursor().position() >= 3
    });

    send(&mut app, PlaybackCommand::Select(RunId::Number(2)));
    app.update();
    assert_eq!(controller(&app).state(), PlaybackState::Idle);
    assert_eq!(controller(&app).cursor().position(), 0);

    // Further frames must not advance anything until run 2 is plotted
    app.update();
    app.update();
    assert_eq!(controller(&app).cursor().position(), 0);
    assert!(controller(&app).dataset().is_none());

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().state() == PlaybackState::Advancing
    });
    assert_eq!(controller(&app).dataset().unwrap().body_count(), 3);
}

#[test]
fn test_slow_response_for_previous_run_is_ignored() {
    let backend = Arc::new(
        MockBackend::default()
            .with_run(1, straight_lines(1, 10))
            .with_run(2, straight_lines(2, 10))
            .with_delay(1, Duration::from_millis(150)),
    );
    let mut app = create_app(backend, PlaybackPolicy::FullReveal);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    app.update();
    send(&mut app, PlaybackCommand::Select(RunId::Number(2)));
    send(&mut app, PlaybackCommand::Plot);
    settle(&mut app);

    let controller = controller(&app);
    assert_eq!(controller.active_run(), Some(&RunId::Number(2)));
    assert_eq!(controller.dataset().unwrap().body_count(), 2);
    assert_eq!(controller.store().run(), Some(&RunId::Number(2)));
    assert_eq!(controller.state(), PlaybackState::Complete);
}

#[test]
fn test_fetch_failure_is_reported() {
    let backend = Arc::new(MockBackend::default().with_status(5, 500, "Internal Server Error"));
    let mut app = create_app(backend, PlaybackPolicy::FullReveal);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    settle(&mut app);

    let status = app.world().resource::<PlaybackStatus>();
    assert_eq!(
        status.error,
        Some(PlaybackError::FetchFailed(
            "HTTP 500: Internal Server Error".to_string()
        ))
    );
    assert_eq!(controller(&app).state(), PlaybackState::Idle);
}

#[test]
fn test_play_without_run_reports_error() {
    let backend = Arc::new(MockBackend::default());
    let mut app = create_app(backend, PlaybackPolicy::FullReveal);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Play);
    app.update();

    let status = app.world().resource::<PlaybackStatus>();
    assert_eq!(status.error, Some(PlaybackError::NoActiveRun));
    assert_eq!(controller(&app).state(), PlaybackState::Idle);
}

#[test]
fn test_reset_invalidates_run() {
    let backend = Arc::new(MockBackend::default().with_run(1, diverging_pair()));
    let mut app = create_app(backend.clone(), PlaybackPolicy::FullReveal);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    settle(&mut app);
    assert_eq!(controller(&app).state(), PlaybackState::Complete);

    send(&mut app, PlaybackCommand::Reset);
    settle(&mut app);

    assert_eq!(backend.resets(), 1);
    assert_eq!(controller(&app).state(), PlaybackState::Idle);
    assert!(controller(&app).store().dataset().is_none());
    assert!(app.world().resource::<PlaybackStatus>().notice.is_some());

    send(&mut app, PlaybackCommand::Plot);
    settle(&mut app);
    assert_eq!(backend.fetches(), 2);
}

#[test]
fn test_refresh_replaces_dataset() {
    let backend = Arc::new(MockBackend::default().with_run(1, straight_lines(2, 100)));
    let mut app = create_app(backend.clone(), PlaybackPolicy::Incremental);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().cursor().position() >= 3
    });
    let old = Arc::clone(controller(&app).dataset().unwrap());

    send(&mut app, PlaybackCommand::Refresh);
    settle(&mut app);

    assert_eq!(backend.fetches(), 2);
    let controller = controller(&app);
    assert!(!Arc::ptr_eq(&old, controller.dataset().unwrap()));
    assert_eq!(controller.cursor().position(), 0);
    assert_eq!(controller.state(), PlaybackState::Ready);
    assert_eq!(old.orbit_size(), 100);
    assert!(old.bodies().all(|samples| samples.len() == 100));
}

#[test]
fn test_clear_stops_playback() {
    let backend = Arc::new(MockBackend::default().with_run(1, straight_lines(1, 100)));
    let mut app = create_app(backend, PlaybackPolicy::Incremental);
    settle(&mut app);

    send(&mut app, PlaybackCommand::Plot);
    update_until(&mut app, |world| {
        world.resource::<PlaybackController>().cursor().position() >= 2
    });

    send(&mut app, PlaybackCommand::Clear);
    for _ in 0..5 {
        app.update();
        assert_eq!(controller(&app).cursor().position(), 0);
        assert_eq!(controller(&app).state(), PlaybackState::Idle);
    }
    assert!(controller(&app).active_run().is_none());
    assert!(controller(&app).visible_series().is_empty());
}
