//! Trajectory playback engine.
//!
//! The [`PlaybackController`] resource holds the state machine. This plugin
//! feeds it: [`PlaybackCommand`] messages from the UI, fetch tasks finishing
//! on the IO pool, and a repeating timer that advances the cursor while
//! playback is running.

pub mod controller;
pub mod cursor;
mod tasks;

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;

use crate::backend::{BackendError, TrajectorySource};
use crate::catalog::RunCatalog;
use crate::config::{PlaybackPolicy, PlaybackSettings};
use crate::types::RunId;

pub use self::controller::{PlaybackController, PlaybackState};
pub use self::cursor::PlaybackCursor;
pub use self::tasks::PendingTasks;

/// Plugin providing trajectory fetching and playback.
pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaybackSettings>()
            .init_resource::<PlaybackStatus>()
            .init_resource::<PlaybackTicker>()
            .init_resource::<PendingTasks>()
            .init_resource::<RunCatalog>()
            .add_message::<PlaybackCommand>()
            .add_systems(PreStartup, init_controller)
            .add_systems(Startup, tasks::load_catalog)
            .add_systems(
                Update,
                (
                    tasks::poll_catalog,
                    handle_commands,
                    tasks::poll_fetches,
                    tasks::poll_resets,
                    advance_playback,
                )
                    .chain()
                    .in_set(PlaybackSet),
            );
    }
}

/// System set containing every playback system; rendering runs after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackSet;

/// Backend the plugin fetches from.
#[derive(Resource, Clone)]
pub struct Backend(pub Arc<dyn TrajectorySource>);

/// Run to select once the catalog is loaded, instead of the first listed one.
#[derive(Resource, Clone, Debug, Default)]
pub struct InitialRun(pub Option<RunId>);

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Network failure or non-2xx response.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Response body unusable as a trajectory dataset.
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("no run selected")]
    NoActiveRun,
}

impl From<BackendError> for PlaybackError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Status { .. } | BackendError::Transport(_) => {
                PlaybackError::FetchFailed(err.to_string())
            }
            BackendError::Decode(_) | BackendError::Dataset(_) => {
                PlaybackError::MalformedDataset(err.to_string())
            }
        }
    }
}

/// Request from the surrounding UI.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum PlaybackCommand {
    /// Make a run the active one.
    Select(RunId),
    /// Fetch the active run if needed, then play it.
    Plot,
    Play,
    Pause,
    /// Show the whole trajectory at once.
    RevealAll,
    /// Fetch the active run again, bypassing the stored copy.
    Refresh,
    /// Reset the active run on the backend to its initial conditions.
    Reset,
    /// Deselect the active run.
    Clear,
    SetPolicy(PlaybackPolicy),
    /// List runs again.
    ReloadCatalog,
}

/// Last user-facing outcome of playback requests.
#[derive(Resource, Default, Debug)]
pub struct PlaybackStatus {
    pub error: Option<PlaybackError>,
    pub notice: Option<String>,
}

impl PlaybackStatus {
    pub fn report(&mut self, err: PlaybackError) {
        warn!("{err}");
        self.error = Some(err);
        self.notice = None;
    }

    pub fn note(&mut self, notice: impl Into<String>) {
        self.error = None;
        self.notice = Some(notice.into());
    }

    pub fn clear(&mut self) {
        self.error = None;
        self.notice = None;
    }
}

/// Repeating timer driving incremental playback.
///
/// Armed with the controller generation current when advancing started;
/// ticks under an older generation are rejected by the controller.
#[derive(Resource)]
pub struct PlaybackTicker {
    timer: Timer,
    armed: Option<u64>,
}

impl Default for PlaybackTicker {
    fn default() -> Self {
        Self {
            timer: Timer::new(PlaybackSettings::default().tick_interval, TimerMode::Repeating),
            armed: None,
        }
    }
}

impl PlaybackTicker {
    pub fn arm(&mut self, generation: u64, interval: Duration) {
        self.timer = Timer::new(interval, TimerMode::Repeating);
        self.armed = Some(generation);
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Generation the ticker was armed with.
    pub fn armed(&self) -> Option<u64> {
        self.armed
    }
}

fn init_controller(mut commands: Commands, settings: Res<PlaybackSettings>) {
    commands.insert_resource(PlaybackController::new(&settings));
}

fn handle_commands(
    mut commands: MessageReader<PlaybackCommand>,
    mut controller: ResMut<PlaybackController>,
    mut status: ResMut<PlaybackStatus>,
    mut pending: ResMut<PendingTasks>,
    backend: Res<Backend>,
) {
    for command in commands.read() {
        let result = match command {
            PlaybackCommand::Select(run) => {
                if controller.select_run(run.clone()) {
                    status.clear();
                }
                Ok(())
            }
            PlaybackCommand::Plot => controller.plot().map(|ticket| {
                if let Some(ticket) = ticket {
                    pending.spawn_fetch(&backend, ticket);
                }
            }),
            PlaybackCommand::Play => {
                if controller.state() == PlaybackState::Idle && !controller.is_fetching() {
                    controller.plot().map(|ticket| {
                        if let Some(ticket) = ticket {
                            pending.spawn_fetch(&backend, ticket);
                        }
                    })
                } else {
                    controller.play()
                }
            }
            PlaybackCommand::Pause => {
                controller.pause();
                Ok(())
            }
            PlaybackCommand::RevealAll => controller.reveal_all(),
            PlaybackCommand::Refresh => controller.request_trajectory(true).map(|ticket| {
                if let Some(ticket) = ticket {
                    pending.spawn_fetch(&backend, ticket);
                }
            }),
            PlaybackCommand::Reset => match controller.active_run() {
                Some(run) => {
                    pending.spawn_reset(&backend, run.clone());
                    Ok(())
                }
                None => Err(PlaybackError::NoActiveRun),
            },
            PlaybackCommand::Clear => {
                controller.clear();
                status.clear();
                Ok(())
            }
            PlaybackCommand::SetPolicy(policy) => {
                controller.set_policy(*policy);
                Ok(())
            }
            PlaybackCommand::ReloadCatalog => {
                pending.spawn_catalog(&backend);
                Ok(())
            }
        };

        if let Err(err) = result {
            status.report(err);
        }
    }
}

/// Advance the cursor on every elapsed tick while playback is running.
fn advance_playback(
    time: Res<Time>,
    settings: Res<PlaybackSettings>,
    mut ticker: ResMut<PlaybackTicker>,
    mut controller: ResMut<PlaybackController>,
) {
    if controller.state() != PlaybackState::Advancing {
        ticker.disarm();
        return;
    }

    let generation = match ticker.armed() {
        Some(generation) => generation,
        None => {
            ticker.arm(controller.generation(), settings.tick_interval);
            controller.generation()
        }
    };

    ticker.timer.tick(time.delta());
    for _ in 0..ticker.timer.times_finished_this_tick() {
        if !controller.tick(generation, settings.step) {
            // Superseded or finished; re-armed on the next frame if needed
            ticker.disarm();
            break;
        }
    }
}
