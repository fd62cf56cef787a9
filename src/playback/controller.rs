//! Playback state machine.
//!
//! The controller owns everything mutable about playback: the active run, the
//! trajectory store, the fetch coordinator and the cursor. Each activation of
//! a run gets a new generation; ticks carry the generation they were armed
//! with and are ignored once it is stale.

use std::sync::Arc;

use bevy::prelude::*;

use super::PlaybackError;
use super::cursor::PlaybackCursor;
use crate::backend::BackendError;
use crate::config::{PlaybackPolicy, PlaybackSettings};
use crate::fetch::{FetchCoordinator, FetchOutcome, FetchPlan, FetchTicket};
use crate::render::projector::{ProjectedSeries, WindowCap, project};
use crate::store::TrajectoryStore;
use crate::types::{RunId, TrajectoryDataset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No dataset loaded for the active run.
    #[default]
    Idle,
    /// Dataset loaded, not advancing.
    Ready,
    /// Cursor moving toward the end on every tick.
    Advancing,
    /// Cursor at the end of the dataset.
    Complete,
}

/// Action to run once the active run's dataset arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Play,
    RevealAll,
}

#[derive(Resource, Debug)]
pub struct PlaybackController {
    policy: PlaybackPolicy,
    window_cap: usize,
    state: PlaybackState,
    active: Option<RunId>,
    generation: u64,
    dataset: Option<Arc<TrajectoryDataset>>,
    cursor: PlaybackCursor,
    store: TrajectoryStore,
    fetch: FetchCoordinator,
    pending: Option<Pending>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(&PlaybackSettings::default())
    }
}

impl PlaybackController {
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            policy: settings.policy,
            window_cap: settings.window_cap.max(1),
            state: PlaybackState::Idle,
            active: None,
            generation: 0,
            dataset: None,
            cursor: PlaybackCursor::default(),
            store: TrajectoryStore::default(),
            fetch: FetchCoordinator::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn policy(&self) -> PlaybackPolicy {
        self.policy
    }

    pub fn active_run(&self) -> Option<&RunId> {
        self.active.as_ref()
    }

    /// Generation of the current run activation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn dataset(&self) -> Option<&Arc<TrajectoryDataset>> {
        self.dataset.as_ref()
    }

    pub fn store(&self) -> &TrajectoryStore {
        &self.store
    }

    /// True while a request for the active run is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.active.is_some() && self.fetch.in_flight() == self.active.as_ref()
    }

    /// Window applied to the visible series under the current policy.
    pub fn window(&self) -> WindowCap {
        match self.policy {
            PlaybackPolicy::FullReveal => WindowCap::Unbounded,
            PlaybackPolicy::Incremental => WindowCap::Samples(self.window_cap),
        }
    }

    /// Projected series for the revealed part of the dataset.
    pub fn visible_series(&self) -> Vec<ProjectedSeries> {
        self.dataset
            .as_deref()
            .map(|dataset| project(dataset, self.cursor.position(), self.window()))
            .unwrap_or_default()
    }

    /// Make `run` the active run. Returns false if it already was.
    pub fn select_run(&mut self, run: RunId) -> bool {
        if self.active.as_ref() == Some(&run) {
            return false;
        }
        info!("Active run: {run}");
        self.active = Some(run);
        self.reset_to_idle();
        true
    }

    /// Drop the active run and stop playback.
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            info!("Playback cleared");
        }
        self.reset_to_idle();
    }

    fn reset_to_idle(&mut self) {
        self.generation += 1;
        self.state = PlaybackState::Idle;
        self.dataset = None;
        self.cursor = PlaybackCursor::default();
        self.pending = None;
        self.fetch.cancel();
    }

    /// Change the reveal policy. A loaded dataset is re-armed as if freshly loaded.
    pub fn set_policy(&mut self, policy: PlaybackPolicy) {
        if self.policy == policy {
            return;
        }
        self.policy = policy;
        if self.dataset.is_some() {
            self.cursor = self.initial_cursor();
            self.state = PlaybackState::Ready;
        }
    }

    fn initial_cursor(&self) -> PlaybackCursor {
        let len = self.dataset.as_ref().map_or(0, |d| d.orbit_size());
        match self.policy {
            PlaybackPolicy::FullReveal => PlaybackCursor::end(len),
            PlaybackPolicy::Incremental => PlaybackCursor::start(len),
        }
    }

    /// Obtain the active run's dataset: from the store, or via a new request.
    ///
    /// Returns the ticket the caller must fetch and pass to
    /// [`finish_fetch`](Self::finish_fetch), or `None` when nothing needs to be
    /// fetched. A repeated non-forced call while the run's request is still
    /// outstanding does not issue a second one.
    pub fn request_trajectory(&mut self, force: bool) -> Result<Option<FetchTicket>, PlaybackError> {
        let run = self.active.clone().ok_or(PlaybackError::NoActiveRun)?;
        if !force && self.is_fetching() {
            return Ok(None);
        }
        match self.fetch.plan(&run, &self.store, force) {
            FetchPlan::Cached(dataset) => {
                self.load(dataset);
                Ok(None)
            }
            FetchPlan::Fetch(ticket) => {
                info!("Run {run}: requesting trajectories");
                Ok(Some(ticket))
            }
        }
    }

    /// "Plot!": make sure the dataset is loaded, then play it.
    ///
    /// With a dataset already on screen and a refresh outstanding, plays the
    /// loaded dataset instead of waiting for the refresh.
    pub fn plot(&mut self) -> Result<Option<FetchTicket>, PlaybackError> {
        if self.active.is_none() {
            return Err(PlaybackError::NoActiveRun);
        }
        if self.dataset.is_some() && self.is_fetching() {
            self.start();
            return Ok(None);
        }
        self.pending = Some(Pending::Play);
        self.request_trajectory(false)
    }

    /// Apply a finished request.
    ///
    /// Returns `Ok(true)` when the dataset was loaded, `Ok(false)` when the
    /// response was superseded. On error the store and state are untouched.
    pub fn finish_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<TrajectoryDataset, BackendError>,
    ) -> Result<bool, PlaybackError> {
        match self.fetch.complete(ticket, result, &mut self.store) {
            FetchOutcome::Loaded(dataset) if self.active.as_ref() == Some(&ticket.run) => {
                self.load(dataset);
                Ok(true)
            }
            FetchOutcome::Loaded(_) | FetchOutcome::Superseded => Ok(false),
            FetchOutcome::Failed(err) => {
                self.pending = None;
                Err(err)
            }
        }
    }

    fn load(&mut self, dataset: Arc<TrajectoryDataset>) {
        let unchanged = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if !unchanged {
            self.dataset = Some(dataset);
            self.cursor = self.initial_cursor();
            self.state = PlaybackState::Ready;
        }
        match self.pending.take() {
            Some(Pending::Play) => self.start(),
            Some(Pending::RevealAll) => self.finish(),
            None => {}
        }
    }

    /// Start (or resume) revealing the trajectory under the current policy.
    ///
    /// With no dataset yet, the request is remembered and honoured on load.
    /// Playing while already advancing does nothing.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.active.is_none() {
            return Err(PlaybackError::NoActiveRun);
        }
        match self.state {
            PlaybackState::Idle => self.pending = Some(Pending::Play),
            PlaybackState::Advancing => {}
            PlaybackState::Ready | PlaybackState::Complete => self.start(),
        }
        Ok(())
    }

    fn start(&mut self) {
        match self.policy {
            PlaybackPolicy::FullReveal => self.finish(),
            PlaybackPolicy::Incremental => {
                if self.cursor.at_end() {
                    self.cursor.rewind();
                }
                self.state = if self.cursor.at_end() {
                    PlaybackState::Complete
                } else {
                    PlaybackState::Advancing
                };
            }
        }
    }

    fn finish(&mut self) {
        self.cursor.jump_to_end();
        self.state = PlaybackState::Complete;
    }

    /// Reveal the whole trajectory now, whatever the policy.
    pub fn reveal_all(&mut self) -> Result<(), PlaybackError> {
        if self.active.is_none() {
            return Err(PlaybackError::NoActiveRun);
        }
        if self.state == PlaybackState::Idle {
            self.pending = Some(Pending::RevealAll);
        } else {
            self.finish();
        }
        Ok(())
    }

    /// Stop advancing, keeping the cursor where it is.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Advancing {
            self.state = PlaybackState::Ready;
        }
        if self.pending == Some(Pending::Play) {
            self.pending = None;
        }
    }

    /// Advance one tick armed under `generation`.
    ///
    /// Returns false, without touching anything, when the generation is stale
    /// or playback is not advancing.
    pub fn tick(&mut self, generation: u64, step: usize) -> bool {
        if generation != self.generation || self.state != PlaybackState::Advancing {
            return false;
        }
        self.cursor.advance(step.max(1));
        if self.cursor.at_end() {
            self.state = PlaybackState::Complete;
        }
        true
    }

    /// Forget stored trajectories of `run` after the backend reset it.
    pub fn invalidate(&mut self, run: &RunId) {
        self.store.invalidate(run);
        if self.active.as_ref() == Some(run) {
            self.reset_to_idle();
        }
    }
}
