//! Backend requests running on the IO task pool.
//!
//! Backend calls block, so each one runs as its own task and is polled once
//! per frame. Results are applied through the controller, which decides
//! whether they still matter.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task, block_on, futures_lite::future};

use super::{Backend, InitialRun, PlaybackController, PlaybackStatus};
use crate::backend::BackendError;
use crate::catalog::RunCatalog;
use crate::fetch::FetchTicket;
use crate::types::{RunId, TrajectoryDataset};

/// Run ids and body-set ids, as listed by the backend.
type Listing = (Vec<RunId>, Vec<RunId>);

/// Outstanding backend requests.
#[derive(Resource, Default)]
pub struct PendingTasks {
    fetches: Vec<(FetchTicket, Task<Result<TrajectoryDataset, BackendError>>)>,
    resets: Vec<(RunId, Task<Result<(), BackendError>>)>,
    catalog: Option<Task<Result<Listing, BackendError>>>,
}

impl PendingTasks {
    pub fn spawn_fetch(&mut self, backend: &Backend, ticket: FetchTicket) {
        let source = backend.0.clone();
        let run = ticket.run.clone();
        let task = IoTaskPool::get().spawn(async move { source.fetch_trajectories(&run) });
        self.fetches.push((ticket, task));
    }

    pub fn spawn_reset(&mut self, backend: &Backend, run: RunId) {
        let source = backend.0.clone();
        let target = run.clone();
        let task = IoTaskPool::get().spawn(async move { source.reset_run(&target) });
        self.resets.push((run, task));
    }

    /// Request the run listing. A listing already in flight is replaced.
    pub fn spawn_catalog(&mut self, backend: &Backend) {
        let source = backend.0.clone();
        let task = IoTaskPool::get().spawn(async move {
            let runs = source.list_run_ids()?;
            let nbody_ids = source.list_nbody_ids()?;
            Ok((runs, nbody_ids))
        });
        self.catalog = Some(task);
    }

    /// Number of requests not yet applied.
    pub fn outstanding(&self) -> usize {
        self.fetches.len() + self.resets.len() + usize::from(self.catalog.is_some())
    }
}

pub(super) fn load_catalog(
    mut pending: ResMut<PendingTasks>,
    mut catalog: ResMut<RunCatalog>,
    backend: Res<Backend>,
) {
    catalog.set_loading(true);
    pending.spawn_catalog(&backend);
}

pub(super) fn poll_catalog(
    mut pending: ResMut<PendingTasks>,
    mut catalog: ResMut<RunCatalog>,
    mut controller: ResMut<PlaybackController>,
    mut status: ResMut<PlaybackStatus>,
    initial: Option<Res<InitialRun>>,
) {
    let Some(task) = pending.catalog.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(task)) else {
        catalog.set_loading(true);
        return;
    };
    pending.catalog = None;
    catalog.set_loading(false);

    match result {
        Ok((runs, nbody_ids)) => {
            info!("Backend lists {} runs, {} body sets", runs.len(), nbody_ids.len());
            catalog.replace(runs, nbody_ids);

            let active_listed = controller
                .active_run()
                .is_some_and(|run| catalog.contains(run));
            if active_listed {
                return;
            }
            let preferred = initial.as_ref().and_then(|initial| initial.0.as_ref());
            if let Some(run) = preferred.filter(|run| !catalog.contains(run)) {
                warn!("Run {run} is not listed by the backend");
            }
            match catalog.default_selection(preferred) {
                Some(run) => {
                    controller.select_run(run);
                }
                None => status.note("No runs available"),
            }
        }
        Err(err) => status.report(err.into()),
    }
}

pub(super) fn poll_fetches(
    mut pending: ResMut<PendingTasks>,
    mut controller: ResMut<PlaybackController>,
    mut status: ResMut<PlaybackStatus>,
) {
    let mut finished = Vec::new();
    pending
        .fetches
        .retain_mut(|(ticket, task)| match block_on(future::poll_once(task)) {
            Some(result) => {
                finished.push((ticket.clone(), result));
                false
            }
            None => true,
        });

    for (ticket, result) in finished {
        match controller.finish_fetch(&ticket, result) {
            Ok(true) => status.clear(),
            Ok(false) => {}
            Err(err) => status.report(err),
        }
    }
}

pub(super) fn poll_resets(
    mut pending: ResMut<PendingTasks>,
    mut controller: ResMut<PlaybackController>,
    mut status: ResMut<PlaybackStatus>,
) {
    let mut finished = Vec::new();
    pending
        .resets
        .retain_mut(|(run, task)| match block_on(future::poll_once(task)) {
            Some(result) => {
                finished.push((run.clone(), result));
                false
            }
            None => true,
        });

    for (run, result) in finished {
        match result {
            Ok(()) => {
                info!("Run {run}: reset on the backend");
                controller.invalidate(&run);
                status.note(format!("Run {run} reset"));
            }
            Err(err) => status.report(err.into()),
        }
    }
}
