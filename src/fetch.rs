//! Fetch coordination: cache de-duplication and last-request-wins.
//!
//! Re-plotting a run that is already stored must not reach the backend, since
//! every `integrator-update` call may trigger a recomputation there. When the
//! user switches runs faster than the backend answers, only the latest request
//! may land in the store.

use std::sync::Arc;

use bevy::log::{debug, info};

use crate::backend::{BackendError, TrajectorySource};
use crate::playback::PlaybackError;
use crate::store::TrajectoryStore;
use crate::types::{RunId, TrajectoryDataset};

/// Receipt for one outstanding request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub run: RunId,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What to do to obtain a run's trajectories.
#[derive(Debug)]
pub enum FetchPlan {
    /// Already stored; no request needed.
    Cached(Arc<TrajectoryDataset>),
    /// Issue a request and hand the result back to [`FetchCoordinator::complete`].
    Fetch(FetchTicket),
}

/// Result of applying a completed request.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(Arc<TrajectoryDataset>),
    /// A newer request (or a cancel) overtook this one; nothing was changed.
    Superseded,
    Failed(PlaybackError),
}

#[derive(Debug, Default)]
pub struct FetchCoordinator {
    /// Generation of the most recent plan or cancel.
    latest: u64,
    in_flight: Option<FetchTicket>,
}

impl FetchCoordinator {
    /// Decide whether `run` needs a request. `force` bypasses the cache.
    ///
    /// Every call supersedes whatever was planned before it, including when
    /// the answer is a cache hit.
    pub fn plan(&mut self, run: &RunId, store: &TrajectoryStore, force: bool) -> FetchPlan {
        self.latest += 1;

        if !force {
            if let Some(dataset) = store.cached(run) {
                debug!("Run {run}: using stored trajectories");
                self.in_flight = None;
                return FetchPlan::Cached(dataset);
            }
        }

        let ticket = FetchTicket {
            run: run.clone(),
            generation: self.latest,
        };
        self.in_flight = Some(ticket.clone());
        FetchPlan::Fetch(ticket)
    }

    /// Apply a finished request. Only the latest ticket may touch the store.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<TrajectoryDataset, BackendError>,
        store: &mut TrajectoryStore,
    ) -> FetchOutcome {
        if ticket.generation != self.latest {
            debug!(
                "Run {}: discarding superseded response (generation {} < {})",
                ticket.run, ticket.generation, self.latest
            );
            return FetchOutcome::Superseded;
        }
        self.in_flight = None;

        match result {
            Ok(dataset) => {
                info!(
                    "Run {}: loaded {} bodies x {} samples",
                    ticket.run,
                    dataset.body_count(),
                    dataset.orbit_size()
                );
                let dataset = Arc::new(dataset);
                store.replace(ticket.run.clone(), Arc::clone(&dataset));
                FetchOutcome::Loaded(dataset)
            }
            Err(err) => FetchOutcome::Failed(err.into()),
        }
    }

    /// Supersede any outstanding request.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            debug!("Run {}: request cancelled", ticket.run);
        }
        self.latest += 1;
    }

    /// Run of the request currently awaited, if any.
    pub fn in_flight(&self) -> Option<&RunId> {
        self.in_flight.as_ref().map(|ticket| &ticket.run)
    }

    /// Synchronous round trip: cached dataset, or one request to `source`.
    pub fn ensure_trajectory(
        &mut self,
        source: &dyn TrajectorySource,
        store: &mut TrajectoryStore,
        run: &RunId,
    ) -> Result<Arc<TrajectoryDataset>, PlaybackError> {
        match self.plan(run, store, false) {
            FetchPlan::Cached(dataset) => Ok(dataset),
            FetchPlan::Fetch(ticket) => {
                let result = source.fetch_trajectories(&ticket.run);
                match self.complete(&ticket, result, store) {
                    FetchOutcome::Loaded(dataset) => Ok(dataset),
                    FetchOutcome::Failed(err) => Err(err),
                    // Nothing can overtake a synchronous call
                    FetchOutcome::Superseded => Err(PlaybackError::FetchFailed(format!(
                        "request for run {run} was superseded"
                    ))),
                }
            }
        }
    }
}
