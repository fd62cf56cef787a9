//! Test utilities for the playback engine.
//!
//! Provides dataset fixtures and a scripted [`TrajectorySource`] that counts
//! the requests it receives.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::math::DVec3;

use crate::backend::{BackendError, TrajectorySource};
use crate::types::{RunId, TrajectoryDataset};

/// Fixtures for creating test datasets.
pub mod fixtures {
    use super::*;

    /// Two bodies moving apart along the diagonal, three samples each.
    pub fn diverging_pair() -> TrajectoryDataset {
        TrajectoryDataset::from_triples(vec![
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 2.0, 0.0]],
            vec![[0.0, 0.0, 0.0], [-1.0, -1.0, 0.0], [-2.0, -2.0, 0.0]],
        ])
        .expect("fixture series have equal length")
    }

    /// `bodies` series of `samples` points; sample `i` of body `b` sits at
    /// `(i, b, i + b)` so windows are easy to check by value.
    pub fn straight_lines(bodies: usize, samples: usize) -> TrajectoryDataset {
        TrajectoryDataset::new(
            (0..bodies)
                .map(|b| {
                    (0..samples)
                        .map(|i| DVec3::new(i as f64, b as f64, (i + b) as f64))
                        .collect()
                })
                .collect(),
        )
        .expect("fixture series have equal length")
    }
}

/// Scripted source: per-run responses, with a request counter.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<RunId, Result<TrajectoryDataset, u16>>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn with_run(self, run: impl Into<RunId>, dataset: TrajectoryDataset) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(run.into(), Ok(dataset));
        self
    }

    pub fn with_failure(self, run: impl Into<RunId>, code: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(run.into(), Err(code));
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl TrajectorySource for ScriptedSource {
    fn list_nbody_ids(&self) -> Result<Vec<RunId>, BackendError> {
        Ok(vec![RunId::Number(1)])
    }

    fn list_run_ids(&self) -> Result<Vec<RunId>, BackendError> {
        let mut ids: Vec<RunId> = self.responses.lock().unwrap().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn fetch_trajectories(&self, run: &RunId) -> Result<TrajectoryDataset, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().get(run) {
            Some(Ok(dataset)) => Ok(dataset.clone()),
            Some(Err(code)) => Err(BackendError::Status {
                code: *code,
                status: "Internal Server Error".to_string(),
            }),
            None => Err(BackendError::Status {
                code: 404,
                status: "Not Found".to_string(),
            }),
        }
    }

    fn reset_run(&self, _run: &RunId) -> Result<(), BackendError> {
        Ok(())
    }
}
