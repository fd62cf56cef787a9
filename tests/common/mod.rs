//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bevy::math::DVec3;
use nbody_plotter::backend::{BackendError, TrajectorySource};
use nbody_plotter::types::{RunId, TrajectoryDataset};

/// Two bodies moving apart along the diagonal, three samples each.
pub fn diverging_pair() -> TrajectoryDataset {
    TrajectoryDataset::from_triples(vec![
        vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 2.0, 0.0]],
        vec![[0.0, 0.0, 0.0], [-1.0, -1.0, 0.0], [-2.0, -2.0, 0.0]],
    ])
    .expect("equal lengths")
}

/// Sample `i` of body `b` sits at `(i, b, i + b)`.
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
    .expect("equal lengths")
}

enum Response {
    Dataset(TrajectoryDataset),
    Status(u16, &'static str),
}

/// In-memory backend counting the calls it receives.
#[derive(Default)]
pub struct MockBackend {
    runs: Mutex<HashMap<RunId, Response>>,
    delays: Mutex<HashMap<RunId, Duration>>,
    fetches: AtomicUsize,
    resets: AtomicUsize,
}

impl MockBackend {
    pub fn with_run(self, run: u64, dataset: TrajectoryDataset) -> Self {
        self.runs
            .lock()
            .unwrap()
            .insert(RunId::Number(run), Response::Dataset(dataset));
        self
    }

    pub fn with_status(self, run: u64, code: u16, reason: &'static str) -> Self {
        self.runs
            .lock()
            .unwrap()
            .insert(RunId::Number(run), Response::Status(code, reason));
        self
    }

    /// Delay every fetch of `run`.
    pub fn with_delay(self, run: u64, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(RunId::Number(run), delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl TrajectorySource for MockBackend {
    fn list_nbody_ids(&self) -> Result<Vec<RunId>, BackendError> {
        Ok(vec![RunId::Number(1)])
    }

    fn list_run_ids(&self) -> Result<Vec<RunId>, BackendError> {
        let mut ids: Vec<RunId> = self.runs.lock().unwrap().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn fetch_trajectories(&self, run: &RunId) -> Result<TrajectoryDataset, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(run).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        match self.runs.lock().unwrap().get(run) {
            Some(Response::Dataset(dataset)) => Ok(dataset.clone()),
            Some(Response::Status(code, reason)) => Err(BackendError::Status {
                code: *code,
                status: reason.to_string(),
            }),
            None => Err(BackendError::Status {
                code: 404,
                status: "Not Found".to_string(),
            }),
        }
    }

    fn reset_run(&self, _run: &RunId) -> Result<(), BackendError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
