//! Most recently fetched trajectory dataset, keyed by its run.

use std::sync::Arc;

use crate::types::{RunId, TrajectoryDataset};

/// Holds at most one dataset together with the run it belongs to.
///
/// Contents are replaced wholesale; readers holding the previous `Arc` keep a
/// complete, consistent dataset.
#[derive(Debug, Default)]
pub struct TrajectoryStore {
    entry: Option<(RunId, Arc<TrajectoryDataset>)>,
}

impl TrajectoryStore {
    /// The stored dataset if it belongs to `run` and has something to show.
    pub fn cached(&self, run: &RunId) -> Option<Arc<TrajectoryDataset>> {
        match &self.entry {
            Some((stored, dataset)) if stored == run && !dataset.is_empty() => {
                Some(Arc::clone(dataset))
            }
            _ => None,
        }
    }

    pub fn replace(&mut self, run: RunId, dataset: Arc<TrajectoryDataset>) {
        self.entry = Some((run, dataset));
    }

    /// Forget the dataset if it belongs to `run`.
    pub fn invalidate(&mut self, run: &RunId) {
        if self.run() == Some(run) {
            self.entry = None;
        }
    }

    pub fn run(&self) -> Option<&RunId> {
        self.entry.as_ref().map(|(run, _)| run)
    }

    pub fn dataset(&self) -> Option<&Arc<TrajectoryDataset>> {
        self.entry.as_ref().map(|(_, dataset)| dataset)
    }
}
