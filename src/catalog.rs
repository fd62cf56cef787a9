//! Runs available on the backend.

use bevy::prelude::*;

use crate::types::RunId;

#[derive(Resource, Default, Debug)]
pub struct RunCatalog {
    runs: Vec<RunId>,
    nbody_ids: Vec<RunId>,
    loading: bool,
}

impl RunCatalog {
    /// Integration runs, in ascending order.
    pub fn runs(&self) -> &[RunId] {
        &self.runs
    }

    /// Body-set ids, in ascending order.
    pub fn nbody_ids(&self) -> &[RunId] {
        &self.nbody_ids
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn replace(&mut self, mut runs: Vec<RunId>, mut nbody_ids: Vec<RunId>) {
        runs.sort();
        runs.dedup();
        nbody_ids.sort();
        nbody_ids.dedup();
        self.runs = runs;
        self.nbody_ids = nbody_ids;
    }

    pub fn contains(&self, run: &RunId) -> bool {
        self.runs.binary_search(run).is_ok()
    }

    /// Run to activate after loading: `preferred` if listed, else the first run.
    pub fn default_selection(&self, preferred: Option<&RunId>) -> Option<RunId> {
        preferred
            .filter(|run| self.contains(run))
            .or_else(|| self.runs.first())
            .cloned()
    }
}
