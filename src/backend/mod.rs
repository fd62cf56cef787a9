//! Contract with the external N-body computation service.
//!
//! The service owns the physics. The client only lists runs, asks for a run's
//! trajectories, and can reset a run back to its initial conditions.

pub mod http;

use serde::Deserialize;

use crate::types::{DatasetError, RunId, TrajectoryDataset};

pub use self::http::HttpBackend;

/// Name of the cookie carrying Django's CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend reads the CSRF token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {code}: {status}")]
    Status { code: u16, status: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid trajectory data: {0}")]
    Dataset(#[from] DatasetError),
}

/// Source of run listings and trajectories.
///
/// Calls block; the playback plugin runs them on the IO task pool.
pub trait TrajectorySource: Send + Sync {
    /// Identifiers of stored NBody configurations.
    fn list_nbody_ids(&self) -> Result<Vec<RunId>, BackendError>;

    /// Identifiers of integration runs that can be played back.
    fn list_run_ids(&self) -> Result<Vec<RunId>, BackendError>;

    /// Compute (or return the already computed) trajectories of a run.
    fn fetch_trajectories(&self, run: &RunId) -> Result<TrajectoryDataset, BackendError>;

    /// Drop the run's computed orbits, keeping only its initial conditions.
    fn reset_run(&self, run: &RunId) -> Result<(), BackendError>;
}

/// Body of a successful `integrator-update` response.
///
/// The backend echoes the whole integrator row; only the positions matter here.
#[derive(Deserialize, Debug)]
pub struct IntegratorUpdate {
    pub position_orbits: Vec<Vec<[f64; 3]>>,
}

impl IntegratorUpdate {
    pub fn into_dataset(self) -> Result<TrajectoryDataset, DatasetError> {
        TrajectoryDataset::from_triples(self.position_orbits)
    }
}

/// Decode an `integrator-update` body into a dataset.
pub fn parse_trajectories(body: &str) -> Result<TrajectoryDataset, BackendError> {
    let update: IntegratorUpdate = serde_json::from_str(body)?;
    Ok(update.into_dataset()?)
}

/// Decode an id listing, sorted the way the run selector shows it.
pub fn parse_id_list(body: &str) -> Result<Vec<RunId>, BackendError> {
    let mut ids: Vec<RunId> = serde_json::from_str(body)?;
    ids.sort();
    Ok(ids)
}

/// Look up a cookie value in a `name=value; other=value` string.
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
}
