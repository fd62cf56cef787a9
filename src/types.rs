//! Core data types shared by the playback engine: run identifiers and
//! trajectory datasets.

use std::fmt;
use std::str::FromStr;

use bevy::math::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Samples kept in the sliding window during incremental playback.
pub const DEFAULT_WINDOW_CAP: usize = 100;

/// Seconds between two playback ticks.
pub const DEFAULT_TICK_INTERVAL_SECS: f32 = 0.5;

/// Samples revealed per playback tick.
pub const DEFAULT_TICK_STEP: usize = 1;

/// Handle naming one integration run on the backend.
///
/// The backend hands out integer primary keys, but the identifier is treated
/// as opaque: any non-empty string is accepted too.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunId {
    Number(u64),
    Name(String),
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunId::Number(n) => write!(f, "{n}"),
            RunId::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RunId {
    fn from(n: u64) -> Self {
        RunId::Number(n)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("run identifier must not be empty")]
pub struct EmptyRunId;

impl FromStr for RunId {
    type Err = EmptyRunId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyRunId);
        }
        Ok(s.parse::<u64>()
            .map(RunId::Number)
            .unwrap_or_else(|_| RunId::Name(s.to_string())))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("body {body} has {got} samples, expected {expected}")]
    LengthMismatch {
        body: usize,
        expected: usize,
        got: usize,
    },
}

/// Precomputed positions of every body for one run.
///
/// Body order is the insertion order of the backend response and all series
/// share the same length (`orbit_size`). Datasets are immutable once built;
/// a refresh produces a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrajectoryDataset {
    bodies: Vec<Vec<DVec3>>,
    orbit_size: usize,
}

impl TrajectoryDataset {
    /// Build a dataset, rejecting series of unequal length.
    pub fn new(bodies: Vec<Vec<DVec3>>) -> Result<Self, DatasetError> {
        let orbit_size = bodies.first().map_or(0, Vec::len);
        if let Some((body, series)) = bodies
            .iter()
            .enumerate()
            .find(|(_, series)| series.len() != orbit_size)
        {
            return Err(DatasetError::LengthMismatch {
                body,
                expected: orbit_size,
                got: series.len(),
            });
        }
        Ok(Self { bodies, orbit_size })
    }

    /// Build a dataset from raw `[x, y, z]` triples as sent over the wire.
    pub fn from_triples(raw: Vec<Vec<[f64; 3]>>) -> Result<Self, DatasetError> {
        Self::new(
            raw.into_iter()
                .map(|series| series.into_iter().map(DVec3::from_array).collect())
                .collect(),
        )
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of samples in every body series.
    pub fn orbit_size(&self) -> usize {
        self.orbit_size
    }

    /// True when there is nothing to draw (no bodies or no samples).
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() || self.orbit_size == 0
    }

    pub fn body(&self, index: usize) -> Option<&[DVec3]> {
        self.bodies.get(index).map(Vec::as_slice)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &[DVec3]> {
        self.bodies.iter().map(Vec::as_slice)
    }

    /// Axis-aligned bounds of every sample projected onto the xy plane.
    pub fn bounds_xy(&self) -> Option<(DVec2, DVec2)> {
        let mut points = self.bodies.iter().flatten().map(|p| p.truncate());
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}
