//! Projection of the revealed trajectory window onto the xy plane.
//!
//! For every body the window is `[max(0, cursor - cap), cursor)`. The z
//! component is dropped: the plot shows the orbital plane.

use bevy::math::DVec2;

use crate::types::TrajectoryDataset;

/// Maximum number of trailing samples shown per body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowCap {
    Unbounded,
    Samples(usize),
}

impl WindowCap {
    /// First sample index of the window ending at `cursor`.
    pub fn window_start(self, cursor: usize) -> usize {
        match self {
            WindowCap::Unbounded => 0,
            WindowCap::Samples(cap) => cursor.saturating_sub(cap),
        }
    }
}

/// Visible part of one body's trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedSeries {
    /// Index of the body in the dataset.
    pub body: usize,
    /// Polyline through the window, oldest sample first.
    pub points: Vec<DVec2>,
    /// Current position: the last sample of the window.
    pub marker: Option<DVec2>,
}

/// Project the window ending at `cursor` for every body.
///
/// A cursor beyond the dataset is clamped to its length. A cursor of 0 yields
/// one empty series per body.
pub fn project(dataset: &TrajectoryDataset, cursor: usize, cap: WindowCap) -> Vec<ProjectedSeries> {
    let end = cursor.min(dataset.orbit_size());
    let start = cap.window_start(end);

    dataset
        .bodies()
        .enumerate()
        .map(|(body, samples)| {
            let points: Vec<DVec2> = samples[start..end].iter().map(|p| p.truncate()).collect();
            ProjectedSeries {
                body,
                marker: points.last().copied(),
                points,
            }
        })
        .collect()
}

/// Legend name of a body, numbered from 1.
pub fn orbit_label(body: usize) -> String {
    format!("Orbit {}", body + 1)
}
