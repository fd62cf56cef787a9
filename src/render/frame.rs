//! Mapping from dataset coordinates to plot coordinates.
//!
//! Runs come in arbitrary units and scales. Every dataset is fitted into a
//! square of fixed world size centered on the origin, preserving aspect ratio,
//! so the camera never needs to know what units the backend uses.

use std::sync::Arc;

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::types::TrajectoryDataset;

/// Half side of the square the dataset is fitted into, in world units.
pub const PLOT_HALF_EXTENT: f32 = 400.0;

/// Fraction of the plot square left free around the data.
pub const PLOT_MARGIN: f64 = 0.05;

/// Current dataset-to-world mapping.
#[derive(Resource, Debug, Clone)]
pub struct PlotFrame {
    center: DVec2,
    scale: f64,
    fitted: Option<Arc<TrajectoryDataset>>,
}

impl Default for PlotFrame {
    fn default() -> Self {
        Self {
            center: DVec2::ZERO,
            scale: 1.0,
            fitted: None,
        }
    }
}

impl PlotFrame {
    /// Frame fitting the xy extent of `dataset` into the plot square.
    ///
    /// Degenerate extents (a single point, or all samples on one line through
    /// a point) fall back to unit scale around their center.
    pub fn fit(dataset: &TrajectoryDataset) -> Self {
        let Some((min, max)) = dataset.bounds_xy() else {
            return Self::default();
        };
        let center = (min + max) * 0.5;
        let half = ((max - min) * 0.5).max_element();
        let scale = if half > f64::EPSILON && half.is_finite() {
            PLOT_HALF_EXTENT as f64 * (1.0 - PLOT_MARGIN) / half
        } else {
            1.0
        };
        Self {
            center,
            scale,
            fitted: None,
        }
    }

    pub fn to_world(&self, point: DVec2) -> Vec2 {
        ((point - self.center) * self.scale).as_vec2()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// True if the frame was fitted to this exact dataset.
    pub fn is_fitted_to(&self, dataset: &Arc<TrajectoryDataset>) -> bool {
        self.fitted
            .as_ref()
            .is_some_and(|fitted| Arc::ptr_eq(fitted, dataset))
    }

    /// Refit to `dataset` if it differs from the last one. Returns true on refit.
    pub fn refit(&mut self, dataset: Option<&Arc<TrajectoryDataset>>) -> bool {
        match dataset {
            Some(dataset) if !self.is_fitted_to(dataset) => {
                *self = Self {
                    fitted: Some(Arc::clone(dataset)),
                    ..Self::fit(dataset)
                };
                true
            }
            Some(_) => false,
            None => {
                let changed = self.fitted.is_some();
                *self = Self::default();
                changed
            }
        }
    }
}
