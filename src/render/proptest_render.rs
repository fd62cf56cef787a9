//! Property-based tests for projection and color assignment using proptest.

use std::collections::HashSet;

use proptest::prelude::*;

use super::colors::{PALETTE, color_for, palette_index};
use super::projector::{WindowCap, project};
use crate::test_utils::fixtures;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Window length is `min(cursor, cap)` for every body.
    #[test]
    fn prop_window_length(
        bodies in 1usize..5,
        samples in 0usize..400,
        cursor_frac in 0.0f64..=1.0,
        cap in 1usize..150,
    ) {
        let dataset = fixtures::straight_lines(bodies, samples);
        let cursor = (samples as f64 * cursor_frac).round() as usize;

        let series = project(&dataset, cursor, WindowCap::Samples(cap));

        prop_assert_eq!(series.len(), bodies);
        for s in &series {
            prop_assert_eq!(s.points.len(), cursor.min(cap));
            prop_assert_eq!(s.marker, s.points.last().copied());
        }
    }

    /// The window always ends right before the cursor.
    #[test]
    fn prop_window_is_trailing(
        samples in 1usize..400,
        cursor_frac in 0.01f64..=1.0,
        cap in 1usize..150,
    ) {
        let dataset = fixtures::straight_lines(1, samples);
        let cursor = ((samples as f64 * cursor_frac).ceil() as usize).clamp(1, samples);

        let series = project(&dataset, cursor, WindowCap::Samples(cap));
        let points = &series[0].points;

        // straight_lines puts sample i at x = i
        prop_assert_eq!(points.last().map(|p| p.x), Some((cursor - 1) as f64));
        prop_assert_eq!(points[0].x, cursor.saturating_sub(cap) as f64);
    }

    /// Unbounded windows reveal the full prefix.
    #[test]
    fn prop_unbounded_reveals_prefix(samples in 0usize..300, cursor in 0usize..300) {
        let dataset = fixtures::straight_lines(2, samples);
        let series = project(&dataset, cursor, WindowCap::Unbounded);
        prop_assert!(series.iter().all(|s| s.points.len() == cursor.min(samples)));
    }

    /// Colors are a pure function of (body, total).
    #[test]
    fn prop_color_is_deterministic(total in 1usize..=20, body_frac in 0.0f64..1.0) {
        let body = ((total as f64) * body_frac) as usize;
        prop_assert_eq!(color_for(body, total), color_for(body, total));
        prop_assert!(palette_index(body, total) < PALETTE.len());
    }

    /// Up to palette size, every body gets its own color.
    #[test]
    fn prop_colors_distinct_within_palette(total in 1usize..=PALETTE.len()) {
        let distinct: HashSet<usize> = (0..total).map(|b| palette_index(b, total)).collect();
        prop_assert_eq!(distinct.len(), total);
    }
}
