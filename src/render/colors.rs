//! Per-body colors.
//!
//! Bodies pick evenly spaced entries from a fixed diverging palette, so a
//! two-body run gets both ends of the scale and a thirteen-body run gets every
//! entry. The choice depends only on `(body, total)` and stays stable across
//! playback ticks.

use bevy::prelude::*;

/// Diverging green to red scale.
pub const PALETTE: [[u8; 3]; 13] = [
    [0x00, 0x87, 0x6c],
    [0x3d, 0x9a, 0x70],
    [0x64, 0xad, 0x73],
    [0x89, 0xbf, 0x77],
    [0xaf, 0xd1, 0x7c],
    [0xd6, 0xe1, 0x84],
    [0xff, 0xf1, 0x8f],
    [0xfd, 0xd5, 0x76],
    [0xfb, 0xb8, 0x62],
    [0xf5, 0x9b, 0x56],
    [0xee, 0x7d, 0x4f],
    [0xe3, 0x5e, 0x4e],
    [0xd4, 0x3d, 0x51],
];

/// Palette entry for `body` out of `total` bodies.
///
/// Step is `floor((P - 1) / (total - 1))`. Past `P` bodies the step bottoms
/// out at 1 and colors cycle.
pub fn palette_index(body: usize, total: usize) -> usize {
    if total <= 1 {
        return 0;
    }
    let step = ((PALETTE.len() - 1) / (total - 1)).max(1);
    (body * step) % PALETTE.len()
}

/// Raw RGB of a body's color, for UI widgets.
pub fn legend_rgb(body: usize, total: usize) -> [u8; 3] {
    PALETTE[palette_index(body, total)]
}

pub fn color_for(body: usize, total: usize) -> Color {
    let [r, g, b] = legend_rgb(body, total);
    Color::srgb_u8(r, g, b)
}
