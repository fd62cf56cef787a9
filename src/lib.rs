//! N-body trajectory plotter
//!
//! A library crate providing the trajectory fetching and playback engine
//! for testing and integration purposes.

pub mod backend;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod playback;
pub mod render;
pub mod store;
pub mod types;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
