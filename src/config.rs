//! Command line and environment configuration.
//!
//! Parsed once at startup and split into the resources the plugins read.

use std::time::Duration;

use bevy::prelude::*;
use clap::{Parser, ValueEnum};

use crate::types::{
    DEFAULT_TICK_INTERVAL_SECS, DEFAULT_TICK_STEP, DEFAULT_WINDOW_CAP, EmptyRunId, RunId,
};

/// Base URL of a locally running backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// How a loaded trajectory is revealed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackPolicy {
    /// Show the whole trajectory at once.
    #[default]
    #[value(name = "full")]
    FullReveal,
    /// Reveal the trajectory tick by tick, trailing a bounded window.
    #[value(name = "incremental")]
    Incremental,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "nbody-plotter", version, about = "Play back N-body integration runs")]
pub struct Cli {
    /// Base URL of the N-body API.
    #[arg(long, env = "NBODY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Cookies to send with POST requests, e.g. "csrftoken=abc; sessionid=def".
    #[arg(long, env = "NBODY_COOKIES")]
    pub cookies: Option<String>,

    /// Playback policy.
    #[arg(long, value_enum, default_value_t = PlaybackPolicy::FullReveal)]
    pub mode: PlaybackPolicy,

    /// Seconds between playback ticks.
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_SECS)]
    pub tick_interval: f32,

    /// Samples revealed per tick.
    #[arg(long, default_value_t = DEFAULT_TICK_STEP)]
    pub step: usize,

    /// Samples kept per body in incremental mode.
    #[arg(long, default_value_t = DEFAULT_WINDOW_CAP)]
    pub window: usize,

    /// Run to select on startup instead of the first listed one.
    #[arg(long)]
    pub run: Option<String>,
}

impl Cli {
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api_url.clone(),
            cookies: self.cookies.clone().filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            policy: self.mode,
            tick_interval: Duration::from_secs_f32(self.tick_interval.max(0.001)),
            step: self.step.max(1),
            window_cap: self.window.max(1),
        }
    }

    pub fn initial_run(&self) -> Result<Option<RunId>, EmptyRunId> {
        self.run.as_deref().map(str::parse).transpose()
    }
}

/// Where the backend lives and how to authenticate against it.
#[derive(Resource, Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub cookies: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            cookies: None,
        }
    }
}

/// Playback cadence and windowing.
#[derive(Resource, Clone, Debug)]
pub struct PlaybackSettings {
    pub policy: PlaybackPolicy,
    /// Time between two ticks.
    pub tick_interval: Duration,
    /// Samples revealed per tick.
    pub step: usize,
    /// Sliding window length in incremental mode.
    pub window_cap: usize,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            policy: PlaybackPolicy::default(),
            tick_interval: Duration::from_secs_f32(DEFAULT_TICK_INTERVAL_SECS),
            step: DEFAULT_TICK_STEP,
            window_cap: DEFAULT_WINDOW_CAP,
        }
    }
}
