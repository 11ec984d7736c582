//! Pong core game engine - deterministic, configurable pong simulation

pub mod config;
pub mod frame;
pub mod game;
pub mod geometry;
pub mod physics;
pub mod render;
pub mod scoring;
pub mod types;

pub use config::{Config, ConfigError, Deflection, Preset};
pub use frame::{
    AudioSink, FixedTimestep, FrameInput, InputSource, Orchestrator, Pacing, Renderer,
    TickReport, MAX_CATCH_UP_TICKS,
};
pub use game::Game;
pub use geometry::*;
pub use render::{CellRect, RenderHelper};
pub use scoring::{check_set_won, PointOutcome, Scoreboard};
pub use types::*;
