//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No audio, rendering or platform dependencies (those are events out)

pub mod layout;
pub mod pool;
pub mod scoring;
pub mod state;
pub mod summary;
pub mod tick;

pub use layout::{BoardGeometry, PlacedTile, TileFootprint, layout_tiles, min_area_height};
pub use pool::{Candidate, CandidatePool, SetupError, sample};
pub use state::{
    Difficulty, DifficultyProfile, HandleId, Limit, Session, SessionEvent, SessionPhase,
    SoundEffect, TimerLevel,
};
pub use summary::{Outcome, Summary, accuracy_percent, format_elapsed, result_message, summarize};
pub use tick::{TickInput, abandon, tick};
