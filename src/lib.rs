//! Karuta - A timed card-matching game engine
//!
//! Core modules:
//! - `sim`: Deterministic session logic (question flow, scoring, tile layout)
//! - `audio`: Narration and sound-effect collaborator seams
//! - `catalog`: Candidate dataset loading
//! - `driver`: Host loop wiring a session to its collaborators
//! - `settings`: Player preferences and difficulty selection

pub mod audio;
pub mod catalog;
pub mod driver;
pub mod settings;
pub mod sim;

pub use driver::Driver;
pub use settings::Settings;
pub use sim::{Difficulty, DifficultyProfile, Limit, Session, SessionPhase, Summary};

/// Game configuration constants
pub mod consts {
    /// Points for a correct pick before the time bonus
    pub const CORRECT_BASE_POINTS: i64 = 100;
    /// Bonus points per remaining second on a correct pick
    pub const TIME_BONUS_PER_SECOND: f64 = 10.0;
    /// Penalty for a wrong (retryable) pick
    pub const WRONG_PENALTY: i64 = -25;
    /// Penalty for letting the question time out
    pub const TIMEOUT_PENALTY: i64 = -50;
    /// Seconds shaved off the question timer by a wrong pick
    pub const WRONG_TIME_PENALTY_SECS: u32 = 1;

    /// Question timer resolution
    pub const TIMER_PERIOD_MS: u32 = 1000;
    /// Countdown steps before the first question (3, 2, 1)
    pub const COUNTDOWN_STEPS: u32 = 3;
    pub const COUNTDOWN_STEP_MS: u32 = 1000;
    /// How long "Go" stays up before question 0
    pub const COUNTDOWN_GO_MS: u32 = 800;

    /// Input stays locked this long after a wrong pick
    pub const WRONG_UNLOCK_MS: u32 = 500;
    /// Delay between a correct pick and the next question
    pub const CORRECT_ADVANCE_MS: u32 = 800;
    /// Delay between a timeout reveal and the next question
    pub const TIMEOUT_ADVANCE_MS: u32 = 2000;
    /// Delay between the final miss and the result screen
    pub const MISS_LIMIT_END_MS: u32 = 1000;

    /// Timer display thresholds (seconds)
    pub const TIMER_WARNING_SECS: u32 = 10;
    pub const TIMER_DANGER_SECS: u32 = 5;

    /// Board layout
    pub const BOARD_ROWS: usize = 4;
    /// Padding removed from the render area on each axis (20px per side)
    pub const AREA_PADDING: f32 = 40.0;
    /// Vertical gap used for the minimum board height hint
    pub const ROW_GAP: f32 = 30.0;
    /// Horizontal jitter half-range (pixels)
    pub const JITTER_X: f32 = 30.0;
    /// Vertical jitter half-range (pixels)
    pub const JITTER_Y: f32 = 20.0;
    /// Tile rotation half-range (degrees)
    pub const MAX_ROTATION_DEG: f32 = 8.0;

    /// Viewport breakpoints for tile footprints
    pub const SMALL_VIEWPORT: f32 = 480.0;
    pub const MEDIUM_VIEWPORT: f32 = 768.0;
    pub const TILE_SMALL: (f32, f32) = (70.0, 100.0);
    pub const TILE_MEDIUM: (f32, f32) = (85.0, 120.0);
    pub const TILE_LARGE: (f32, f32) = (100.0, 140.0);
}
