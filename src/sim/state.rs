//! Session state and core simulation types
//!
//! A `Session` is one play-through under a fixed difficulty. It is owned by
//! the host and only changed through `tick` and `abandon`; everything the host
//! needs to react to (narration, sound, board changes) comes back out as
//! `SessionEvent`s.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{BoardGeometry, PlacedTile};
use super::pool::{Candidate, CandidatePool, SetupError};
use crate::consts::*;

/// A count or duration that may be unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Limit {
    Unlimited,
    Limited(u32),
}

impl Limit {
    /// Clamp to a collection length
    pub fn clamp_to(self, len: usize) -> usize {
        match self {
            Limit::Unlimited => len,
            Limit::Limited(n) => (n as usize).min(len),
        }
    }

    pub fn as_option(self) -> Option<u32> {
        match self {
            Limit::Unlimited => None,
            Limit::Limited(n) => Some(n),
        }
    }

    /// True when `value` has hit a finite limit
    pub fn is_reached(self, value: u32) -> bool {
        match self {
            Limit::Unlimited => false,
            Limit::Limited(n) => value >= n,
        }
    }
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Inferno,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Inferno,
        Difficulty::Nightmare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Inferno => "Inferno",
            Difficulty::Nightmare => "Nightmare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "inferno" => Some(Difficulty::Inferno),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    /// Rules for this preset
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                question_count: Limit::Limited(10),
                time_limit_secs: Limit::Unlimited,
                narration_rate: 0.8,
                miss_limit: Limit::Unlimited,
            },
            Difficulty::Normal => DifficultyProfile {
                question_count: Limit::Limited(20),
                time_limit_secs: Limit::Limited(30),
                narration_rate: 1.0,
                miss_limit: Limit::Limited(10),
            },
            Difficulty::Hard => DifficultyProfile {
                question_count: Limit::Limited(30),
                time_limit_secs: Limit::Limited(15),
                narration_rate: 1.2,
                miss_limit: Limit::Limited(5),
            },
            Difficulty::Inferno => DifficultyProfile {
                question_count: Limit::Limited(40),
                time_limit_secs: Limit::Limited(12),
                narration_rate: 2.0,
                miss_limit: Limit::Limited(3),
            },
            Difficulty::Nightmare => DifficultyProfile {
                question_count: Limit::Unlimited,
                time_limit_secs: Limit::Limited(10),
                narration_rate: 3.0,
                miss_limit: Limit::Limited(1),
            },
        }
    }
}

/// Rules fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub question_count: Limit,
    /// Per-question time limit; `Unlimited` means untimed questions
    pub time_limit_secs: Limit,
    pub narration_rate: f32,
    /// Timeouts allowed before the session ends early
    pub miss_limit: Limit,
}

impl DifficultyProfile {
    pub fn is_timed(&self) -> bool {
        matches!(self.time_limit_secs, Limit::Limited(_))
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not playing (abandoned back to setup)
    Setup,
    /// Pre-game countdown; `step` is the number on screen, 0 is "Go"
    Countdown { step: u32 },
    /// A question is open
    AwaitingAnswer,
    /// Between a resolved question and the next one
    Resolving,
    /// Run ended
    Complete,
}

/// Sound effects the session asks the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Right tile slapped
    CorrectHit,
    /// Wrong tile picked
    WrongHit,
    /// Countdown beep (3, 2, 1)
    CountdownTick,
    /// Higher countdown beep on "Go"
    CountdownGo,
    /// All questions cleared
    Fanfare,
    /// Session ended on the miss limit
    Failure,
}

/// Handle for a timer, deferred step or narration request
///
/// Ids are never reused within a session, so a stale handle can always be
/// told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u64);

/// Per-question countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTimer {
    pub id: HandleId,
    /// Milliseconds into the current second
    pub elapsed_ms: u32,
}

/// Transitions that happen after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Advance the pre-game countdown
    CountdownStep,
    /// Countdown finished, open question 0
    BeginPlay,
    /// Re-enable input after a wrong pick
    Unlock,
    /// Open the question at `current_index`
    NextQuestion,
    /// Enter `Complete`
    Finish,
}

/// A pending deferred transition (single slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub id: HandleId,
    pub action: Deferred,
    pub remaining_ms: u32,
}

/// Timer display level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerLevel {
    Normal,
    Warning,
    Danger,
}

/// Things the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Countdown number changed (0 = "Go")
    CountdownStep { step: u32 },
    /// Start narrating; replaces any earlier request
    Speak {
        id: HandleId,
        text: String,
        rate: f32,
    },
    /// Stop the given narration request
    CancelNarration { id: HandleId },
    PlayEffect(SoundEffect),
    /// A new question is open and the board was laid out again
    QuestionStarted { index: usize },
    TimerChanged { remaining: u32 },
    /// Correct tile taken off the board
    TileTaken { key: String },
    /// Wrong tile picked; the question stays open
    WrongPick { key: String },
    /// Question lost to the clock; `key` is the tile to reveal
    TimedOut { key: String },
    InputUnlocked,
    /// Session reached `Complete`
    Finished { cleared: bool },
}

/// One play-through
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) difficulty: Difficulty,
    pub(super) profile: DifficultyProfile,
    pub(super) seed: u64,
    pub(super) rng: Pcg32,
    /// Question order
    pub(super) selected: Vec<Candidate>,
    pub(super) current_index: usize,
    pub(super) score: u64,
    pub(super) correct_count: u32,
    /// Misses (timeouts)
    pub(super) wrong_count: u32,
    /// Retryable wrong picks, tracked for display only
    pub(super) wrong_guesses: u32,
    pub(super) missed: Vec<Candidate>,
    pub(super) time_remaining: Option<u32>,
    pub(super) input_locked: bool,
    pub(super) phase: SessionPhase,
    pub(super) geometry: BoardGeometry,
    pub(super) board: Vec<PlacedTile>,
    /// Session clock, advanced only by ticks
    pub(super) clock_ms: u64,
    pub(super) started_at_ms: Option<u64>,
    pub(super) ended_at_ms: Option<u64>,
    pub(super) timer: Option<QuestionTimer>,
    pub(super) scheduled: Option<Scheduled>,
    pub(super) narration: Option<HandleId>,
    pub(super) events: Vec<SessionEvent>,
    next_handle: u64,
}

impl Session {
    /// Start a session: sample the question order and begin the countdown
    pub fn start(
        pool: &CandidatePool,
        difficulty: Difficulty,
        geometry: BoardGeometry,
        seed: u64,
    ) -> Result<Self, SetupError> {
        Self::start_with_profile(pool, difficulty, difficulty.profile(), geometry, seed)
    }

    /// Start with explicit rules (custom or test profiles)
    pub fn start_with_profile(
        pool: &CandidatePool,
        difficulty: Difficulty,
        profile: DifficultyProfile,
        geometry: BoardGeometry,
        seed: u64,
    ) -> Result<Self, SetupError> {
        if pool.is_empty() {
            return Err(SetupError::EmptyPool);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let selected = pool.sample(profile.question_count, &mut rng);

        let mut session = Self {
            difficulty,
            profile,
            seed,
            rng,
            selected,
            current_index: 0,
            score: 0,
            correct_count: 0,
            wrong_count: 0,
            wrong_guesses: 0,
            missed: Vec::new(),
            time_remaining: None,
            input_locked: true,
            phase: SessionPhase::Countdown {
                step: COUNTDOWN_STEPS,
            },
            geometry,
            board: Vec::new(),
            clock_ms: 0,
            started_at_ms: None,
            ended_at_ms: None,
            timer: None,
            scheduled: None,
            narration: None,
            events: Vec::new(),
            next_handle: 1,
        };

        log::info!(
            "Session started: {} with {} questions (seed {})",
            difficulty.as_str(),
            session.selected.len(),
            seed
        );

        session.push(SessionEvent::CountdownStep {
            step: COUNTDOWN_STEPS,
        });
        session.push(SessionEvent::PlayEffect(SoundEffect::CountdownTick));
        session.schedule(Deferred::CountdownStep, COUNTDOWN_STEP_MS);

        Ok(session)
    }

    /// Allocate a fresh handle id
    pub(super) fn next_handle_id(&mut self) -> HandleId {
        let id = HandleId(self.next_handle);
        self.next_handle += 1;
        id
    }

    pub(super) fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Replace the deferred slot with a new action
    pub(super) fn schedule(&mut self, action: Deferred, delay_ms: u32) {
        let id = self.next_handle_id();
        self.scheduled = Some(Scheduled {
            id,
            action,
            remaining_ms: delay_ms,
        });
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Question order for the whole session
    pub fn selected(&self) -> &[Candidate] {
        &self.selected
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The target for the open question
    pub fn current_candidate(&self) -> Option<&Candidate> {
        self.selected.get(self.current_index)
    }

    /// Questions not yet resolved
    pub fn remaining_questions(&self) -> usize {
        self.selected.len() - self.current_index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub fn missed(&self) -> &[Candidate] {
        &self.missed
    }

    /// Seconds left on the question timer (`None` when untimed)
    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub fn timer_level(&self) -> TimerLevel {
        match self.time_remaining {
            Some(secs) if secs <= TIMER_DANGER_SECS => TimerLevel::Danger,
            Some(secs) if secs <= TIMER_WARNING_SECS => TimerLevel::Warning,
            _ => TimerLevel::Normal,
        }
    }

    /// Hearts left (`None` when misses are unlimited)
    pub fn lives_remaining(&self) -> Option<u32> {
        self.profile
            .miss_limit
            .as_option()
            .map(|limit| limit.saturating_sub(self.wrong_count))
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    /// True once no further input will be processed
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Complete | SessionPhase::Setup)
    }

    pub fn board(&self) -> &[PlacedTile] {
        &self.board
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn ended_at_ms(&self) -> Option<u64> {
        self.ended_at_ms
    }

    /// Live question timer handle, if any
    pub fn active_timer(&self) -> Option<HandleId> {
        self.timer.map(|t| t.id)
    }

    /// Outstanding narration request, if any
    pub fn active_narration(&self) -> Option<HandleId> {
        self.narration
    }
}
