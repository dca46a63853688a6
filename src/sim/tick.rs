//! Session tick
//!
//! Advances a session by a slice of wall time and applies player input.
//! Every wait (question timer, post-answer delays, the pre-game countdown)
//! lives in the session as a handle-tagged slot, so cancelling is just
//! clearing the slot and a late firing for a stale handle is ignored.

use super::layout::layout_tiles;
use super::scoring;
use super::state::{
    Deferred, HandleId, Limit, QuestionTimer, Session, SessionEvent, SessionPhase, SoundEffect,
};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tile the player picked (candidate name)
    pub select: Option<String>,
    /// Read the current clue again
    pub replay_narration: bool,
}

impl TickInput {
    pub fn select(key: impl Into<String>) -> Self {
        Self {
            select: Some(key.into()),
            ..Default::default()
        }
    }
}

/// Advance the session by `dt_ms` milliseconds
///
/// Input is applied first, as if it arrived at the start of the slice.
/// Events queue on the session until `Session::drain_events`; the host must
/// drain them after every tick or the queue keeps growing.
pub fn tick(session: &mut Session, input: &TickInput, dt_ms: u32) {
    if session.is_terminal() {
        return;
    }

    if let Some(key) = &input.select {
        handle_selection(session, key);
    }

    if input.replay_narration && session.phase == SessionPhase::AwaitingAnswer {
        narrate_current(session);
    }

    advance_clock(session, dt_ms);
}

/// Return to setup: stop the timer, the narration and any pending step
///
/// Nothing fires for this session afterwards.
pub fn abandon(session: &mut Session) {
    if session.phase == SessionPhase::Setup {
        return;
    }
    cancel_timer(session);
    cancel_narration(session);
    session.scheduled = None;
    session.input_locked = true;
    session.phase = SessionPhase::Setup;
    log::info!("Session abandoned at question {}", session.current_index);
}

/// Run the clock forward, firing timers and deferred steps in order
fn advance_clock(session: &mut Session, mut dt_ms: u32) {
    while dt_ms > 0 && !session.is_terminal() {
        let until_timer = session.timer.map(|t| TIMER_PERIOD_MS - t.elapsed_ms);
        let until_scheduled = session.scheduled.map(|s| s.remaining_ms);

        let step = [Some(dt_ms), until_timer, until_scheduled]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(dt_ms);

        session.clock_ms += step as u64;
        dt_ms -= step;

        let mut timer_due = None;
        if let Some(timer) = session.timer.as_mut() {
            timer.elapsed_ms += step;
            if timer.elapsed_ms >= TIMER_PERIOD_MS {
                timer.elapsed_ms = 0;
                timer_due = Some(timer.id);
            }
        }

        let mut scheduled_due = None;
        if let Some(scheduled) = session.scheduled.as_mut() {
            scheduled.remaining_ms = scheduled.remaining_ms.saturating_sub(step);
            if scheduled.remaining_ms == 0 {
                scheduled_due = Some(scheduled.id);
            }
        }

        if let Some(id) = timer_due {
            on_timer_second(session, id);
        }
        if let Some(id) = scheduled_due {
            fire_scheduled(session, id);
        }
    }
}

/// One second elapsed on the question timer
fn on_timer_second(session: &mut Session, id: HandleId) {
    if session.timer.map(|t| t.id) != Some(id) {
        return;
    }

    let remaining = session.time_remaining.unwrap_or(0).saturating_sub(1);
    session.time_remaining = Some(remaining);
    session.push(SessionEvent::TimerChanged { remaining });

    if remaining == 0 {
        handle_timeout(session);
    }
}

fn fire_scheduled(session: &mut Session, id: HandleId) {
    let Some(scheduled) = session.scheduled else {
        return;
    };
    if scheduled.id != id {
        return;
    }
    session.scheduled = None;

    match scheduled.action {
        Deferred::CountdownStep => countdown_step(session),
        Deferred::BeginPlay => {
            session.started_at_ms = Some(session.clock_ms);
            enter_question(session);
        }
        Deferred::Unlock => {
            if session.phase == SessionPhase::AwaitingAnswer {
                session.input_locked = false;
                session.push(SessionEvent::InputUnlocked);
            }
        }
        Deferred::NextQuestion => enter_question(session),
        Deferred::Finish => finish(session),
    }
}

fn countdown_step(session: &mut Session) {
    let SessionPhase::Countdown { step } = session.phase else {
        return;
    };

    if step > 1 {
        let next = step - 1;
        session.phase = SessionPhase::Countdown { step: next };
        session.push(SessionEvent::CountdownStep { step: next });
        session.push(SessionEvent::PlayEffect(SoundEffect::CountdownTick));
        session.schedule(Deferred::CountdownStep, COUNTDOWN_STEP_MS);
    } else {
        session.phase = SessionPhase::Countdown { step: 0 };
        session.push(SessionEvent::CountdownStep { step: 0 });
        session.push(SessionEvent::PlayEffect(SoundEffect::CountdownGo));
        session.schedule(Deferred::BeginPlay, COUNTDOWN_GO_MS);
    }
}

/// Open the question at `current_index`, or finish if none are left
fn enter_question(session: &mut Session) {
    if session.is_terminal() {
        return;
    }
    if session.current_index >= session.selected.len() {
        finish(session);
        return;
    }

    session.phase = SessionPhase::AwaitingAnswer;
    lay_out_board(session);
    session.push(SessionEvent::QuestionStarted {
        index: session.current_index,
    });
    start_timer(session);
    narrate_current(session);
    session.input_locked = false;

    log::debug!(
        "Question {}/{}: {}",
        session.current_index + 1,
        session.selected.len(),
        session.selected[session.current_index].name
    );
}

/// Lay out every unresolved candidate in a fresh shuffled order
fn lay_out_board(session: &mut Session) {
    use rand::seq::SliceRandom;

    let mut keys: Vec<&str> = session.selected[session.current_index..]
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    keys.shuffle(&mut session.rng);
    session.board = layout_tiles(&keys, &session.geometry, &mut session.rng);
}

/// Start the question timer, replacing any live one
fn start_timer(session: &mut Session) {
    cancel_timer(session);
    match session.profile.time_limit_secs {
        Limit::Limited(secs) => {
            let id = session.next_handle_id();
            session.timer = Some(QuestionTimer { id, elapsed_ms: 0 });
            session.time_remaining = Some(secs);
            session.push(SessionEvent::TimerChanged { remaining: secs });
        }
        Limit::Unlimited => session.time_remaining = None,
    }
}

fn cancel_timer(session: &mut Session) {
    session.timer = None;
}

/// Speak the current clue, cancelling any narration in flight
fn narrate_current(session: &mut Session) {
    cancel_narration(session);
    let Some(candidate) = session.selected.get(session.current_index) else {
        return;
    };
    let text = candidate.narration().to_string();
    let id = session.next_handle_id();
    session.narration = Some(id);
    session.push(SessionEvent::Speak {
        id,
        text,
        rate: session.profile.narration_rate,
    });
}

fn cancel_narration(session: &mut Session) {
    if let Some(id) = session.narration.take() {
        session.push(SessionEvent::CancelNarration { id });
    }
}

fn handle_selection(session: &mut Session, key: &str) {
    if session.input_locked || session.phase != SessionPhase::AwaitingAnswer {
        return;
    }
    if !session.board.iter().any(|t| t.key == key) {
        log::debug!("Ignoring pick of '{}' (not on the board)", key);
        return;
    }

    session.input_locked = true;
    let is_correct = session
        .current_candidate()
        .is_some_and(|target| target.name == key);

    if is_correct {
        handle_correct(session, key);
    } else {
        handle_wrong(session, key);
    }
}

fn handle_correct(session: &mut Session, key: &str) {
    cancel_timer(session);
    cancel_narration(session);
    session.scheduled = None;

    session.correct_count += 1;
    let delta = scoring::on_correct(session.time_remaining);
    session.score = scoring::clamp_score(session.score, delta);

    session.board.retain(|t| t.key != key);
    session.push(SessionEvent::PlayEffect(SoundEffect::CorrectHit));
    session.push(SessionEvent::TileTaken {
        key: key.to_string(),
    });

    session.current_index += 1;
    session.phase = SessionPhase::Resolving;
    session.schedule(Deferred::NextQuestion, CORRECT_ADVANCE_MS);

    log::debug!("Correct: {} (+{})", key, delta);
}

fn handle_wrong(session: &mut Session, key: &str) {
    if let Some(remaining) = session.time_remaining.as_mut() {
        *remaining = remaining.saturating_sub(WRONG_TIME_PENALTY_SECS);
        let remaining = *remaining;
        session.push(SessionEvent::TimerChanged { remaining });
    }

    session.wrong_guesses += 1;
    session.score = scoring::clamp_score(session.score, scoring::on_wrong());

    session.push(SessionEvent::PlayEffect(SoundEffect::WrongHit));
    session.push(SessionEvent::WrongPick {
        key: key.to_string(),
    });
    session.schedule(Deferred::Unlock, WRONG_UNLOCK_MS);
}

/// The question timer ran out
fn handle_timeout(session: &mut Session) {
    cancel_timer(session);
    cancel_narration(session);
    session.scheduled = None;
    session.input_locked = true;

    let Some(target) = session.current_candidate().cloned() else {
        return;
    };

    session.wrong_count += 1;
    session.score = scoring::clamp_score(session.score, scoring::on_timeout());
    session.board.retain(|t| t.key != target.name);
    session.push(SessionEvent::TimedOut {
        key: target.name.clone(),
    });
    log::debug!(
        "Timed out on {} ({} misses)",
        target.name,
        session.wrong_count
    );
    session.missed.push(target);

    session.phase = SessionPhase::Resolving;
    if session.profile.miss_limit.is_reached(session.wrong_count) {
        session.schedule(Deferred::Finish, MISS_LIMIT_END_MS);
    } else {
        session.current_index += 1;
        session.schedule(Deferred::NextQuestion, TIMEOUT_ADVANCE_MS);
    }
}

/// Enter `Complete`
fn finish(session: &mut Session) {
    if session.phase == SessionPhase::Complete {
        return;
    }
    cancel_timer(session);
    cancel_narration(session);
    session.scheduled = None;
    session.input_locked = true;
    session.phase = SessionPhase::Complete;
    session.ended_at_ms = Some(session.clock_ms);

    let cleared = session.current_index >= session.selected.len();
    session.push(SessionEvent::PlayEffect(if cleared {
        SoundEffect::Fanfare
    } else {
        SoundEffect::Failure
    }));
    session.push(SessionEvent::Finished { cleared });

    log::info!(
        "Session complete: score {}, {} correct, {} missed ({})",
        session.score,
        session.correct_count,
        session.wrong_count,
        if cleared { "cleared" } else { "failed" }
    );
}
