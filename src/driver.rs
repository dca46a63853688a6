//! Host driver
//!
//! Owns the live session and the audio collaborators. Each `tick` feeds
//! input to the session, advances it, and routes the resulting events:
//! narration requests go to the `Narrator`, effects to the `AudioManager`,
//! and everything is handed back so the renderer can update the board.

use crate::audio::{AudioManager, Narrator};
use crate::settings::Settings;
use crate::sim::{
    self, BoardGeometry, CandidatePool, Difficulty, HandleId, Session, SessionEvent, SetupError,
    Summary, TickInput,
};

/// Connects a session to its narrator and sound backend
pub struct Driver {
    session: Option<Session>,
    narrator: Box<dyn Narrator>,
    audio: AudioManager,
    narration_enabled: bool,
    show_clue_text: bool,
    /// Narration request the backend is currently speaking
    speaking: Option<HandleId>,
}

impl Driver {
    pub fn new(narrator: Box<dyn Narrator>, mut audio: AudioManager, settings: &Settings) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        Self {
            session: None,
            narrator,
            audio,
            narration_enabled: settings.narration_enabled,
            show_clue_text: settings.show_clue_text,
            speaking: None,
        }
    }

    /// Start a new session, discarding any current one
    ///
    /// On error no session exists and the driver stays in setup.
    pub fn start_session(
        &mut self,
        pool: &CandidatePool,
        difficulty: Difficulty,
        geometry: BoardGeometry,
        seed: u64,
    ) -> Result<(), SetupError> {
        self.return_to_setup();
        let mut session = Session::start(pool, difficulty, geometry, seed)?;
        let events = session.drain_events();
        self.session = Some(session);
        self.dispatch(&events);
        Ok(())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Advance the live session; returns the events it produced
    pub fn tick(&mut self, input: &TickInput, dt_ms: u32) -> Vec<SessionEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        sim::tick(session, input, dt_ms);
        let events = session.drain_events();
        self.dispatch(&events);
        events
    }

    /// Clue text to caption the open question with, if captions are on
    pub fn clue_caption(&self) -> Option<&str> {
        if !self.show_clue_text {
            return None;
        }
        let session = self.session.as_ref()?;
        if session.phase() != sim::SessionPhase::AwaitingAnswer {
            return None;
        }
        session.current_candidate().map(|c| c.clue_text.as_str())
    }

    /// Result summary once the session is complete
    pub fn summary(&self) -> Option<Summary> {
        self.session
            .as_ref()
            .filter(|s| s.phase() == sim::SessionPhase::Complete)
            .map(sim::summarize)
    }

    /// Abandon the session: stop narration and timers, drop all state
    pub fn return_to_setup(&mut self) {
        if let Some(mut session) = self.session.take() {
            sim::abandon(&mut session);
            let events = session.drain_events();
            self.dispatch(&events);
        }
        if self.speaking.take().is_some() {
            self.narrator.cancel();
        }
    }

    fn dispatch(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::Speak { id, text, rate } => {
                    if !self.narration_enabled {
                        continue;
                    }
                    if self.speaking.take().is_some() {
                        self.narrator.cancel();
                    }
                    match self.narrator.speak(text, *rate) {
                        Ok(()) => self.speaking = Some(*id),
                        Err(e) => log::warn!("Narration unavailable, continuing silently: {}", e),
                    }
                }
                SessionEvent::CancelNarration { id } if self.speaking == Some(*id) => {
                    self.narrator.cancel();
                    self.speaking = None;
                }
                SessionEvent::PlayEffect(effect) => self.audio.play(*effect),
                _ => {}
            }
        }
    }
}
