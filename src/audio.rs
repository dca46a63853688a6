//! Audio collaborators
//!
//! The session never makes a sound itself. It asks for narration and effects
//! through events, and the host routes them to whatever backend it has:
//! a speech engine, a synth, or nothing at all. Backend failures are never
//! fatal; the game keeps running silently.

use thiserror::Error;

pub use crate::sim::SoundEffect;

/// Failure reported by a narration or sound backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Failed(String),
}

/// Speech backend
///
/// The session keeps at most one request outstanding, and always cancels the
/// previous one before speaking again.
pub trait Narrator {
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), CollaboratorError>;
    fn cancel(&mut self);
}

/// Sound-effect backend (fire and forget)
pub trait EffectSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), CollaboratorError>;
}

/// Narrator that only writes the clue to the log
#[derive(Debug, Default)]
pub struct LogNarrator {
    speaking: bool,
}

impl LogNarrator {
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
}

impl Narrator for LogNarrator {
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), CollaboratorError> {
        log::info!("🔊 ({rate:.1}x) {text}");
        self.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.speaking = false;
    }
}

/// Effect sink that logs each effect
#[derive(Debug, Default)]
pub struct LogEffectSink;

impl EffectSink for LogEffectSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), CollaboratorError> {
        log::debug!("♪ {:?} at {:.2}", effect, volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn EffectSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn EffectSink>>) -> Self {
        if sink.is_none() {
            log::warn!("No sound backend - audio disabled");
        }
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        if let Err(e) = sink.play(effect, vol) {
            log::warn!("Failed to play {:?}: {}", effect, e);
        }
    }
}
