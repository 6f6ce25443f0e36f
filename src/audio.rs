//! This module defines the audio host the core talks to.
//!
//! Playback itself belongs to the embedding application; the core only asks for named
//! cues to start, loop or stop, and asks how long a cue is so it can schedule repeats.
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::error::AudioError;

/// Named audio cues the encounter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Cue {
    /// Looping room tone; its level follows the volume setting.
    AmbientHum,
    /// Played once, from the beginning, when the ghost appears.
    GhostAppears,
    /// Replayed a fixed number of times while the ghost rushes the player.
    Taunt,
}

/// The playback side of the audio collaborator.
///
/// Requests are fire-and-forget from the core's point of view: an `Err` is logged and the
/// simulation continues as if the cue had played.
pub trait AudioHost {
    /// Starts `cue` from its beginning, optionally looping it.
    fn play(&mut self, cue: Cue, looping: bool) -> Result<(), AudioError>;

    /// Stops `cue` if it is playing.
    fn stop(&mut self, cue: Cue);

    /// Sets the playback level of `cue`, 0..1.
    fn set_level(&mut self, cue: Cue, level: f32);

    /// Length of one play of `cue`, in seconds, when the host knows it.
    fn duration(&self, cue: Cue) -> Option<f32>;
}

/// An audio host that accepts every request and plays nothing.
///
/// Used when no device is available; durations are unknown, so repeats fall back to
/// the fixed retrigger delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioHost for NullAudio {
    fn play(&mut self, cue: Cue, looping: bool) -> Result<(), AudioError> {
        tracing::trace!(%cue, looping, "Null audio host ignoring play request");
        Ok(())
    }

    fn stop(&mut self, _cue: Cue) {}

    fn set_level(&mut self, _cue: Cue, _level: f32) {}

    fn duration(&self, _cue: Cue) -> Option<f32> {
        None
    }
}
