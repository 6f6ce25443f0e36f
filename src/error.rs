//! Centralized error types for the simulation.
//!
//! Nothing in here is fatal to a session: environment refusals are reported through
//! [`GameError`] events, logged, and the frame carries on.

use bevy_ecs::event::Event;

use crate::audio::Cue;

/// Main error type for the simulation core.
///
/// Also an ECS event, so systems can report problems without aborting the frame.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Pointer error: {0}")]
    Pointer(#[from] PointerError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Failures reported by the audio host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The host refused to start playback (autoplay policy, decoder failure, ...).
    #[error("Playback of '{cue}' refused: {reason}")]
    PlaybackRefused { cue: Cue, reason: String },

    #[error("No audio device available")]
    DeviceUnavailable,
}

/// Failures reported by the pointer-capture host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("Pointer capture refused: {0}")]
    CaptureRefused(String),
}

/// Result type for core operations.
pub type GameResult<T> = Result<T, GameError>;
