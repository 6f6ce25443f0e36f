//! ECS side of audio: cue requests, the logical active-cue set and repeat scheduling.
//!
//! The host behind [`AudioResource`] may not be `Send` (browser audio, SDL mixer), so it lives in a
//! non-send resource and `audio_system` runs on the main thread.

use bevy_ecs::{
    event::{Event, EventReader, EventWriter},
    resource::Resource,
    system::{NonSendMut, Res, ResMut},
};
use bitflags::bitflags;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::audio::{AudioHost, Cue};
use crate::config::SceneConfig;
use crate::error::GameError;
use crate::systems::session::SessionClock;

bitflags! {
    /// Cues the core believes are currently sounding.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActiveCues: u8 {
        const AMBIENT_HUM = 1 << 0;
        const GHOST_APPEARS = 1 << 1;
        const TAUNT = 1 << 2;
    }
}

impl From<Cue> for ActiveCues {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::AmbientHum => ActiveCues::AMBIENT_HUM,
            Cue::GhostAppears => ActiveCues::GHOST_APPEARS,
            Cue::Taunt => ActiveCues::TAUNT,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AudioState {
    /// Ambient hum level, 0..1
    pub ambient_level: f32,
    pub active: ActiveCues,
}

impl AudioState {
    pub fn new(ambient_level: f32) -> Self {
        Self {
            ambient_level: ambient_level.clamp(0.0, 1.0),
            active: ActiveCues::empty(),
        }
    }

    pub fn is_active(&self, cue: Cue) -> bool {
        self.active.contains(cue.into())
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// Play a cue once from the beginning
    Play(Cue),
    /// Start a cue looping
    Loop(Cue),
    /// Play a cue `plays` times back to back
    Repeat { cue: Cue, plays: u8 },
    SetAmbientLevel(f32),
}

/// A delayed audio action on the session clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCue {
    pub cue: Cue,
    /// Plays still to start. At zero the entry only marks the end of the last play.
    pub remaining: u8,
    pub due: f32,
}

/// Pending retriggers and expiries. Cleared when the session ends so nothing fires afterwards.
#[derive(Resource, Debug, Default, Clone)]
pub struct RepeatSchedule {
    pending: SmallVec<[PendingCue; 4]>,
}

impl RepeatSchedule {
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn cancel(&mut self, cue: Cue) {
        self.pending.retain(|entry| entry.cue != cue);
    }

    fn push(&mut self, entry: PendingCue) {
        self.cancel(entry.cue);
        self.pending.push(entry);
    }
}

/// Non-send resource wrapper for the audio host.
pub struct AudioResource(pub Box<dyn AudioHost>);

/// Length of one play of `cue`, or `fallback` when the host cannot say.
pub fn play_length(host: &dyn AudioHost, cue: Cue, fallback: f32) -> f32 {
    match host.duration(cue) {
        Some(duration) if duration.is_finite() && duration > 0.0 => duration,
        _ => fallback,
    }
}

fn start(
    host: &mut dyn AudioHost,
    state: &mut AudioState,
    errors: &mut EventWriter<GameError>,
    cue: Cue,
    looping: bool,
) -> bool {
    if cue == Cue::AmbientHum {
        host.set_level(cue, state.ambient_level);
    }

    match host.play(cue, looping) {
        Ok(()) => {
            trace!(%cue, looping, "Cue started");
            state.active.insert(cue.into());
            true
        }
        Err(e) => {
            warn!(%cue, error = %e, "Cue playback failed");
            errors.write(e.into());
            false
        }
    }
}

/// Processes cue requests and fires due retriggers.
pub fn audio_system(
    mut audio: NonSendMut<AudioResource>,
    mut state: ResMut<AudioState>,
    mut schedule: ResMut<RepeatSchedule>,
    clock: Res<SessionClock>,
    config: Res<SceneConfig>,
    mut events: EventReader<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    let now = clock.elapsed;
    let host = audio.0.as_mut();

    for event in events.read() {
        match *event {
            AudioEvent::Play(cue) => {
                if start(host, &mut state, &mut errors, cue, false) {
                    // Expiry only; one-shots are not retriggered.
                    schedule.push(PendingCue {
                        cue,
                        remaining: 0,
                        due: now + play_length(host, cue, config.taunt_fallback_delay),
                    });
                }
            }
            AudioEvent::Loop(cue) => {
                schedule.cancel(cue);
                start(host, &mut state, &mut errors, cue, true);
            }
            AudioEvent::Repeat { cue, plays } => {
                if plays == 0 {
                    continue;
                }
                debug!(%cue, plays, "Starting repeated cue");
                // A refused play still counts, so a blocked cue cannot stall the schedule.
                start(host, &mut state, &mut errors, cue, false);
                schedule.push(PendingCue {
                    cue,
                    remaining: plays - 1,
                    due: now + play_length(host, cue, config.taunt_fallback_delay),
                });
            }
            AudioEvent::SetAmbientLevel(level) => {
                let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { state.ambient_level };
                state.ambient_level = level;
                host.set_level(Cue::AmbientHum, level);
                debug!(level, "Ambient level changed");
            }
        }
    }

    // Retrigger from the previous due time rather than `now` so frame jitter does not accumulate.
    let mut index = 0;
    while index < schedule.pending.len() {
        let entry = schedule.pending[index];
        if entry.due > now {
            index += 1;
            continue;
        }

        if entry.remaining == 0 {
            state.active.remove(entry.cue.into());
            schedule.pending.swap_remove(index);
            trace!(cue = %entry.cue, "Cue finished");
            continue;
        }

        start(host, &mut state, &mut errors, entry.cue, false);
        let next = &mut schedule.pending[index];
        next.remaining -= 1;
        next.due += play_length(host, entry.cue, config.taunt_fallback_delay);
        trace!(cue = %entry.cue, remaining = next.remaining, "Cue retriggered");
    }
}
