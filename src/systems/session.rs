use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{NonSendMut, Query, Res, ResMut},
};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::audio::Cue;
use crate::error::GameError;
use crate::systems::{
    audio::{ActiveCues, AudioEvent, AudioResource, AudioState, RepeatSchedule},
    components::{DeltaTime, Ghost, GhostVisual, SessionFlags, UiSignals},
    control::{acquire_pointer, PointerResource},
    encounter::{resolve, Encounter},
    peacock::CameraFlip,
};

/// Seconds of session time elapsed since `start_session`.
///
/// Frozen before the session starts and while the menu is open, so every timer driven from it
/// (encounter phases, camera flip, taunt retriggers) pauses with the game.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionClock {
    pub elapsed: f32,
}

pub fn session_clock_system(delta_time: Res<DeltaTime>, flags: Res<SessionFlags>, mut clock: ResMut<SessionClock>) {
    if flags.contains(SessionFlags::SESSION_STARTED) && !flags.contains(SessionFlags::MENU_OPEN) {
        clock.elapsed += delta_time.seconds.max(0.0);
    }
}

/// Begins the session: unlocks movement, starts the encounter clock and the room tone.
///
/// Calling it again on a running session does nothing.
pub fn start_session_system(
    mut flags: ResMut<SessionFlags>,
    mut clock: ResMut<SessionClock>,
    mut encounter: ResMut<Encounter>,
    mut flip: ResMut<CameraFlip>,
    mut pointer: NonSendMut<PointerResource>,
    mut audio_events: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    if flags.contains(SessionFlags::SESSION_STARTED) {
        debug!("Session already started, ignoring");
        return;
    }

    info!("Session started");
    flags.insert(SessionFlags::SESSION_STARTED);
    flags.remove(SessionFlags::MOVEMENT_LOCKED);
    clock.elapsed = 0.0;
    *encounter = Encounter::default();
    // A turn timed against the previous clock must not resume on the new one.
    if matches!(*flip, CameraFlip::Turning { .. }) {
        *flip = CameraFlip::Done;
    }
    flags.remove(SessionFlags::CAMERA_FLIP);

    if let Err(e) = acquire_pointer(&mut pointer, &mut flags) {
        warn!(error = %e, "Pointer capture refused at session start");
        errors.write(e.into());
    }

    audio_events.write(AudioEvent::Loop(Cue::AmbientHum));
}

/// Tears the session down: the encounter is forced to its resolved state, an unfinished camera
/// flip is cancelled, pending retriggers are dropped and every cue is stopped.
///
/// Audio is stopped on the host directly rather than through an event, since no further frame may
/// run to deliver it.
#[allow(clippy::too_many_arguments)]
pub fn end_session_system(
    mut flags: ResMut<SessionFlags>,
    mut encounter: ResMut<Encounter>,
    mut flip: ResMut<CameraFlip>,
    mut ui: ResMut<UiSignals>,
    mut schedule: ResMut<RepeatSchedule>,
    mut pointer: NonSendMut<PointerResource>,
    mut audio: NonSendMut<AudioResource>,
    mut audio_state: ResMut<AudioState>,
    mut ghost: Query<&mut GhostVisual, With<Ghost>>,
    mut errors: EventWriter<GameError>,
) {
    if !flags.contains(SessionFlags::SESSION_STARTED) {
        debug!("No session running, ignoring end request");
        return;
    }

    if !encounter.is_resolved() {
        info!(phase = %encounter.kind(), "Aborting encounter");
        match ghost.single_mut() {
            Ok(mut visual) => resolve(&mut encounter, &mut visual, &mut ui, &mut flags),
            Err(e) => {
                errors.write(GameError::InvalidState(format!(
                    "No/multiple entities queried for ghost on session end: {}",
                    e
                )));
            }
        }
    }

    if let CameraFlip::Turning { .. } = *flip {
        debug!("Cancelling camera flip");
        *flip = CameraFlip::Done;
    }

    schedule.clear();
    for cue in Cue::iter() {
        audio.0.stop(cue);
    }
    audio_state.active = ActiveCues::empty();

    if flags.contains(SessionFlags::POINTER_CAPTURED) {
        pointer.0.release_capture();
    }

    flags.remove(
        SessionFlags::SESSION_STARTED
            | SessionFlags::POINTER_CAPTURED
            | SessionFlags::MENU_OPEN
            | SessionFlags::CAMERA_FLIP,
    );
    flags.insert(SessionFlags::MOVEMENT_LOCKED);
    info!("Session ended");
}
