use bevy_ecs::{
    event::{EventReader, EventWriter},
    system::{NonSendMut, ResMut},
};
use tracing::{debug, info, warn};

use crate::{
    error::{GameError, PointerError},
    events::{GameCommand, GameEvent},
    pointer::PointerHost,
    systems::{
        audio::AudioEvent,
        components::{GlobalState, SessionFlags},
    },
};

/// Non-send wrapper for the host's pointer-capture handle.
pub struct PointerResource(pub Box<dyn PointerHost>);

/// Requests exclusive pointer capture, recording the outcome in `flags`.
///
/// On refusal the captured flag stays cleared and the error is handed back for reporting.
pub fn acquire_pointer(pointer: &mut PointerResource, flags: &mut SessionFlags) -> Result<(), PointerError> {
    match pointer.0.request_capture() {
        Ok(()) => {
            debug!("Pointer captured");
            flags.insert(SessionFlags::POINTER_CAPTURED);
            Ok(())
        }
        Err(e) => {
            flags.remove(SessionFlags::POINTER_CAPTURED);
            Err(e)
        }
    }
}

/// Applies discrete commands coming from the toggle handlers or the host.
pub fn command_system(
    mut events: EventReader<GameEvent>,
    mut flags: ResMut<SessionFlags>,
    mut state: ResMut<GlobalState>,
    mut pointer: NonSendMut<PointerResource>,
    mut audio_events: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event else {
            continue;
        };

        match *command {
            GameCommand::ToggleFlashlight => {
                flags.toggle(SessionFlags::FLASHLIGHT_ON);
                info!(on = flags.contains(SessionFlags::FLASHLIGHT_ON), "Flashlight toggled");
            }
            GameCommand::ToggleMenu => {
                if !flags.contains(SessionFlags::SESSION_STARTED) {
                    debug!("Menu toggle ignored before session start");
                    continue;
                }

                if flags.contains(SessionFlags::MENU_OPEN) {
                    flags.remove(SessionFlags::MENU_OPEN);
                    info!("Menu closed");
                    if let Err(e) = acquire_pointer(&mut pointer, &mut flags) {
                        warn!(error = %e, "Could not re-acquire pointer after closing menu");
                        errors.write(e.into());
                    }
                } else {
                    flags.insert(SessionFlags::MENU_OPEN);
                    info!("Menu opened");
                    if flags.contains(SessionFlags::POINTER_CAPTURED) {
                        pointer.0.release_capture();
                        flags.remove(SessionFlags::POINTER_CAPTURED);
                        debug!("Pointer released");
                    }
                }
            }
            GameCommand::SetAmbientLevel(level) => {
                audio_events.write(AudioEvent::SetAmbientLevel(level));
            }
            GameCommand::Exit => {
                info!("Exit requested");
                state.exit = true;
            }
        }
    }
}
