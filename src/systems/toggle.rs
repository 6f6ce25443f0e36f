//! Edge-triggered handlers for the flashlight and menu keys.

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use tracing::trace;

use crate::events::{GameCommand, GameEvent};
use crate::systems::input::InputState;

/// Fires on the released-to-pressed transition of a raw level, and only then.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTrigger {
    previous: bool,
}

impl EdgeTrigger {
    /// Feeds this frame's level; returns `true` exactly once per press.
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.previous;
        self.previous = pressed;
        fired
    }

    pub fn reset(&mut self) {
        self.previous = false;
    }
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ToggleHandlers {
    pub flashlight: EdgeTrigger,
    pub menu: EdgeTrigger,
}

/// Turns press edges into commands. Gating (session started, etc.) is left to the command handler.
pub fn toggle_system(input: Res<InputState>, mut handlers: ResMut<ToggleHandlers>, mut events: EventWriter<GameEvent>) {
    if handlers.flashlight.update(input.flashlight_pressed) {
        trace!("Flashlight key pressed");
        events.write(GameCommand::ToggleFlashlight.into());
    }

    if handlers.menu.update(input.menu_pressed) {
        trace!("Menu key pressed");
        events.write(GameCommand::ToggleMenu.into());
    }
}
