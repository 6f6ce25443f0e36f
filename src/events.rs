use bevy_ecs::prelude::*;

/// Discrete requests produced by the toggle handlers or the host application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameCommand {
    Exit,
    ToggleFlashlight,
    ToggleMenu,
    /// Volume slider for the ambient hum, clamped to 0..1.
    SetAmbientLevel(f32),
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The player looked straight at the peacock from close range.
    GazeConfirmed,
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
