//! The Entity-Component-System (ECS) module.
//!
//! Components, resources and the per-frame systems, listed here in the order the schedule chains
//! them: input, toggles, look and motion, boundary, triggers, encounter, audio.

pub mod audio;
pub mod boundary;
pub mod components;
pub mod control;
pub mod encounter;
pub mod input;
pub mod peacock;
pub mod player;
pub mod profiling;
pub mod session;
pub mod toggle;
pub mod trigger;

pub use self::audio::*;
pub use self::boundary::*;
pub use self::components::*;
pub use self::control::*;
pub use self::encounter::*;
pub use self::input::*;
pub use self::peacock::*;
pub use self::player::*;
pub use self::profiling::*;
pub use self::session::*;
pub use self::toggle::*;
pub use self::trigger::*;

use bevy_ecs::event::EventReader;
use tracing::warn;

use crate::error::GameError;

/// Drains reported errors into the log. None of them stop the frame.
pub fn error_log_system(mut errors: EventReader<GameError>) {
    for error in errors.read() {
        warn!(%error, "Recoverable error");
    }
}
