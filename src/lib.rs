//! Simulation core for a first-person haunted-room walkthrough.
//!
//! The crate owns camera motion, the room boundary, spatial triggers, the flashlight and menu
//! toggles and the scripted ghost encounter. Rendering, audio playback and pointer capture belong
//! to the host, which feeds input in and reads a [`snapshot::FrameSnapshot`] back each frame.

pub mod app;
pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod pointer;
pub mod snapshot;
pub mod systems;
