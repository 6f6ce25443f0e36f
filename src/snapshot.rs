use crate::systems::{EncounterPhase, GhostVisual, Pose, Prop, SessionFlags, UiSignals};

/// Everything the render and UI collaborators need for one frame, copied out of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub camera: Pose,
    /// Camera pitch in radians.
    pub pitch: f32,
    pub ghost: Pose,
    pub ghost_visual: GhostVisual,
    pub prop: Prop,
    pub ui: UiSignals,
    pub flags: SessionFlags,
    pub phase: EncounterPhase,
}

impl FrameSnapshot {
    pub fn flashlight_on(&self) -> bool {
        self.flags.contains(SessionFlags::FLASHLIGHT_ON)
    }

    pub fn menu_open(&self) -> bool {
        self.flags.contains(SessionFlags::MENU_OPEN)
    }
}
