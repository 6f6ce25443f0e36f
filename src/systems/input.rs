use std::collections::{HashMap, HashSet};

use bevy_ecs::{
    resource::Resource,
    system::{Res, ResMut},
};
use bitflags::bitflags;
use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};
use tracing::trace;

/// Physical keys the core understands. The host maps its own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    F,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

bitflags! {
    /// Directional intents currently held.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MovementIntents: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(MovementIntents),
    Flashlight,
    Menu,
}

#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    key_bindings: HashMap<Key, Action>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Movement
        key_bindings.insert(Key::W, Action::Move(MovementIntents::FORWARD));
        key_bindings.insert(Key::Up, Action::Move(MovementIntents::FORWARD));
        key_bindings.insert(Key::S, Action::Move(MovementIntents::BACKWARD));
        key_bindings.insert(Key::Down, Action::Move(MovementIntents::BACKWARD));
        key_bindings.insert(Key::A, Action::Move(MovementIntents::LEFT));
        key_bindings.insert(Key::Left, Action::Move(MovementIntents::LEFT));
        key_bindings.insert(Key::D, Action::Move(MovementIntents::RIGHT));
        key_bindings.insert(Key::Right, Action::Move(MovementIntents::RIGHT));

        // Toggles
        key_bindings.insert(Key::F, Action::Flashlight);
        key_bindings.insert(Key::Escape, Action::Menu);

        Self { key_bindings }
    }
}

impl Bindings {
    pub fn action(&self, key: Key) -> Option<Action> {
        self.key_bindings.get(&key).copied()
    }

    /// Rebinds `key`, replacing whatever it did before.
    pub fn bind(&mut self, key: Key, action: Action) {
        self.key_bindings.insert(key, action);
    }
}

/// Raw input delivered by the host for one frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputFrame {
    pub events: SmallVec<[KeyEvent; 8]>,
    /// Pointer movement since the previous frame, in pixels.
    pub look_delta: Vec2,
}

impl InputFrame {
    pub fn with_events(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            look_delta: Vec2::ZERO,
        }
    }

    pub fn look(delta: Vec2) -> Self {
        Self {
            events: SmallVec::new(),
            look_delta: delta,
        }
    }
}

/// Input as seen by the gameplay systems.
///
/// Held keys persist across frames until an `Up` arrives. The press flags are raw levels, true
/// while a bound key is down (or was tapped during this frame); edge detection happens in the
/// toggle handlers.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pub intents: MovementIntents,
    pub flashlight_pressed: bool,
    pub menu_pressed: bool,
    pub look_delta: Vec2,
}

impl InputState {
    /// Folds one frame of raw events into the held set and recomputes the derived fields.
    pub fn apply(&mut self, bindings: &Bindings, frame: &InputFrame) {
        let mut tapped_flashlight = false;
        let mut tapped_menu = false;

        for event in &frame.events {
            match *event {
                KeyEvent::Down(key) => {
                    self.held.insert(key);
                    match bindings.action(key) {
                        Some(Action::Flashlight) => tapped_flashlight = true,
                        Some(Action::Menu) => tapped_menu = true,
                        _ => {}
                    }
                }
                KeyEvent::Up(key) => {
                    self.held.remove(&key);
                }
            }
        }

        let mut intents = MovementIntents::empty();
        let mut flashlight = tapped_flashlight;
        let mut menu = tapped_menu;
        for key in &self.held {
            match bindings.action(*key) {
                Some(Action::Move(intent)) => intents |= intent,
                Some(Action::Flashlight) => flashlight = true,
                Some(Action::Menu) => menu = true,
                None => {}
            }
        }

        if intents != self.intents {
            trace!(?intents, "Held movement intents changed");
        }

        self.intents = intents;
        self.flashlight_pressed = flashlight;
        self.menu_pressed = menu;
        self.look_delta = frame.look_delta;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

pub fn input_system(bindings: Res<Bindings>, frame: Res<InputFrame>, mut state: ResMut<InputState>) {
    state.apply(&bindings, &frame);
}
