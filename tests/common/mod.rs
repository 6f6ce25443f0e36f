#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use bevy_ecs::{event::Events, query::With, world::World};
use ghostwalk::{
    audio::{AudioHost, Cue, NullAudio},
    error::{AudioError, GameError, PointerError},
    events::GameEvent,
    game::Game,
    pointer::{GrantingPointer, PointerHost},
    systems::{Ghost, GhostVisual, InputFrame, Key, KeyEvent, PlayerControlled, Pose},
};
use glam::Vec3;

/// Everything the audio host was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play { cue: Cue, looping: bool },
    Stop(Cue),
    Level(Cue, f32),
}

pub type AudioLog = Rc<RefCell<Vec<AudioCall>>>;

/// An audio host that records calls and can be told cue lengths or to refuse playback.
#[derive(Default)]
pub struct RecordingAudio {
    log: AudioLog,
    durations: HashMap<Cue, f32>,
    refused: HashSet<Cue>,
}

impl RecordingAudio {
    pub fn new() -> (Self, AudioLog) {
        let audio = Self::default();
        let log = audio.log.clone();
        (audio, log)
    }

    pub fn with_duration(mut self, cue: Cue, seconds: f32) -> Self {
        self.durations.insert(cue, seconds);
        self
    }

    pub fn refusing(mut self, cue: Cue) -> Self {
        self.refused.insert(cue);
        self
    }
}

impl AudioHost for RecordingAudio {
    fn play(&mut self, cue: Cue, looping: bool) -> Result<(), AudioError> {
        self.log.borrow_mut().push(AudioCall::Play { cue, looping });
        if self.refused.contains(&cue) {
            return Err(AudioError::PlaybackRefused {
                cue,
                reason: "autoplay blocked".to_string(),
            });
        }
        Ok(())
    }

    fn stop(&mut self, cue: Cue) {
        self.log.borrow_mut().push(AudioCall::Stop(cue));
    }

    fn set_level(&mut self, cue: Cue, level: f32) {
        self.log.borrow_mut().push(AudioCall::Level(cue, level));
    }

    fn duration(&self, cue: Cue) -> Option<f32> {
        self.durations.get(&cue).copied()
    }
}

/// Number of times `cue` was started.
pub fn plays(log: &AudioLog, cue: Cue) -> usize {
    log.borrow()
        .iter()
        .filter(|call| matches!(call, AudioCall::Play { cue: played, .. } if *played == cue))
        .count()
}

/// Counts capture requests and releases; grants or refuses according to `grant`.
#[derive(Clone, Default)]
pub struct ScriptedPointer {
    pub grant: Rc<Cell<bool>>,
    pub requests: Rc<Cell<u32>>,
    pub releases: Rc<Cell<u32>>,
}

impl ScriptedPointer {
    pub fn granting() -> Self {
        let pointer = Self::default();
        pointer.grant.set(true);
        pointer
    }

    pub fn refusing() -> Self {
        Self::default()
    }
}

impl PointerHost for ScriptedPointer {
    fn request_capture(&mut self) -> Result<(), PointerError> {
        self.requests.set(self.requests.get() + 1);
        if self.grant.get() {
            Ok(())
        } else {
            Err(PointerError::CaptureRefused("no user gesture".to_string()))
        }
    }

    fn release_capture(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

pub fn new_game() -> Game {
    Game::new(Box::new(NullAudio), Box::new(GrantingPointer))
}

pub fn started_game() -> Game {
    let mut game = new_game();
    game.start_session().expect("Session should start");
    game
}

/// Ticks `game` with no input for `frames` frames of `dt` seconds.
pub fn run_frames(game: &mut Game, frames: usize, dt: f32) {
    for _ in 0..frames {
        game.tick(dt, InputFrame::default());
    }
}

pub fn press(key: Key) -> InputFrame {
    InputFrame::with_events([KeyEvent::Down(key)])
}

pub fn release(key: Key) -> InputFrame {
    InputFrame::with_events([KeyEvent::Up(key)])
}

pub fn camera_pose(world: &mut World) -> Pose {
    *world
        .query_filtered::<&Pose, With<PlayerControlled>>()
        .single(world)
        .expect("Exactly one camera")
}

/// Moves the camera from outside the motion controller, as a host teleport would.
pub fn place_camera(world: &mut World, position: Vec3, yaw: f32) {
    let mut pose = world
        .query_filtered::<&mut Pose, With<PlayerControlled>>()
        .single_mut(world)
        .expect("Exactly one camera");
    pose.position = position;
    pose.yaw = yaw;
}

pub fn ghost(world: &mut World) -> (Pose, GhostVisual) {
    let (pose, visual) = world
        .query_filtered::<(&Pose, &GhostVisual), With<Ghost>>()
        .single(world)
        .expect("Exactly one ghost");
    (*pose, *visual)
}

pub fn count_gaze_events(world: &mut World) -> usize {
    world
        .resource_mut::<Events<GameEvent>>()
        .drain()
        .filter(|event| *event == GameEvent::GazeConfirmed)
        .count()
}

pub fn error_count(world: &World) -> usize {
    world.resource::<Events<GameError>>().len()
}
