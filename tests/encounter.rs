use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, PI};

use ghostwalk::systems::{facing_yaw, phase_fraction, EncounterPhase, Key, PhaseKind, SessionFlags};
use glam::Vec3;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

/// Quarter-second frames keep the session clock exact.
const STEP: f32 = 0.25;

fn kind(game: &ghostwalk::game::Game) -> PhaseKind {
    PhaseKind::from(game.phase())
}

/// Ticks until the session clock reads `seconds`.
fn run_until(game: &mut ghostwalk::game::Game, seconds: f32) {
    let frames = ((seconds - game.elapsed()) / STEP).round() as usize;
    common::run_frames(game, frames, STEP);
}

#[test]
fn test_phase_fraction() {
    assert_that(&phase_fraction(0.0, 12.0)).is_equal_to(0.0);
    assert_that(&phase_fraction(6.0, 12.0)).is_equal_to(0.5);
    assert_that(&phase_fraction(20.0, 12.0)).is_equal_to(1.0);
    assert_that(&phase_fraction(-1.0, 12.0)).is_equal_to(0.0);
    // Zero-length phases complete immediately
    assert_that(&phase_fraction(0.0, 0.0)).is_equal_to(1.0);
}

#[test]
fn test_facing_yaw() {
    assert_that(&facing_yaw(Vec3::ZERO, Vec3::new(0.0, 1.6, 5.0))).is_close_to(0.0, 1e-6);
    assert_that(&facing_yaw(Vec3::ZERO, Vec3::new(5.0, 1.6, 5.0))).is_close_to(FRAC_PI_4, 1e-6);
    assert_that(&facing_yaw(Vec3::ZERO, Vec3::new(-5.0, 0.0, 0.0))).is_close_to(-PI / 2.0, 1e-6);
    assert_that(&facing_yaw(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0)).abs()).is_close_to(PI, 1e-6);
}

#[test]
fn test_encounter_waits_for_session() {
    let mut game = common::new_game();
    common::run_frames(&mut game, 200, STEP);

    assert_eq!(game.phase(), EncounterPhase::Idle);
    assert_that(&game.elapsed()).is_equal_to(0.0);
}

#[test]
fn test_encounter_timeline() {
    let mut game = common::started_game();

    common::run_frames(&mut game, 47, STEP);
    assert_eq!(game.phase(), EncounterPhase::Idle);
    assert_that(&common::ghost(&mut game.world).1.visible).is_false();
    assert_that(&game.flags().contains(SessionFlags::MOVEMENT_LOCKED)).is_false();

    // t = 12
    common::run_frames(&mut game, 1, STEP);
    assert_eq!(game.phase(), EncounterPhase::Approaching);
    let (ghost, visual) = common::ghost(&mut game.world);
    assert_eq!(ghost.position, Vec3::new(0.0, 0.0, -14.0));
    assert_that(&visual.visible).is_true();
    assert_that(&game.flags().contains(SessionFlags::MOVEMENT_LOCKED)).is_true();
    assert_that(&game.snapshot().unwrap().ui.subtitle_visible).is_true();

    // t = 18, halfway in
    run_until(&mut game, 18.0);
    assert_that(&common::ghost(&mut game.world).0.position.distance(Vec3::new(0.0, 0.0, -7.0))).is_less_than(1e-5);

    // Where the camera stands when the ghost arrives decides where it turns
    run_until(&mut game, 23.75);
    common::place_camera(&mut game.world, Vec3::new(5.0, 1.6, 5.0), 0.0);

    // t = 24
    common::run_frames(&mut game, 1, STEP);
    assert_that(&kind(&game)).is_equal_to(PhaseKind::Facing);
    assert_eq!(common::ghost(&mut game.world).0.position, Vec3::ZERO);
    let EncounterPhase::Facing { target_yaw } = game.phase() else {
        panic!("Expected facing phase, got {:?}", game.phase());
    };
    assert_that(&target_yaw).is_close_to(FRAC_PI_4, 1e-6);

    run_until(&mut game, 25.0);
    assert_that(&common::ghost(&mut game.world).0.yaw).is_close_to(FRAC_PI_8, 1e-6);

    run_until(&mut game, 26.0);
    assert_eq!(game.phase(), EncounterPhase::Glowing);
    let (ghost, visual) = common::ghost(&mut game.world);
    assert_that(&ghost.yaw).is_close_to(FRAC_PI_4, 1e-6);
    assert_that(&visual.glowing).is_true();

    run_until(&mut game, 27.0);
    assert_eq!(
        game.phase(),
        EncounterPhase::Rushing {
            target: Vec3::new(5.0, 1.6, 5.0)
        }
    );
    assert_that(&game.snapshot().unwrap().ui.objective_visible).is_true();

    run_until(&mut game, 28.0);
    let ghost = common::ghost(&mut game.world).0;
    assert_that(&ghost.position.distance(Vec3::new(2.5, 0.8, 2.5))).is_less_than(1e-5);

    run_until(&mut game, 38.75);
    assert_that(&kind(&game)).is_equal_to(PhaseKind::Rushing);
    assert_eq!(common::ghost(&mut game.world).0.position, Vec3::new(5.0, 1.6, 5.0));

    run_until(&mut game, 39.0);
    assert_eq!(game.phase(), EncounterPhase::Resolved);
    let snapshot = game.snapshot().unwrap();
    assert_that(&snapshot.ghost_visual.visible).is_false();
    assert_that(&snapshot.ghost_visual.glowing).is_false();
    assert_that(&snapshot.ui.subtitle_visible).is_false();
    assert_that(&snapshot.ui.objective_visible).is_false();
    assert_that(&snapshot.flags.contains(SessionFlags::MOVEMENT_LOCKED)).is_false();
}

#[test]
fn test_phases_only_move_forward() {
    let mut game = common::started_game();
    let mut previous = kind(&game);

    for _ in 0..2600 {
        game.tick(1.0 / 60.0, Default::default());
        let current = kind(&game);
        assert_that(&current).is_greater_than_or_equal_to(previous);
        previous = current;
    }
    assert_that(&previous).is_equal_to(PhaseKind::Resolved);
}

#[test]
fn test_movement_locked_through_encounter() {
    let mut game = common::started_game();

    common::run_frames(&mut game, 1800, 1.0 / 60.0);
    assert_that(&kind(&game)).is_greater_than_or_equal_to(PhaseKind::Glowing);
    assert_that(&game.flags().contains(SessionFlags::MOVEMENT_LOCKED)).is_true();

    // Pressing forward while locked goes nowhere
    let before = common::camera_pose(&mut game.world);
    game.tick(1.0 / 60.0, common::press(Key::W));
    common::run_frames(&mut game, 30, 1.0 / 60.0);
    assert_eq!(common::camera_pose(&mut game.world).position, before.position);

    common::run_frames(&mut game, 2460 - 1831, 1.0 / 60.0);
    assert_eq!(game.phase(), EncounterPhase::Resolved);
    let snapshot = game.snapshot().unwrap();
    assert_that(&snapshot.ghost_visual.visible).is_false();
    assert_that(&snapshot.flags.contains(SessionFlags::MOVEMENT_LOCKED)).is_false();

    // W is still held from before, so the camera walks once unlocked
    game.tick(1.0 / 60.0, Default::default());
    assert_that(&common::camera_pose(&mut game.world).position.z).is_less_than(before.position.z);
}

#[test]
fn test_single_long_frame_resolves() {
    let mut game = common::started_game();

    game.tick(100.0, Default::default());

    assert_eq!(game.phase(), EncounterPhase::Resolved);
    let snapshot = game.snapshot().unwrap();
    assert_that(&snapshot.ghost_visual.visible).is_false();
    assert_that(&snapshot.flags.contains(SessionFlags::MOVEMENT_LOCKED)).is_false();
}

#[test]
fn test_long_frame_lands_on_same_phase_as_fine_frames() {
    let mut coarse = common::started_game();
    let mut fine = common::started_game();

    coarse.tick(25.0, Default::default());
    common::run_frames(&mut fine, 100, STEP);

    assert_eq!(coarse.phase(), fine.phase());
    let coarse_ghost = common::ghost(&mut coarse.world).0;
    let fine_ghost = common::ghost(&mut fine.world).0;
    assert_that(&coarse_ghost.position.distance(fine_ghost.position)).is_less_than(1e-5);
    assert_that(&coarse_ghost.yaw).is_close_to(fine_ghost.yaw, 1e-5);
}

#[test]
fn test_end_session_mid_approach() {
    let mut game = common::started_game();
    run_until(&mut game, 15.0);
    assert_that(&kind(&game)).is_equal_to(PhaseKind::Approaching);

    game.end_session().unwrap();

    assert_eq!(game.phase(), EncounterPhase::Resolved);
    let flags = game.flags();
    assert_that(&flags.contains(SessionFlags::SESSION_STARTED)).is_false();
    assert_that(&flags.contains(SessionFlags::MOVEMENT_LOCKED)).is_true();
    assert_that(&common::ghost(&mut game.world).1.visible).is_false();

    // Nothing advances afterwards
    let frozen = game.elapsed();
    common::run_frames(&mut game, 100, STEP);
    assert_that(&game.elapsed()).is_equal_to(frozen);
    assert_eq!(game.phase(), EncounterPhase::Resolved);

    // Ending twice is harmless
    game.end_session().unwrap();
}

#[test]
fn test_open_menu_pauses_encounter() {
    let mut game = common::started_game();
    run_until(&mut game, 10.0);

    game.tick(STEP, common::press(Key::Escape));
    common::run_frames(&mut game, 100, STEP);
    assert_eq!(game.phase(), EncounterPhase::Idle);
    assert_that(&game.elapsed()).is_equal_to(10.25);

    game.tick(STEP, common::release(Key::Escape));
    game.tick(STEP, common::press(Key::Escape));
    // Clock resumes the frame after closing
    run_until(&mut game, 12.0);
    assert_eq!(game.phase(), EncounterPhase::Approaching);
}

#[test]
fn test_restart_replays_encounter() {
    let mut game = common::started_game();
    game.tick(100.0, Default::default());
    assert_eq!(game.phase(), EncounterPhase::Resolved);

    game.restart().unwrap();

    assert_eq!(game.phase(), EncounterPhase::Idle);
    assert_that(&game.elapsed()).is_equal_to(0.0);
    assert_that(&game.flags().contains(SessionFlags::SESSION_STARTED)).is_true();
    assert_eq!(common::camera_pose(&mut game.world).position, Vec3::new(0.0, 1.6, 5.0));

    run_until(&mut game, 12.0);
    assert_eq!(game.phase(), EncounterPhase::Approaching);
}

#[test]
fn test_start_session_is_idempotent() {
    let mut game = common::started_game();
    run_until(&mut game, 5.0);

    game.start_session().unwrap();

    assert_that(&game.elapsed()).is_equal_to(5.0);
}
