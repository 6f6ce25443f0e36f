use ghostwalk::systems::{Action, Bindings, InputFrame, InputState, Key, KeyEvent, MovementIntents};
use glam::Vec2;
use speculoos::prelude::*;

fn apply(state: &mut InputState, events: &[KeyEvent]) {
    state.apply(&Bindings::default(), &InputFrame::with_events(events.iter().copied()));
}

#[test]
fn test_default_bindings() {
    let bindings = Bindings::default();

    assert_that(&bindings.action(Key::W)).is_equal_to(Some(Action::Move(MovementIntents::FORWARD)));
    assert_that(&bindings.action(Key::Up)).is_equal_to(Some(Action::Move(MovementIntents::FORWARD)));
    assert_that(&bindings.action(Key::S)).is_equal_to(Some(Action::Move(MovementIntents::BACKWARD)));
    assert_that(&bindings.action(Key::A)).is_equal_to(Some(Action::Move(MovementIntents::LEFT)));
    assert_that(&bindings.action(Key::Right)).is_equal_to(Some(Action::Move(MovementIntents::RIGHT)));
    assert_that(&bindings.action(Key::F)).is_equal_to(Some(Action::Flashlight));
    assert_that(&bindings.action(Key::Escape)).is_equal_to(Some(Action::Menu));
}

#[test]
fn test_held_keys_persist_without_events() {
    let mut state = InputState::default();

    apply(&mut state, &[KeyEvent::Down(Key::W), KeyEvent::Down(Key::D)]);
    assert_that(&state.intents).is_equal_to(MovementIntents::FORWARD | MovementIntents::RIGHT);

    for _ in 0..10 {
        apply(&mut state, &[]);
    }
    assert_that(&state.intents).is_equal_to(MovementIntents::FORWARD | MovementIntents::RIGHT);

    apply(&mut state, &[KeyEvent::Up(Key::D)]);
    assert_that(&state.intents).is_equal_to(MovementIntents::FORWARD);
}

#[test]
fn test_two_keys_for_one_intent() {
    let mut state = InputState::default();

    apply(&mut state, &[KeyEvent::Down(Key::W), KeyEvent::Down(Key::Up)]);
    apply(&mut state, &[KeyEvent::Up(Key::W)]);

    // Up still holds the forward intent
    assert_that(&state.intents).is_equal_to(MovementIntents::FORWARD);
    assert_that(&state.is_held(Key::Up)).is_true();
    assert_that(&state.is_held(Key::W)).is_false();
}

#[test]
fn test_press_levels() {
    let mut state = InputState::default();

    apply(&mut state, &[KeyEvent::Down(Key::F)]);
    assert_that(&state.flashlight_pressed).is_true();
    assert_that(&state.menu_pressed).is_false();

    // Still held
    apply(&mut state, &[]);
    assert_that(&state.flashlight_pressed).is_true();

    apply(&mut state, &[KeyEvent::Up(Key::F)]);
    assert_that(&state.flashlight_pressed).is_false();
}

#[test]
fn test_tap_within_one_frame_registers() {
    let mut state = InputState::default();

    apply(&mut state, &[KeyEvent::Down(Key::Escape), KeyEvent::Up(Key::Escape)]);
    assert_that(&state.menu_pressed).is_true();
    assert_that(&state.is_held(Key::Escape)).is_false();

    apply(&mut state, &[]);
    assert_that(&state.menu_pressed).is_false();
}

#[test]
fn test_look_delta_is_per_frame() {
    let mut state = InputState::default();
    let bindings = Bindings::default();

    state.apply(&bindings, &InputFrame::look(Vec2::new(12.0, -3.0)));
    assert_that(&state.look_delta).is_equal_to(Vec2::new(12.0, -3.0));

    state.apply(&bindings, &InputFrame::default());
    assert_that(&state.look_delta).is_equal_to(Vec2::ZERO);
}

#[test]
fn test_rebinding() {
    let mut bindings = Bindings::default();
    bindings.bind(Key::F, Action::Menu);

    let mut state = InputState::default();
    state.apply(&bindings, &InputFrame::with_events([KeyEvent::Down(Key::F)]));

    assert_that(&state.menu_pressed).is_true();
    assert_that(&state.flashlight_pressed).is_false();
}
