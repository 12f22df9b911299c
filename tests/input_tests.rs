//! Input Tests
//!
//! Tests for:
//! - Click vs drag classification
//! - Per-frame edge state (just pressed / released, click, deltas)
//! - Cursor enter/leave and hover position

use glam::Vec2;

use journey::app::input::{ButtonState, CLICK_DRAG_THRESHOLD, Input, MouseButton};

fn press(input: &mut Input) {
    input.inject_mouse_button(MouseButton::Left, ButtonState::Pressed);
}

fn release(input: &mut Input) {
    input.inject_mouse_button(MouseButton::Left, ButtonState::Released);
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn press_and_release_in_place_is_a_click() {
    let mut input = Input::new();
    input.inject_mouse_position(100.0, 50.0);
    press(&mut input);
    assert!(input.click().is_none());
    release(&mut input);
    assert_eq!(input.click(), Some(Vec2::new(100.0, 50.0)));
}

#[test]
fn small_jitter_is_still_a_click() {
    let mut input = Input::new();
    input.inject_mouse_position(100.0, 50.0);
    press(&mut input);
    input.inject_mouse_position(102.0, 51.0);
    release(&mut input);
    assert_eq!(input.click(), Some(Vec2::new(102.0, 51.0)));
}

#[test]
fn drag_is_not_a_click() {
    let mut input = Input::new();
    input.inject_mouse_position(100.0, 50.0);
    press(&mut input);
    input.inject_mouse_position(100.0 + CLICK_DRAG_THRESHOLD * 3.0, 50.0);
    release(&mut input);
    assert!(input.click().is_none());
}

#[test]
fn drag_out_and_back_is_not_a_click() {
    let mut input = Input::new();
    input.inject_mouse_position(100.0, 50.0);
    press(&mut input);
    input.inject_mouse_position(120.0, 50.0);
    input.inject_mouse_position(100.0, 50.0);
    release(&mut input);
    assert!(input.click().is_none());
}

#[test]
fn right_button_never_clicks() {
    let mut input = Input::new();
    input.inject_mouse_position(10.0, 10.0);
    input.inject_mouse_button(MouseButton::Right, ButtonState::Pressed);
    input.inject_mouse_button(MouseButton::Right, ButtonState::Released);
    assert!(input.click().is_none());
    assert!(input.get_mouse_button_up(MouseButton::Right));
}

#[test]
fn release_without_press_is_ignored() {
    let mut input = Input::new();
    input.inject_mouse_position(10.0, 10.0);
    release(&mut input);
    assert!(input.click().is_none());
    assert!(!input.get_mouse_button_up(MouseButton::Left));
}

// ============================================================================
// Frame state
// ============================================================================

#[test]
fn start_frame_clears_edges() {
    let mut input = Input::new();
    input.inject_mouse_position(0.0, 0.0);
    press(&mut input);
    assert!(input.get_mouse_button_down(MouseButton::Left));
    assert!(input.get_mouse_button(MouseButton::Left));

    input.start_frame();
    assert!(!input.get_mouse_button_down(MouseButton::Left));
    assert!(input.get_mouse_button(MouseButton::Left));

    release(&mut input);
    assert!(input.get_mouse_button_up(MouseButton::Left));
    assert!(input.click().is_some());

    input.start_frame();
    assert!(input.click().is_none());
    assert!(!input.get_mouse_button_up(MouseButton::Left));
    assert!(!input.get_mouse_button(MouseButton::Left));
}

#[test]
fn deltas_accumulate_within_a_frame() {
    let mut input = Input::new();
    input.inject_mouse_position(10.0, 10.0);
    // Entering the window does not count as motion.
    assert_eq!(input.mouse_delta(), Vec2::ZERO);

    input.inject_mouse_position(15.0, 10.0);
    input.inject_mouse_position(15.0, 7.0);
    assert_eq!(input.mouse_delta(), Vec2::new(5.0, -3.0));

    input.inject_scroll(0.0, 1.0);
    input.inject_scroll(0.0, 2.0);
    assert_eq!(input.scroll_delta(), Vec2::new(0.0, 3.0));

    input.start_frame();
    assert_eq!(input.mouse_delta(), Vec2::ZERO);
    assert_eq!(input.scroll_delta(), Vec2::ZERO);
}

#[test]
fn resize_updates_screen_size() {
    let mut input = Input::new();
    input.inject_resize(1280, 720);
    assert_eq!(input.screen_size(), Vec2::new(1280.0, 720.0));
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn hover_position_tracks_cursor_presence() {
    let mut input = Input::new();
    assert!(input.hover_position().is_none());

    input.inject_mouse_position(40.0, 30.0);
    assert_eq!(input.hover_position(), Some(Vec2::new(40.0, 30.0)));

    input.inject_cursor_left();
    assert!(input.hover_position().is_none());

    // Re-entering elsewhere is not a motion delta.
    input.start_frame();
    input.inject_mouse_position(400.0, 300.0);
    assert_eq!(input.mouse_delta(), Vec2::ZERO);
    assert_eq!(input.hover_position(), Some(Vec2::new(400.0, 300.0)));
}
