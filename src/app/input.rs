//! Platform-agnostic input state
//!
//! Holds the pointer state the scene logic needs (buttons, cursor, scroll,
//! window size) without depending on any windowing library. The winit
//! adapter translates platform events into these types.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Cursor travel (in physical pixels) between press and release beyond
/// which a release counts as a drag rather than a click.
pub const CLICK_DRAG_THRESHOLD: f32 = 4.0;

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic input state container
#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_mouse: FxHashSet<MouseButton>,
    just_pressed_mouse: FxHashSet<MouseButton>,
    just_released_mouse: FxHashSet<MouseButton>,

    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    cursor_inside: bool,

    /// Cursor position at the last left press and the travel since.
    press_origin: Option<Vec2>,
    press_travel: f32,
    /// Set for the frame in which a left press is released without dragging.
    click: Option<Vec2>,

    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the runner / adapter) ==========

    /// Clears per-frame state (just pressed/released, deltas, clicks).
    pub fn start_frame(&mut self) {
        self.just_pressed_mouse.clear();
        self.just_released_mouse.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
        self.click = None;
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_mouse.insert(button) {
                    self.just_pressed_mouse.insert(button);
                    if button == MouseButton::Left {
                        self.press_origin = Some(self.mouse_position);
                        self.press_travel = 0.0;
                    }
                }
            }
            ButtonState::Released => {
                if self.pressed_mouse.remove(&button) {
                    self.just_released_mouse.insert(button);
                    if button == MouseButton::Left
                        && self.press_origin.take().is_some()
                        && self.press_travel <= CLICK_DRAG_THRESHOLD
                    {
                        self.click = Some(self.mouse_position);
                    }
                }
            }
        }
    }

    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        if self.cursor_inside {
            let step = new_pos - self.mouse_position;
            self.mouse_delta += step;
            if self.press_origin.is_some() {
                self.press_travel += step.length();
            }
        }
        self.mouse_position = new_pos;
        self.cursor_inside = true;
    }

    pub fn inject_cursor_left(&mut self) {
        self.cursor_inside = false;
    }

    pub fn inject_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta += Vec2::new(delta_x, delta_y);
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========== User API ==========

    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_down(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_up(&self, button: MouseButton) -> bool {
        self.just_released_mouse.contains(&button)
    }

    /// Position of a left click completed this frame, if any.
    #[must_use]
    pub fn click(&self) -> Option<Vec2> {
        self.click
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// `None` while the cursor is outside the window.
    #[must_use]
    pub fn hover_position(&self) -> Option<Vec2> {
        self.cursor_inside.then_some(self.mouse_position)
    }

    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}
