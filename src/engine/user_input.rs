//! Input handling (winit -> host commands).
//!
//! `Windowing` feeds every window event in here; once per frame the
//! gathered state is turned into `HostCommand`s for the scene runtime.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::Key;

use crate::engine::command_queue::CommandQueue;

/// Pixels per wheel "line" for devices that report lines.
const LINE_HEIGHT_PX: f32 = 40.0;

/// Number keys jump between the site's top-level routes.
const KEY_ROUTES: [(&str, &str); 6] = [
    ("1", "/"),
    ("2", "/about"),
    ("3", "/lab"),
    ("4", "/basketball"),
    ("5", "/showcase"),
    ("6", "/blog"),
];

pub fn route_for_key(key: &Key) -> Option<&'static str> {
    match key {
        Key::Character(c) => KEY_ROUTES
            .iter()
            .find(|(k, _)| *k == c.as_str())
            .map(|(_, route)| *route),
        _ => None,
    }
}

/// Snapshot of user input.
///
/// - current key/button state (`down`)
/// - per-frame transitions (`pressed`)
/// - cursor position and wheel delta
#[derive(Default, Debug, Clone)]
pub struct InputState {
    pub keys_down: HashSet<Key>,
    pub keys_pressed: HashSet<Key>,

    pub mouse_down: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,

    /// Cursor position in physical pixels (as reported by winit).
    pub cursor_pos: Option<(f32, f32)>,
    cursor_moved: bool,

    /// Accumulated vertical wheel delta in pixels since last `begin_frame`.
    /// Positive scrolls the page down.
    pub wheel_delta: f32,
}

impl InputState {
    /// Clears per-frame transition state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.wheel_delta = 0.0;
        self.cursor_moved = false;
    }

    /// Any click, key press or wheel this frame.
    pub fn interacted(&self) -> bool {
        !self.keys_pressed.is_empty() || !self.mouse_pressed.is_empty() || self.wheel_delta != 0.0
    }
}

/// Stateful input event processor.
#[derive(Debug, Clone)]
pub struct UserInput {
    state: InputState,
    viewport: (f32, f32),
}

impl UserInput {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            state: InputState::default(),
            viewport: (width, height),
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    pub fn begin_frame(&mut self) {
        self.state.begin_frame();
    }

    /// Cursor in normalized device coordinates (x right, y up, both in [-1, 1]).
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        let (x, y) = self.state.cursor_pos?;
        let (w, h) = self.viewport;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(x / w * 2.0 - 1.0, 1.0 - y / h * 2.0);
        Some(ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)))
    }

    /// Turn this frame's input into host commands.
    pub fn emit_commands(&self, queue: &mut CommandQueue) {
        for key in &self.state.keys_pressed {
            if let Some(route) = route_for_key(key) {
                queue.queue_navigate(route);
            }
        }
        if self.state.wheel_delta != 0.0 {
            queue.queue_scroll(self.state.wheel_delta);
        }
        if self.state.cursor_moved {
            if let Some(ndc) = self.pointer_ndc() {
                queue.queue_pointer(ndc);
            }
        }
    }

    /// Feed a winit event into this input handler.
    ///
    /// Returns `true` if the event was recognized/consumed as input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let key = event.logical_key.clone();
                match event.state {
                    ElementState::Pressed => {
                        let was_down = self.state.keys_down.contains(&key);
                        self.state.keys_down.insert(key.clone());
                        if !was_down {
                            self.state.keys_pressed.insert(key);
                        }
                    }
                    ElementState::Released => {
                        self.state.keys_down.remove(&key);
                    }
                }
                true
            }

            WindowEvent::MouseInput { state, button, .. } => {
                match state {
                    ElementState::Pressed => {
                        let was_down = self.state.mouse_down.contains(button);
                        self.state.mouse_down.insert(*button);
                        if !was_down {
                            self.state.mouse_pressed.insert(*button);
                        }
                    }
                    ElementState::Released => {
                        self.state.mouse_down.remove(button);
                    }
                }
                true
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor_pos = Some((position.x as f32, position.y as f32));
                self.state.cursor_moved = true;
                true
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports "up" as positive; the page scrolls the other way.
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * LINE_HEIGHT_PX,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.state.wheel_delta -= dy;
                true
            }

            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NamedKey;

    #[test]
    fn number_keys_map_to_routes() {
        assert_eq!(route_for_key(&Key::Character("2".into())), Some("/about"));
        assert_eq!(route_for_key(&Key::Character("6".into())), Some("/blog"));
        assert_eq!(route_for_key(&Key::Character("9".into())), None);
        assert_eq!(route_for_key(&Key::Named(NamedKey::Escape)), None);
    }

    #[test]
    fn cursor_maps_to_ndc() {
        let mut input = UserInput::new(200.0, 100.0);
        assert_eq!(input.pointer_ndc(), None);

        input.state_mut().cursor_pos = Some((200.0, 0.0));
        assert_eq!(input.pointer_ndc(), Some(Vec2::new(1.0, 1.0)));

        input.state_mut().cursor_pos = Some((100.0, 50.0));
        assert_eq!(input.pointer_ndc(), Some(Vec2::ZERO));

        input.state_mut().cursor_pos = Some((-50.0, 400.0));
        assert_eq!(input.pointer_ndc(), Some(Vec2::new(-1.0, -1.0)));
    }

    #[test]
    fn frame_input_becomes_commands() {
        let mut input = UserInput::new(200.0, 100.0);
        input.state_mut().keys_pressed.insert(Key::Character("3".into()));
        input.state_mut().wheel_delta = 120.0;
        assert!(input.state().interacted());

        let mut queue = CommandQueue::new();
        input.emit_commands(&mut queue);
        assert_eq!(queue.len(), 2);

        input.begin_frame();
        assert!(!input.state().interacted());
        let mut queue = CommandQueue::new();
        input.emit_commands(&mut queue);
        assert!(queue.is_empty());
    }
}
