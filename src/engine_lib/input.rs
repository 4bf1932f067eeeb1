// src/engine_lib/input.rs

use glam::Vec2;
use log::{debug, warn};
use winit::{
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

/// Everything the simulation reads from the player in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// True only on the frame the jump key went down.
    pub jump_pressed: bool,
    /// Mouse motion in pixels since the previous frame.
    pub mouse_delta: Vec2,
}

impl FrameInput {
    /// (forward, right) axes in [-1, 1], shortened so diagonals have length 1.
    pub fn move_axes(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        let axes = Vec2::new(axis(self.forward, self.back), axis(self.right, self.left));
        let len = axes.length();
        if len > 1.0 {
            axes / len
        } else {
            axes
        }
    }
}

#[derive(Debug, Default)]
struct HeldKeys {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    jump: bool,
}

/// Turns winit events into per-frame [`FrameInput`] samples.
#[derive(Debug, Default)]
pub struct InputCollector {
    held: HeldKeys,
    jump_edge: bool,
    mouse_accum: Vec2,
    cursor_grabbed: bool,
}

impl InputCollector {
    pub fn new(cursor_grabbed: bool) -> Self {
        Self { cursor_grabbed, ..Self::default() }
    }

    pub fn cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }

    /// Returns true when the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let pressed = key_event.state == ElementState::Pressed;
                match key_event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => {
                        if pressed {
                            self.toggle_cursor_grab(window);
                        }
                        true
                    }
                    PhysicalKey::Code(code) => self.set_key(code, pressed, key_event.repeat),
                    _ => false,
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !self.cursor_grabbed && *state == ElementState::Pressed && *button == MouseButton::Left {
                    self.grab_cursor(window, true);
                    return true;
                }
                false
            }
            WindowEvent::Focused(focused) => {
                if !*focused {
                    self.held = HeldKeys::default();
                    if self.cursor_grabbed {
                        self.grab_cursor(window, false);
                    }
                }
                false
            }
            _ => false,
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if !self.cursor_grabbed {
            self.mouse_accum = Vec2::ZERO;
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse_accum += Vec2::new(*dx as f32, *dy as f32);
        }
    }

    /// Snapshot for this frame; clears the jump edge and mouse accumulator.
    pub fn sample(&mut self) -> FrameInput {
        let input = FrameInput {
            forward: self.held.forward,
            back: self.held.back,
            left: self.held.left,
            right: self.held.right,
            jump_pressed: self.jump_edge,
            mouse_delta: self.mouse_accum,
        };
        self.jump_edge = false;
        self.mouse_accum = Vec2::ZERO;
        input
    }

    fn set_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> bool {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.held.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.held.back = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.held.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.held.right = pressed,
            KeyCode::Space => {
                if pressed && !repeat && !self.held.jump {
                    self.jump_edge = true;
                }
                self.held.jump = pressed;
            }
            _ => return false,
        }
        true
    }

    pub fn toggle_cursor_grab(&mut self, window: &Window) {
        self.grab_cursor(window, !self.cursor_grabbed);
    }

    fn grab_cursor(&mut self, window: &Window, grab: bool) {
        if grab == self.cursor_grabbed {
            return;
        }
        if grab {
            if window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_e| window.set_cursor_grab(CursorGrabMode::Locked))
                .is_ok()
            {
                window.set_cursor_visible(false);
                self.cursor_grabbed = true;
                debug!("cursor grabbed");
            } else {
                warn!("could not grab cursor");
            }
        } else if window.set_cursor_grab(CursorGrabMode::None).is_ok() {
            window.set_cursor_visible(true);
            self.cursor_grabbed = false;
            self.mouse_accum = Vec2::ZERO;
            debug!("cursor released");
        } else {
            warn!("could not release cursor");
        }
    }
}
