// src/engine_lib/look.rs

use glam::{Vec2, Vec3};

use crate::engine_lib::transform::Transform;

pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Mouse-driven yaw/pitch written into the owner's transform every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseLook {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Degrees per pixel of mouse motion.
    pub sensitivity: f32,
}

impl MouseLook {
    pub fn new(sensitivity: f32) -> Self {
        Self { yaw_degrees: 0.0, pitch_degrees: 0.0, sensitivity }
    }

    /// Picks up the transform's current orientation so the first frame doesn't snap.
    pub fn start(&mut self, transform: &Transform) {
        self.pitch_degrees = transform.pitch_degrees();
        self.yaw_degrees = transform.yaw_degrees();
    }

    pub fn apply(&mut self, transform: &mut Transform, mouse_delta: Vec2) {
        self.yaw_degrees -= mouse_delta.x * self.sensitivity;
        self.pitch_degrees -= mouse_delta.y * self.sensitivity;
        self.pitch_degrees = self.pitch_degrees.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        transform.rotation = Vec3::new(self.pitch_degrees, self.yaw_degrees, 0.0);
    }
}
