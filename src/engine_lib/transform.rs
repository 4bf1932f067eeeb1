// src/engine_lib/transform.rs

use glam::Vec3;

/// Vectors shorter than this are treated as zero instead of being normalized.
pub const DEGENERATE_LENGTH: f32 = 1e-4;

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Position, Euler rotation and scale of a scene node.
///
/// `rotation` holds pitch (x), yaw (y) and roll (z) in degrees. Yaw 0 faces +Z.
/// Roll is stored but does not take part in the basis vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation = rotation_degrees;
        self
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.rotation.x
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.rotation.y
    }

    pub fn forward(&self) -> Vec3 {
        let pitch = self.rotation.x.to_radians();
        let yaw = self.rotation.y.to_radians();
        Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos()).normalize_or_zero()
    }

    /// `forward × WORLD_UP`. Falls back to the yaw-0 right vector when looking straight up or down.
    pub fn right(&self) -> Vec3 {
        let r = self.forward().cross(WORLD_UP);
        if r.length() < DEGENERATE_LENGTH {
            Vec3::NEG_X
        } else {
            r.normalize()
        }
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    pub fn rotate(&mut self, euler_delta_degrees: Vec3) {
        self.rotation += euler_delta_degrees;
    }
}

/// Drops the vertical component and renormalizes; degenerate results become zero.
pub fn planar(direction: Vec3) -> Vec3 {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length() > DEGENERATE_LENGTH {
        flat.normalize()
    } else {
        Vec3::ZERO
    }
}
