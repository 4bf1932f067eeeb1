// src/engine_lib/camera.rs

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;
use crate::engine_lib::transform::Transform;

/// Perspective camera riding on a node's transform at `eye_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_rad: f32,
    pub znear: f32,
    pub zfar: f32,
    pub eye_offset: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(fov_y_deg: f32, znear: f32, zfar: f32) -> Self {
        Self { fov_y_rad: fov_y_deg.to_radians(), znear, zfar, eye_offset: Vec3::ZERO }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            eye_offset: Vec3::from_array(config.eye_offset),
            ..Self::new(config.fov_y_degrees, config.znear, config.zfar)
        }
    }

    pub fn eye(&self, host: &Transform) -> Vec3 {
        host.position + self.eye_offset
    }

    /// World space to camera space (right-handed, looking down -Z).
    pub fn view_matrix(&self, host: &Transform) -> Mat4 {
        Mat4::look_to_rh(self.eye(host), host.forward(), host.up())
    }

    /// Projects a camera-space point to pixels; `None` outside the near/far range.
    pub fn project_camera_space_to_screen(&self, p_cam: Vec3, screen_width: f32, screen_height: f32) -> Option<Vec2> {
        let depth = -p_cam.z;
        if depth < self.znear - 1e-6 || depth > self.zfar || screen_height <= 0.0 {
            return None;
        }

        let focal_y = 1.0 / (self.fov_y_rad * 0.5).tan();
        let focal_x = focal_y / (screen_width / screen_height);

        let ndc_x = p_cam.x * focal_x / depth;
        let ndc_y = p_cam.y * focal_y / depth;

        // Screen y grows downward.
        Some(Vec2::new((ndc_x + 1.0) * 0.5 * screen_width, (1.0 - ndc_y) * 0.5 * screen_height))
    }

    /// Depth-buffer value for a camera-space distance `depth`: 0 at znear, 1 at zfar.
    pub fn depth_value(&self, depth: f32) -> f32 {
        self.zfar * (depth - self.znear) / (depth * (self.zfar - self.znear))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eye_sits_above_the_host() {
        let camera = Camera::default();
        let host = Transform::from_position(Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(camera.eye(&host), Vec3::new(1.0, 1.8, 2.0));
    }

    #[test]
    fn point_ahead_lands_in_screen_centre() {
        let camera = Camera::default();
        let host = Transform::default();
        let view = camera.view_matrix(&host);
        let ahead = view.transform_point3(camera.eye(&host) + host.forward() * 5.0);
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ahead.z, -5.0, epsilon = 1e-5);
        let px = camera.project_camera_space_to_screen(ahead, 800.0, 600.0).unwrap();
        assert_relative_eq!(px.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(px.y, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn points_behind_or_too_close_are_rejected() {
        let camera = Camera::new(60.0, 0.1, 50.0);
        assert!(camera.project_camera_space_to_screen(Vec3::new(0.0, 0.0, 1.0), 800.0, 600.0).is_none());
        assert!(camera.project_camera_space_to_screen(Vec3::new(0.0, 0.0, -0.01), 800.0, 600.0).is_none());
        assert!(camera.project_camera_space_to_screen(Vec3::new(0.0, 0.0, -60.0), 800.0, 600.0).is_none());
    }

    #[test]
    fn depth_value_spans_the_clip_range() {
        let camera = Camera::new(60.0, 0.5, 100.0);
        assert_relative_eq!(camera.depth_value(0.5), 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.depth_value(100.0), 1.0, epsilon = 1e-6);
        assert!(camera.depth_value(10.0) < camera.depth_value(20.0));
    }

    #[test]
    fn up_in_camera_space_is_up_on_screen() {
        let camera = Camera::new(90.0, 0.1, 50.0);
        let px = camera.project_camera_space_to_screen(Vec3::new(0.0, 1.0, -2.0), 100.0, 100.0).unwrap();
        assert!(px.y < 50.0);
    }
}
