// src/rendering_lib/painter.rs
//! CPU half of box drawing: the camera-facing faces of every mesh node,
//! clipped to the near plane, projected, lit and ordered far to near.

use glam::Vec3;

use crate::config::RenderConfig;
use crate::engine_lib::camera::Camera;
use crate::engine_lib::scene_types::Scene;
use crate::engine_lib::transform::Transform;

/// Corner indices into [`Aabb::corners`](crate::engine_lib::collider::Aabb::corners) and the outward normal.
const BOX_FACES: [([usize; 4], Vec3); 6] = [
    ([0, 1, 2, 3], Vec3::NEG_Y),
    ([4, 7, 6, 5], Vec3::Y),
    ([0, 4, 5, 1], Vec3::NEG_Z),
    ([3, 2, 6, 7], Vec3::Z),
    ([0, 3, 7, 4], Vec3::NEG_X),
    ([1, 5, 6, 2], Vec3::X),
];

/// One directional light plus distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    pub intensity: f32,
    pub ambient: f32,
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Lighting {
    pub fn from_config(render: &RenderConfig) -> Self {
        Self {
            direction: Vec3::from_array(render.light_direction).normalize_or_zero(),
            intensity: render.light_intensity,
            ambient: render.ambient,
            fog_start: render.fog_start,
            fog_end: render.fog_end,
        }
    }

    /// Lambert term on a flat face; alpha is left alone.
    pub fn shade(&self, color: [f32; 4], normal: Vec3) -> [f32; 4] {
        let k = (self.ambient + self.intensity * normal.dot(-self.direction).max(0.0)).min(1.0);
        [color[0] * k, color[1] * k, color[2] * k, color[3]]
    }

    pub fn fog_factor(&self, distance: f32) -> f32 {
        let span = self.fog_end - self.fog_start;
        if span <= 0.0 {
            return if distance >= self.fog_end { 1.0 } else { 0.0 };
        }
        ((distance - self.fog_start) / span).clamp(0.0, 1.0)
    }
}

/// A face ready for the GPU: `points` are (pixel x, pixel y, depth value).
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFace {
    /// Eye to face centre, used for ordering and fog.
    pub distance: f32,
    pub points: Vec<Vec3>,
    pub color: [f32; 4],
    pub fog: f32,
}

/// Sutherland-Hodgman against the plane z = -znear, camera space.
/// Points with z <= -znear are kept.
pub fn clip_polygon_near_plane(polygon: &[Vec3], znear: f32) -> Vec<Vec3> {
    let Some(&last) = polygon.last() else { return Vec::new() };
    let plane_z = -znear;
    let inside = |p: Vec3| p.z <= plane_z;
    let crossing = |s: Vec3, p: Vec3| {
        let t = (plane_z - s.z) / (p.z - s.z);
        let mut i = s.lerp(p, t);
        i.z = plane_z;
        i
    };

    let mut out = Vec::with_capacity(polygon.len() + 1);
    let mut s = last;
    for &p in polygon {
        match (inside(s), inside(p)) {
            (true, true) => out.push(p),
            (true, false) => out.push(crossing(s, p)),
            (false, true) => {
                out.push(crossing(s, p));
                out.push(p);
            }
            (false, false) => {}
        }
        s = p;
    }
    out
}

/// Every visible face of every active mesh node, farthest first.
pub fn collect_faces(
    scene: &Scene,
    camera: &Camera,
    host: &Transform,
    lighting: &Lighting,
    screen_width: f32,
    screen_height: f32,
) -> Vec<ScreenFace> {
    let eye = camera.eye(host);
    let view = camera.view_matrix(host);
    let mut faces = Vec::new();

    for id in scene.iter() {
        let Some(node) = scene.node(id) else { continue };
        let (Some(mesh), Some(transform), true) = (node.mesh, node.transform.as_ref(), node.active) else {
            continue;
        };
        let corners = mesh.bounds(transform).corners();

        for (indices, normal) in BOX_FACES {
            let world = indices.map(|i| corners[i]);
            let center = world.iter().copied().sum::<Vec3>() * 0.25;
            if (center - eye).dot(normal) >= 0.0 {
                continue;
            }

            let cam_space = world.map(|p| view.transform_point3(p));
            let clipped = clip_polygon_near_plane(&cam_space, camera.znear);
            if clipped.len() < 3 {
                continue;
            }

            let projected: Option<Vec<Vec3>> = clipped
                .iter()
                .map(|&p| {
                    camera
                        .project_camera_space_to_screen(p, screen_width, screen_height)
                        .map(|px| px.extend(camera.depth_value(-p.z)))
                })
                .collect();
            let Some(points) = projected else { continue };

            let distance = center.distance(eye);
            faces.push(ScreenFace {
                distance,
                points,
                color: lighting.shade(mesh.color, normal),
                fog: lighting.fog_factor(distance),
            });
        }
    }

    faces.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    faces
}
