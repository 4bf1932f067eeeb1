// src/engine_lib/collider.rs

use glam::Vec3;

/// Axis-aligned bounding box given by its min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self { min: center - half, max: center + half }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Closed-interval overlap on all three axes, so touching faces count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb { min: self.min + offset, max: self.max + offset }
    }

    /// The eight corners, bottom face first (counter-clockwise seen from above), then the top face.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }
}

/// Axis-aligned box attached to a scene node. Owner rotation is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    /// Full extents.
    pub size: Vec3,
    /// Offset of the box centre from the owner's position.
    pub offset: Vec3,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self { size: Vec3::ONE, offset: Vec3::ZERO }
    }
}

impl BoxCollider {
    pub fn new(size: Vec3, offset: Vec3) -> Self {
        Self { size, offset }
    }

    pub fn sized(size: Vec3) -> Self {
        Self { size, offset: Vec3::ZERO }
    }

    pub fn bounds(&self, owner_position: Vec3) -> Aabb {
        Aabb::from_center_size(owner_position + self.offset, self.size)
    }

    pub fn check_collision(&self, owner_position: Vec3, other: &BoxCollider, other_position: Vec3) -> bool {
        self.bounds(owner_position).overlaps(&other.bounds(other_position))
    }
}
