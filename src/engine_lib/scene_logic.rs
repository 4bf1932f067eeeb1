// src/engine_lib/scene_logic.rs
//! Collision and raycast queries over the scene tree.
//!
//! Every query walks the tree from a given root and skips an excluded subtree
//! (the querying player and anything attached below it).

use glam::Vec3;

use crate::engine_lib::collider::Aabb;
use crate::engine_lib::ray::Ray;
use crate::engine_lib::scene_types::{NodeId, Scene};

/// One of the three world axes, in the order movement is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
    Y,
}

impl Axis {
    pub const RESOLUTION_ORDER: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self != Axis::Y
    }
}

/// Parameters of an overlap query.
#[derive(Debug, Clone, Copy)]
pub struct ContactQuery {
    /// Root of the subtree the query never reports.
    pub exclude: NodeId,
    /// Skip boxes the probe is standing on top of.
    pub ignore_floor_like: bool,
    pub floor_epsilon: f32,
}

impl ContactQuery {
    /// Whether `other` stops a probe box at `probe`.
    pub fn blocks(&self, probe: &Aabb, other: &Aabb) -> bool {
        if !probe.overlaps(other) {
            return false;
        }
        !(self.ignore_floor_like && is_floor_like(probe, other, self.floor_epsilon))
    }
}

/// The probe's bottom is at, or within `floor_epsilon` below, the other box's top.
pub fn is_floor_like(probe: &Aabb, other: &Aabb, floor_epsilon: f32) -> bool {
    probe.min.y >= other.max.y - floor_epsilon
}

/// Closest ray hit on a scene collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Depth-first search for the first collider that blocks `probe`.
pub fn find_blocker(scene: &Scene, root: NodeId, probe: &Aabb, query: &ContactQuery) -> Option<NodeId> {
    if root == query.exclude {
        return None;
    }
    if let Some(bounds) = scene.collider_bounds(root) {
        if query.blocks(probe, &bounds) {
            return Some(root);
        }
    }
    scene
        .children(root)
        .iter()
        .find_map(|&child| find_blocker(scene, child, probe, query))
}

/// How far a box at `start` may travel along `axis` (by at most `delta`)
/// before touching any collider that blocks the moved box `probe`.
///
/// The result has the sign of `delta` and stops `skin` short of contact.
/// Blockers already overlapping along the axis allow no movement at all.
pub fn contact_allowance(
    scene: &Scene,
    root: NodeId,
    start: &Aabb,
    probe: &Aabb,
    axis: Axis,
    delta: f32,
    query: &ContactQuery,
    skin: f32,
) -> f32 {
    let mut allowance = delta.abs();
    let mut stack = vec![root];
    let a = axis.index();

    while let Some(id) = stack.pop() {
        if id == query.exclude {
            continue;
        }
        if let Some(bounds) = scene.collider_bounds(id) {
            if query.blocks(probe, &bounds) {
                let gap = if delta > 0.0 { bounds.min[a] - start.max[a] } else { start.min[a] - bounds.max[a] };
                allowance = allowance.min((gap - skin).max(0.0));
            }
        }
        stack.extend_from_slice(scene.children(id));
    }

    allowance.copysign(delta)
}

/// Nearest hit within `max_distance` over every collider outside the excluded subtree.
pub fn raycast_colliders(scene: &Scene, root: NodeId, exclude: NodeId, ray: &Ray, max_distance: f32) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    raycast_recursive(scene, root, exclude, ray, max_distance, &mut best);
    best
}

fn raycast_recursive(
    scene: &Scene,
    id: NodeId,
    exclude: NodeId,
    ray: &Ray,
    max_distance: f32,
    best: &mut Option<RayHit>,
) {
    if id == exclude {
        return;
    }
    if let Some(hit) = scene.collider_bounds(id).and_then(|bounds| ray.intersect_aabb(&bounds)) {
        let closer = best.map_or(true, |b| hit.distance < b.distance);
        if hit.distance <= max_distance && closer {
            *best = Some(RayHit { node: id, distance: hit.distance, point: hit.point });
        }
    }
    for &child in scene.children(id) {
        raycast_recursive(scene, child, exclude, ray, max_distance, best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::collider::BoxCollider;
    use crate::engine_lib::scene_types::SceneNode;
    use approx::assert_relative_eq;

    struct Fixture {
        scene: Scene,
        player: NodeId,
        floor: NodeId,
        wall: NodeId,
        held: NodeId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new("root");
        let root = scene.root();
        let player = scene
            .spawn(root, SceneNode::new("player").at(Vec3::new(0.0, 1.0, 0.0)).with_collider(BoxCollider::sized(Vec3::new(1.0, 2.0, 1.0))))
            .unwrap();
        let held = scene
            .spawn(player, SceneNode::new("held").at(Vec3::new(0.0, 1.0, 0.5)).with_collider(BoxCollider::sized(Vec3::splat(0.5))))
            .unwrap();
        let group = scene.spawn(root, SceneNode::new("level")).unwrap();
        let floor = scene
            .spawn(group, SceneNode::new("floor").at(Vec3::new(0.0, -0.5, 0.0)).with_collider(BoxCollider::sized(Vec3::new(20.0, 1.0, 20.0))))
            .unwrap();
        let wall = scene
            .spawn(group, SceneNode::new("wall").at(Vec3::new(3.0, 1.0, 0.0)).with_collider(BoxCollider::sized(Vec3::new(1.0, 2.0, 10.0))))
            .unwrap();
        Fixture { scene, player, floor, wall, held }
    }

    fn query(f: &Fixture, ignore_floor_like: bool) -> ContactQuery {
        ContactQuery { exclude: f.player, ignore_floor_like, floor_epsilon: 0.05 }
    }

    #[test]
    fn standing_on_the_floor_only_blocks_vertical_queries() {
        let f = fixture();
        let probe = f.scene.collider_bounds(f.player).unwrap();
        assert_eq!(find_blocker(&f.scene, f.scene.root(), &probe, &query(&f, true)), None);
        assert_eq!(find_blocker(&f.scene, f.scene.root(), &probe, &query(&f, false)), Some(f.floor));
    }

    #[test]
    fn wall_blocks_even_when_floor_contacts_are_ignored() {
        let f = fixture();
        let probe = f.scene.collider_bounds(f.player).unwrap().translated(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(find_blocker(&f.scene, f.scene.root(), &probe, &query(&f, true)), Some(f.wall));
    }

    #[test]
    fn player_subtree_is_never_reported() {
        let f = fixture();
        let held = f.scene.collider_bounds(f.held).unwrap();
        assert_eq!(find_blocker(&f.scene, f.scene.root(), &held, &query(&f, true)), None);
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.5), Vec3::NEG_Y);
        let hit = raycast_colliders(&f.scene, f.scene.root(), f.player, &ray, 10.0).unwrap();
        assert_eq!(hit.node, f.floor);
    }

    #[test]
    fn slightly_sunk_player_still_counts_as_on_floor() {
        let probe = Aabb::new(Vec3::new(-0.5, -0.04, -0.5), Vec3::new(0.5, 1.96, 0.5));
        let floor = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        assert!(is_floor_like(&probe, &floor, 0.05));
        let deeper = probe.translated(Vec3::new(0.0, -0.02, 0.0));
        assert!(!is_floor_like(&deeper, &floor, 0.05));
    }

    #[test]
    fn allowance_stops_short_of_the_wall() {
        let f = fixture();
        let start = f.scene.collider_bounds(f.player).unwrap();
        let probe = start.translated(Vec3::new(2.0, 0.0, 0.0));
        let allowed = contact_allowance(&f.scene, f.scene.root(), &start, &probe, Axis::X, 2.0, &query(&f, true), 1e-4);
        // Player max.x is 0.5, wall min.x is 2.5.
        assert_relative_eq!(allowed, 2.0 - 1e-4, epsilon = 1e-6);
    }

    #[test]
    fn allowance_is_signed_and_zero_when_already_touching() {
        let f = fixture();
        let start = f.scene.collider_bounds(f.player).unwrap();
        let probe = start.translated(Vec3::new(0.0, -0.3, 0.0));
        let allowed = contact_allowance(&f.scene, f.scene.root(), &start, &probe, Axis::Y, -0.3, &query(&f, false), 1e-4);
        assert_eq!(allowed, 0.0);
        assert!(allowed.is_sign_negative());
    }

    #[test]
    fn raycast_keeps_the_nearest_hit() {
        let f = fixture();
        let mut scene = f.scene;
        let root = scene.root();
        let ledge = scene
            .spawn(root, SceneNode::new("ledge").at(Vec3::new(0.0, 0.5, 4.0)).with_collider(BoxCollider::sized(Vec3::new(2.0, 1.0, 2.0))))
            .unwrap();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 4.0), Vec3::NEG_Y);
        let hit = raycast_colliders(&scene, root, f.player, &ray, 10.0).unwrap();
        assert_eq!(hit.node, ledge);
        assert_relative_eq!(hit.point.y, 1.0, epsilon = 1e-6);
        assert!(raycast_colliders(&scene, root, f.player, &ray, 3.0).is_none());
    }
}
