// src/engine_lib/controller.rs

use glam::Vec3;
use log::trace;

use crate::config::{CollisionTuning, MovementTuning};
use crate::engine_lib::input::FrameInput;
use crate::engine_lib::ray::Ray;
use crate::engine_lib::scene_logic::{contact_allowance, find_blocker, raycast_colliders, Axis, ContactQuery};
use crate::engine_lib::scene_types::{NodeId, Scene};
use crate::engine_lib::transform::{planar, Transform, DEGENERATE_LENGTH};

/// What the ground probe decided this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundContact {
    Airborne,
    /// Close enough to the surface; position untouched.
    Resting,
    /// Sunk slightly into the surface and pushed back up by `correction`.
    Snapped { correction: f32 },
}

impl GroundContact {
    pub fn is_grounded(self) -> bool {
        !matches!(self, GroundContact::Airborne)
    }
}

/// Unit horizontal direction the player is asking to move in, if any.
///
/// Forward/right come from the transform with pitch flattened out, so looking
/// up or down never slows walking, and diagonals are no faster than a single key.
pub fn desired_direction(transform: &Transform, input: &FrameInput) -> Option<Vec3> {
    let axes = input.move_axes();
    let wish = planar(transform.forward()) * axes.x + planar(transform.right()) * axes.y;

    (wish.length() > DEGENERATE_LENGTH).then(|| wish.normalize())
}

/// First-person kinematic controller: gravity, jumping, ground/air
/// acceleration and axis-separated collision against scene box colliders.
///
/// Without a collider on its node or a scene root to query, the player moves
/// freely and is never grounded.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    pub tuning: MovementTuning,
    pub collision: CollisionTuning,
    velocity: Vec3,
    grounded: bool,
    scene_root: Option<NodeId>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(MovementTuning::default(), CollisionTuning::default())
    }
}

impl PlayerController {
    pub fn new(tuning: MovementTuning, collision: CollisionTuning) -> Self {
        Self { tuning, collision, velocity: Vec3::ZERO, grounded: false, scene_root: None }
    }

    pub fn with_scene_root(mut self, root: NodeId) -> Self {
        self.scene_root = Some(root);
        self
    }

    pub fn set_scene_root(&mut self, root: Option<NodeId>) {
        self.scene_root = root;
    }

    pub fn scene_root(&self) -> Option<NodeId> {
        self.scene_root
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// One simulation step for the player node `player`.
    pub fn update(&mut self, scene: &mut Scene, player: NodeId, input: &FrameInput, dt: f32) {
        let Some(transform) = scene.transform(player).copied() else {
            trace!("player {player} has no transform; skipping frame");
            return;
        };

        let wish = desired_direction(&transform, input);
        self.apply_jump_and_gravity(input.jump_pressed, dt);
        self.accelerate(wish, dt);

        let movement = self.velocity * dt;
        let has_collider = scene.node(player).is_some_and(|n| n.collider.is_some());
        match self.scene_root {
            Some(root) if has_collider && scene.contains(root) => {
                self.move_with_collision(scene, player, root, movement);
                self.detect_ground(scene, player);
            }
            _ => {
                if let Some(t) = scene.transform_mut(player) {
                    t.translate(movement);
                }
                self.grounded = false;
            }
        }
    }

    fn apply_jump_and_gravity(&mut self, jump_pressed: bool, dt: f32) {
        if self.grounded && jump_pressed {
            self.velocity.y = self.tuning.jump_speed;
            self.grounded = false;
        }
        // Applied while grounded too; the ground probe cancels it.
        self.velocity.y += self.tuning.gravity * dt;
    }

    fn accelerate(&mut self, wish: Option<Vec3>, dt: f32) {
        let t = &self.tuning;
        let mut horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);

        match wish {
            Some(dir) => {
                let add_speed = t.move_speed - horizontal.dot(dir);
                if add_speed > 0.0 {
                    let accel = if self.grounded { t.ground_accel } else { t.air_accel * t.air_control };
                    horizontal += dir * (accel * dt).min(add_speed);
                }
            }
            None if self.grounded => {
                let speed = horizontal.length();
                if speed > 0.0 {
                    let slowed = (speed - t.ground_decel * dt).max(0.0);
                    horizontal = if slowed > 0.0 { horizontal * (slowed / speed) } else { Vec3::ZERO };
                }
            }
            // Airborne without input keeps its momentum.
            None => {}
        }

        let speed = horizontal.length();
        if speed > t.move_speed {
            horizontal *= t.move_speed / speed;
        }

        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;
    }

    /// Applies `movement` one axis at a time (X, Z, then Y) so the player slides along walls.
    fn move_with_collision(&mut self, scene: &mut Scene, player: NodeId, root: NodeId, movement: Vec3) {
        for axis in Axis::RESOLUTION_ORDER {
            let delta = movement[axis.index()];
            if delta == 0.0 {
                continue;
            }
            if self.resolve_axis(scene, player, root, axis, delta) {
                self.velocity[axis.index()] = 0.0;
            }
        }
    }

    /// Moves along one axis. Returns true when something blocked the move.
    fn resolve_axis(&mut self, scene: &mut Scene, player: NodeId, root: NodeId, axis: Axis, delta: f32) -> bool {
        let a = axis.index();
        let Some(start) = scene.transform(player).map(|t| t.position) else { return false };
        let Some(start_bounds) = scene.collider_bounds(player) else { return false };

        let mut tentative = start;
        tentative[a] += delta;
        set_position(scene, player, tentative);
        let Some(probe) = scene.collider_bounds(player) else { return false };

        let query = ContactQuery {
            exclude: player,
            ignore_floor_like: axis.is_horizontal(),
            floor_epsilon: self.collision.floor_epsilon,
        };
        let Some(blocker) = find_blocker(scene, root, &probe, &query) else {
            return false;
        };

        let allowed =
            contact_allowance(scene, root, &start_bounds, &probe, axis, delta, &query, self.collision.contact_skin);
        let mut resolved = start;
        resolved[a] += allowed;
        set_position(scene, player, resolved);
        trace!("{axis:?} move {delta:.4} blocked by {blocker}, advanced {allowed:.4}");
        true
    }

    /// Downward probe from just above the player's feet. Sets the grounded flag,
    /// zeroes vertical velocity on contact and pushes the player out of shallow
    /// sinking. Skipped while moving upward.
    pub fn detect_ground(&mut self, scene: &mut Scene, player: NodeId) -> GroundContact {
        self.grounded = false;
        if self.velocity.y > 0.0 {
            return GroundContact::Airborne;
        }
        let Some(root) = self.scene_root else { return GroundContact::Airborne };
        let Some(bounds) = scene.collider_bounds(player) else { return GroundContact::Airborne };
        let Some(position) = scene.transform(player).map(|t| t.position) else {
            return GroundContact::Airborne;
        };

        let c = &self.collision;
        let center = bounds.center();
        let origin = Vec3::new(center.x, bounds.min.y + c.probe_lift, center.z);
        let ray = Ray::new(origin, Vec3::NEG_Y);
        let Some(hit) = raycast_colliders(scene, root, player, &ray, c.ground_probe_distance) else {
            return GroundContact::Airborne;
        };

        let target_y = hit.point.y + bounds.half_extents().y;
        let diff = target_y - position.y;

        let contact = if diff.abs() <= c.ground_epsilon {
            GroundContact::Resting
        } else if diff > 0.0 && diff <= c.max_penetration {
            set_position(scene, player, Vec3::new(position.x, target_y, position.z));
            GroundContact::Snapped { correction: diff }
        } else {
            GroundContact::Airborne
        };

        if contact.is_grounded() {
            self.velocity.y = 0.0;
            self.grounded = true;
        }
        trace!("ground probe hit {} at {:.3}: {contact:?}", hit.node, hit.point.y);
        contact
    }
}

fn set_position(scene: &mut Scene, id: NodeId, position: Vec3) {
    if let Some(t) = scene.transform_mut(id) {
        t.position = position;
    }
}
