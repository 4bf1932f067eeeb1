use approx::assert_relative_eq;
use glam::Vec3;

use boxwalk::engine_lib::collider::BoxCollider;
use boxwalk::engine_lib::controller::{GroundContact, PlayerController};
use boxwalk::engine_lib::input::FrameInput;
use boxwalk::engine_lib::scene_types::{NodeId, Scene, SceneNode};
use boxwalk::engine_lib::transform::Transform;

const DT: f32 = 1.0 / 60.0;

struct World {
    scene: Scene,
    player: NodeId,
    controller: PlayerController,
}

impl World {
    /// Player 0.7 x 2 x 0.7 with its feet at `feet`, optionally over a 40 x 1 x 40 floor topped at y = 0.
    fn new(feet: Vec3, with_floor: bool) -> Self {
        let mut scene = Scene::new("root");
        let root = scene.root();
        if with_floor {
            add_box(&mut scene, "floor", Vec3::new(0.0, -0.5, 0.0), Vec3::new(40.0, 1.0, 40.0));
        }
        let player = scene
            .spawn(
                root,
                SceneNode::new("player")
                    .at(feet + Vec3::new(0.0, 1.0, 0.0))
                    .with_collider(BoxCollider::sized(Vec3::new(0.7, 2.0, 0.7))),
            )
            .unwrap();
        let controller = PlayerController::default().with_scene_root(root);
        Self { scene, player, controller }
    }

    fn step(&mut self, input: &FrameInput, dt: f32) {
        self.controller.update(&mut self.scene, self.player, input, dt);
    }

    fn run(&mut self, input: &FrameInput, frames: usize) {
        for _ in 0..frames {
            self.step(input, DT);
        }
    }

    fn position(&self) -> Vec3 {
        self.scene.transform(self.player).unwrap().position
    }

    fn set_position(&mut self, position: Vec3) {
        self.scene.transform_mut(self.player).unwrap().position = position;
    }

    /// Yaw 0 faces +Z, yaw 90 faces +X.
    fn face(&mut self, yaw_degrees: f32) {
        self.scene.transform_mut(self.player).unwrap().rotation = Vec3::new(0.0, yaw_degrees, 0.0);
    }
}

fn add_box(scene: &mut Scene, name: &str, center: Vec3, size: Vec3) -> NodeId {
    let root = scene.root();
    scene.spawn(root, SceneNode::new(name).at(center).with_collider(BoxCollider::sized(size))).unwrap()
}

fn held(forward: bool, back: bool, left: bool, right: bool) -> FrameInput {
    FrameInput { forward, back, left, right, ..FrameInput::default() }
}

#[test]
fn jump_arc_first_frame() {
    let mut world = World::new(Vec3::ZERO, false);
    world.controller.set_grounded(true);
    let jump = FrameInput { jump_pressed: true, ..FrameInput::default() };
    world.step(&jump, 0.1);
    assert_relative_eq!(world.controller.velocity().y, 7.5, epsilon = 1e-5);
    assert!(!world.controller.is_grounded());
    assert_relative_eq!(world.position().y, 1.75, epsilon = 1e-5);
}

#[test]
fn jump_needs_ground() {
    let mut world = World::new(Vec3::new(0.0, 5.0, 0.0), false);
    let jump = FrameInput { jump_pressed: true, ..FrameInput::default() };
    world.step(&jump, 0.1);
    assert_relative_eq!(world.controller.velocity().y, -2.5, epsilon = 1e-5);
}

#[test]
fn jump_lands_back_on_the_floor() {
    let mut world = World::new(Vec3::ZERO, true);
    world.run(&FrameInput::default(), 1);
    assert!(world.controller.is_grounded());
    world.step(&FrameInput { jump_pressed: true, ..FrameInput::default() }, DT);
    assert!(!world.controller.is_grounded());
    // Airtime is 2 * 10 / 25 = 0.8 s.
    world.run(&FrameInput::default(), 70);
    assert!(world.controller.is_grounded());
    assert_relative_eq!(world.position().y, 1.0, epsilon = 1e-3);
    assert_eq!(world.controller.velocity().y, 0.0);
}

#[test]
fn diagonal_walking_is_no_faster_than_straight() {
    let mut world = World::new(Vec3::ZERO, true);
    world.run(&held(true, false, false, true), 120);
    assert_relative_eq!(world.controller.horizontal_speed(), 6.0, epsilon = 1e-4);
    let v = world.controller.velocity();
    assert_relative_eq!(v.x.abs(), v.z.abs(), epsilon = 1e-4);
}

#[test]
fn walking_on_the_floor_keeps_height() {
    let mut world = World::new(Vec3::ZERO, true);
    world.run(&held(true, false, false, false), 60);
    let p = world.position();
    assert!(p.z > 4.0, "only reached z = {}", p.z);
    assert_relative_eq!(p.y, 1.0, epsilon = 1e-4);
    assert!(world.controller.is_grounded());
}

#[test]
fn walking_over_a_low_seam_does_not_stop() {
    let mut world = World::new(Vec3::ZERO, true);
    // A tile ahead whose top is 0.03 above the floor.
    add_box(&mut world.scene, "tile", Vec3::new(0.0, -0.47, 5.0), Vec3::new(4.0, 1.0, 4.0));
    world.run(&held(true, false, false, false), 90);
    assert!(world.position().z > 5.0, "stuck at z = {}", world.position().z);
}

#[test]
fn wall_stops_the_player_flush() {
    let mut world = World::new(Vec3::ZERO, true);
    add_box(&mut world.scene, "wall", Vec3::new(2.5, 2.0, 0.0), Vec3::new(1.0, 4.0, 10.0));
    world.face(90.0);
    world.run(&held(true, false, false, false), 90);

    let bounds = world.scene.collider_bounds(world.player).unwrap();
    assert!(bounds.max.x <= 2.0, "overlapping the wall: {}", bounds.max.x);
    assert!(2.0 - bounds.max.x < 1e-3, "stopped short: {}", bounds.max.x);
    assert_eq!(world.controller.velocity().x, 0.0);
}

#[test]
fn wall_slide_keeps_the_parallel_component() {
    let mut world = World::new(Vec3::ZERO, true);
    add_box(&mut world.scene, "wall", Vec3::new(1.5, 2.0, 0.0), Vec3::new(1.0, 4.0, 40.0));
    // At yaw 0 forward is +Z and left is +X, straight into the wall.
    let into_wall = held(true, false, true, false);
    world.run(&into_wall, 60);
    let before = world.position();
    world.step(&into_wall, DT);
    let after = world.position();

    assert_eq!(world.controller.velocity().x, 0.0);
    assert!(world.controller.velocity().z > 0.0);
    assert!(after.z > before.z);
    assert_relative_eq!(after.x, before.x, epsilon = 1e-6);
    assert!(world.scene.collider_bounds(world.player).unwrap().max.x <= 1.0);
}

#[test]
fn inactive_colliders_still_block() {
    let mut world = World::new(Vec3::ZERO, true);
    let wall = add_box(&mut world.scene, "wall", Vec3::new(2.5, 2.0, 0.0), Vec3::new(1.0, 4.0, 10.0));
    world.scene.node_mut(wall).unwrap().active = false;
    world.face(90.0);
    world.run(&held(true, false, false, false), 90);
    assert!(world.scene.collider_bounds(world.player).unwrap().max.x <= 2.0);
}

#[test]
fn resting_is_idempotent() {
    let mut world = World::new(Vec3::ZERO, true);
    world.set_position(Vec3::new(0.0, 1.03, 0.0));
    for _ in 0..5 {
        assert_eq!(world.controller.detect_ground(&mut world.scene, world.player), GroundContact::Resting);
        assert!(world.controller.is_grounded());
        assert_eq!(world.position(), Vec3::new(0.0, 1.03, 0.0));
    }
}

#[test]
fn hovering_within_ground_epsilon_is_grounded_without_correction() {
    // Feet at 1.0, platform top at 0.92: exactly ground_epsilon below.
    let mut world = World::new(Vec3::new(0.0, 1.0, 0.0), false);
    add_box(&mut world.scene, "platform", Vec3::new(0.0, 0.92 - 0.5, 0.0), Vec3::new(4.0, 1.0, 4.0));
    let contact = world.controller.detect_ground(&mut world.scene, world.player);
    assert_eq!(contact, GroundContact::Resting);
    assert!(world.controller.is_grounded());
    assert_eq!(world.position().y, 2.0);
}

#[test]
fn shallow_sinking_is_snapped_up() {
    // Feet at 1.0, platform top at 1.15.
    let mut world = World::new(Vec3::new(0.0, 1.0, 0.0), false);
    add_box(&mut world.scene, "platform", Vec3::new(0.0, 0.65, 0.0), Vec3::new(4.0, 1.0, 4.0));
    let contact = world.controller.detect_ground(&mut world.scene, world.player);
    match contact {
        GroundContact::Snapped { correction } => assert_relative_eq!(correction, 0.15, epsilon = 1e-5),
        other => panic!("expected a snap, got {other:?}"),
    }
    assert_relative_eq!(world.position().y, 2.15, epsilon = 1e-5);
    assert!(world.controller.is_grounded());
    // A second probe finds the player resting.
    assert_eq!(world.controller.detect_ground(&mut world.scene, world.player), GroundContact::Resting);
}

#[test]
fn deep_penetration_leaves_the_player_airborne() {
    let mut world = World::new(Vec3::new(0.0, -0.5, 0.0), true);
    world.controller.set_velocity(Vec3::new(0.0, -3.0, 0.0));
    assert_eq!(world.controller.detect_ground(&mut world.scene, world.player), GroundContact::Airborne);
    assert!(!world.controller.is_grounded());
    assert_eq!(world.controller.velocity().y, -3.0);
}

#[test]
fn ground_out_of_probe_range_is_airborne() {
    let mut world = World::new(Vec3::new(0.0, 0.5, 0.0), true);
    assert_eq!(world.controller.detect_ground(&mut world.scene, world.player), GroundContact::Airborne);
    world.step(&FrameInput::default(), DT);
    assert!(!world.controller.is_grounded());
}

#[test]
fn releasing_the_keys_stops_without_reversing() {
    let mut world = World::new(Vec3::ZERO, true);
    world.run(&held(true, false, false, false), 60);
    let mut last_z = world.controller.velocity().z;
    for _ in 0..10 {
        world.step(&FrameInput::default(), DT);
        let z = world.controller.velocity().z;
        assert!(z >= 0.0 && z <= last_z);
        last_z = z;
    }
    assert_eq!(world.controller.velocity(), Vec3::ZERO);
}

#[test]
fn momentum_carries_through_the_air() {
    let mut world = World::new(Vec3::new(0.0, 20.0, 0.0), false);
    world.controller.set_velocity(Vec3::new(4.0, 0.0, 0.0));
    world.run(&FrameInput::default(), 30);
    assert_eq!(world.controller.velocity().x, 4.0);
    assert_relative_eq!(world.position().x, 2.0, epsilon = 1e-4);
}

#[test]
fn pitch_does_not_change_walking_speed() {
    let mut level = World::new(Vec3::ZERO, true);
    let mut looking_down = World::new(Vec3::ZERO, true);
    *looking_down.scene.transform_mut(looking_down.player).unwrap() =
        Transform::from_position(Vec3::new(0.0, 1.0, 0.0)).with_rotation(Vec3::new(-70.0, 0.0, 0.0));
    let walk = held(true, false, false, false);
    level.run(&walk, 20);
    looking_down.run(&walk, 20);
    assert_relative_eq!(level.controller.velocity().z, looking_down.controller.velocity().z, epsilon = 1e-5);
}

#[test]
fn player_without_transform_is_left_alone() {
    let mut scene = Scene::new("root");
    let root = scene.root();
    let ghost = scene.spawn(root, SceneNode::new("ghost").without_transform()).unwrap();
    let mut controller = PlayerController::default().with_scene_root(root);
    controller.update(&mut scene, ghost, &held(true, false, false, false), DT);
    assert_eq!(controller.velocity(), Vec3::ZERO);
    assert!(scene.transform(ghost).is_none());
}
