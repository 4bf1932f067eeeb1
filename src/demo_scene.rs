// src/demo_scene.rs

use glam::Vec3;
use log::info;

use crate::config::EngineConfig;
use crate::engine_lib::collider::BoxCollider;
use crate::engine_lib::controller::PlayerController;
use crate::engine_lib::look::MouseLook;
use crate::engine_lib::scene_types::{Behavior, NodeId, Scene, SceneNode};
use crate::engine_lib::transform::Transform;
use crate::error::SceneError;

const GROUND_COLOR: [f32; 4] = [0.35, 0.55, 0.3, 1.0];
const CUBE_COLOR: [f32; 4] = [0.8, 0.5, 0.25, 1.0];
const WALL_COLOR: [f32; 4] = [0.7, 0.7, 0.72, 1.0];
const MODEL_COLOR: [f32; 4] = [0.3, 0.35, 0.8, 1.0];

pub const PLAYER_SIZE: Vec3 = Vec3::new(0.7, 2.0, 0.7);
pub const PLAYER_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);

pub struct DemoScene {
    pub scene: Scene,
    pub player: NodeId,
}

/// Static box: mesh scaled to `size`, collider of the same size.
fn solid(name: impl Into<String>, center: Vec3, size: Vec3, color: [f32; 4]) -> SceneNode {
    SceneNode::new(name)
        .with_transform(Transform::from_position(center).with_scale(size))
        .with_mesh(color)
        .with_collider(BoxCollider::sized(size))
}

/// Ground, a row of cubes, two side walls, a stand-in model and the player.
pub fn build(config: &EngineConfig) -> Result<DemoScene, SceneError> {
    let mut scene = Scene::new("world");
    let root = scene.root();

    scene.spawn(root, solid("ground", Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 1.0, 20.0), GROUND_COLOR))?;

    for i in 0..5 {
        let x = (i as f32 - 2.0) * 3.0;
        scene.spawn(root, solid(format!("cube_{i}"), Vec3::new(x, 0.75, -5.0), Vec3::new(2.0, 1.5, 2.0), CUBE_COLOR))?;
    }

    for (name, x) in [("wall_left", -10.0), ("wall_right", 10.0)] {
        scene.spawn(root, solid(name, Vec3::new(x, 2.0, 0.0), Vec3::new(1.0, 4.0, 20.0), WALL_COLOR))?;
    }

    // Feet-origin model; mesh and collider are lifted to wrap it.
    let model_size = Vec3::new(0.7, 2.0, 0.7);
    scene.spawn(
        root,
        SceneNode::new("model")
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -3.0)).with_scale(model_size))
            .with_mesh_offset(MODEL_COLOR, Vec3::new(0.0, 1.0, 0.0))
            .with_collider(BoxCollider::new(model_size, Vec3::new(0.0, 1.0, 0.0))),
    )?;

    let controller = PlayerController::new(config.movement, config.collision).with_scene_root(root);
    let player = scene.spawn(
        root,
        SceneNode::new("player")
            .at(PLAYER_START)
            .with_collider(BoxCollider::sized(PLAYER_SIZE))
            .with_behavior(Behavior::MouseLook(MouseLook::new(config.look.mouse_sensitivity)))
            .with_behavior(Behavior::Player(controller)),
    )?;

    scene.start();
    info!("demo scene ready: {} nodes, player {player}", scene.node_count());
    Ok(DemoScene { scene, player })
}
