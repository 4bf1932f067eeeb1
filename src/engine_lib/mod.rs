// src/engine_lib/mod.rs
pub mod camera;
pub mod collider;
pub mod controller;
pub mod input;
pub mod look;
pub mod ray;
pub mod scene_logic;
pub mod scene_types;
pub mod transform;

pub use camera::Camera;
pub use collider::{Aabb, BoxCollider};
pub use controller::{GroundContact, PlayerController};
pub use input::{FrameInput, InputCollector};
pub use look::MouseLook;
pub use ray::Ray;
pub use scene_types::{Behavior, BoxMesh, NodeId, Scene, SceneNode};
pub use transform::Transform;
