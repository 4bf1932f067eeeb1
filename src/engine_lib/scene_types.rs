// src/engine_lib/scene_types.rs
use std::fmt;

use glam::Vec3;
use log::debug;

use crate::engine_lib::collider::{Aabb, BoxCollider};
use crate::engine_lib::controller::PlayerController;
use crate::engine_lib::input::FrameInput;
use crate::engine_lib::look::MouseLook;
use crate::engine_lib::transform::Transform;
use crate::error::SceneError;

/// Handle into a [`Scene`]'s node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Solid unit cube drawn with the node's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMesh {
    pub color: [f32; 4],
    /// Offset of the cube centre from the owner's position, like [`BoxCollider::offset`].
    pub offset: Vec3,
}

impl BoxMesh {
    /// World-space box covered by the mesh: a unit cube scaled by the transform.
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_size(transform.position + self.offset, transform.scale.abs())
    }
}

/// Per-frame behaviors a node can carry. Run in insertion order.
#[derive(Debug, Clone)]
pub enum Behavior {
    MouseLook(MouseLook),
    Player(PlayerController),
}

impl Behavior {
    fn start(&mut self, scene: &mut Scene, owner: NodeId) {
        match self {
            Behavior::MouseLook(look) => {
                if let Some(transform) = scene.transform(owner) {
                    look.start(transform);
                }
            }
            Behavior::Player(_) => {}
        }
    }

    fn update(&mut self, scene: &mut Scene, owner: NodeId, input: &FrameInput, dt: f32) {
        match self {
            Behavior::MouseLook(look) => match scene.transform_mut(owner) {
                Some(transform) => look.apply(transform, input.mouse_delta),
                None => log::warn!("mouse look on {owner} has no transform"),
            },
            Behavior::Player(player) => player.update(scene, owner, input, dt),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub active: bool,
    pub transform: Option<Transform>,
    pub collider: Option<BoxCollider>,
    pub mesh: Option<BoxMesh>,
    pub behaviors: Vec<Behavior>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// A node with a default transform and nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            transform: Some(Transform::default()),
            collider: None,
            mesh: None,
            behaviors: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.get_or_insert_with(Transform::default).position = position;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn without_transform(mut self) -> Self {
        self.transform = None;
        self
    }

    pub fn with_collider(mut self, collider: BoxCollider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_mesh(mut self, color: [f32; 4]) -> Self {
        self.mesh = Some(BoxMesh { color, offset: Vec3::ZERO });
        self
    }

    pub fn with_mesh_offset(mut self, color: [f32; 4], offset: Vec3) -> Self {
        self.mesh = Some(BoxMesh { color, offset });
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn player(&self) -> Option<&PlayerController> {
        self.behaviors.iter().find_map(|b| match b {
            Behavior::Player(p) => Some(p),
            _ => None,
        })
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerController> {
        self.behaviors.iter_mut().find_map(|b| match b {
            Behavior::Player(p) => Some(p),
            _ => None,
        })
    }
}

/// Tree of nodes stored in a flat table. Parents own their children; the
/// tree only grows by appending children, so it stays acyclic.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Scene {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self { nodes: vec![SceneNode::new(root_name)], root: NodeId(0) }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included, so never zero.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Appends `node` as the last child of `parent`.
    pub fn spawn(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        debug!(
            "spawned '{}' as {id} under {parent} (collider: {}, behaviors: {})",
            node.name,
            node.collider.is_some(),
            node.behaviors.len()
        );
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).and_then(|n| n.transform.as_ref())
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).and_then(|n| n.transform.as_mut())
    }

    /// World bounds of the node's collider; needs both a collider and a transform.
    pub fn collider_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.node(id)?;
        let collider = node.collider.as_ref()?;
        let transform = node.transform.as_ref()?;
        Some(collider.bounds(transform.position))
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|id| self.nodes[id.0].name == name)
    }

    /// True when `id` is `ancestor` or lies below it.
    pub fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Depth-first, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    pub fn start(&mut self) {
        self.visit_behaviors(self.root, &mut |behavior: &mut Behavior, scene: &mut Scene, id: NodeId| {
            behavior.start(scene, id)
        });
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        self.visit_behaviors(self.root, &mut |behavior: &mut Behavior, scene: &mut Scene, id: NodeId| {
            behavior.update(scene, id, input, dt)
        });
    }

    fn visit_behaviors(&mut self, id: NodeId, run: &mut dyn FnMut(&mut Behavior, &mut Scene, NodeId)) {
        let Some(node) = self.nodes.get_mut(id.0) else { return };
        if !node.active {
            return;
        }

        // Behaviors are lent out while they run so they can see the whole scene.
        let mut behaviors = std::mem::take(&mut node.behaviors);
        for behavior in behaviors.iter_mut() {
            run(behavior, self, id);
        }
        let node = &mut self.nodes[id.0];
        behaviors.append(&mut node.behaviors);
        node.behaviors = behaviors;

        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.visit_behaviors(child, run);
        }
    }
}
