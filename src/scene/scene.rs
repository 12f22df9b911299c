use glam::{Affine3A, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use crate::resources::Mesh;
use crate::scene::camera::Camera;
use crate::scene::environment::Environment;
use crate::scene::node::Node;
use crate::scene::skeleton::{Skeleton, SkinBinding};
use crate::scene::transform::Transform;
use crate::scene::{NodeHandle, SkeletonKey};

/// Scene graph container.
///
/// Nodes live in a slot map; components are stored in secondary maps keyed
/// by the owning node's handle.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SecondaryMap<NodeHandle, Mesh>,
    pub cameras: SecondaryMap<NodeHandle, Camera>,
    pub skins: SecondaryMap<NodeHandle, SkinBinding>,
    pub skeletons: SlotMap<SkeletonKey, Skeleton>,

    pub environment: Environment,
    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SecondaryMap::new(),
            cameras: SecondaryMap::new(),
            skins: SecondaryMap::new(),
            skeletons: SlotMap::with_key(),
            environment: Environment::default(),
            active_camera: None,
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Inserts `node` as a root node.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    /// Inserts `node` under `parent`.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(node);
        self.attach(handle, parent);
        handle
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p) {
                n.children.retain(|&c| c != child);
            }
        } else {
            self.root_nodes.retain(|&r| r != child);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first search for a node named `name` in the subtree at `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.descendants(root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    /// `root` and every node below it, depth first.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        self.meshes.insert(handle, mesh);
    }

    /// Creates a node carrying `mesh`, optionally under `parent`.
    pub fn add_mesh(&mut self, mesh: Mesh, parent: Option<NodeHandle>) -> NodeHandle {
        let node = Node::new(mesh.name.clone());
        let handle = match parent {
            Some(p) => self.add_to_parent(node, p),
            None => self.add_node(node),
        };
        self.meshes.insert(handle, mesh);
        handle
    }

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonKey {
        self.skeletons.insert(skeleton)
    }

    pub fn bind_skeleton(&mut self, handle: NodeHandle, skeleton: SkeletonKey) {
        self.skins.insert(handle, SkinBinding { skeleton });
    }

    /// Creates a camera node and makes it the active camera.
    pub fn add_camera(&mut self, camera: Camera, transform: Transform) -> NodeHandle {
        let mut node = Node::new("Camera");
        node.transform = transform;
        let handle = self.add_node(node);
        self.cameras.insert(handle, camera);
        self.active_camera = Some(handle);
        handle
    }

    /// The active camera's node transform and camera.
    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let handle = self.active_camera?;
        let camera = self.cameras.get_mut(handle)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        self.cameras.get(self.active_camera?)
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Propagates local matrices to world matrices for the whole scene and
    /// refreshes camera view matrices. Call once per frame before rendering.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .rev()
            .map(|&h| (h, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.set_world_matrix(world);
            }
            let world = node.transform.world_matrix;

            if changed && let Some(camera) = self.cameras.get_mut(handle) {
                camera.update_view_projection(&world);
            }

            stack.extend(node.children.iter().rev().map(|&c| (c, world, changed)));
        }
    }

    /// Recomputes the joint matrices of every skeleton bound to a mesh.
    pub fn update_skeletons(&mut self) {
        let tasks: Vec<(SkeletonKey, Affine3A)> = self
            .skins
            .iter()
            .filter_map(|(handle, binding)| {
                let node = self.nodes.get(handle)?;
                Some((binding.skeleton, node.transform.world_matrix.inverse()))
            })
            .collect();

        for (key, root_inv) in tasks {
            if let Some(skeleton) = self.skeletons.get_mut(key) {
                skeleton.compute_joint_matrices(&self.nodes, root_inv);
            }
        }
    }

    /// Matrices, then skins.
    pub fn update(&mut self) {
        self.update_matrix_world();
        self.update_skeletons();
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.transform.world_position())
    }

    /// Whether `handle` and all its ancestors are visible.
    #[must_use]
    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            match self.nodes.get(h) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }
}
