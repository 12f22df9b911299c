use glam::{Affine3A, Mat4};
use slotmap::SlotMap;

use crate::scene::{Node, NodeHandle, SkeletonKey};

/// Attaches a skinned mesh node to its skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinBinding {
    pub skeleton: SkeletonKey,
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    /// `bones[i]` drives joint index `i` of the skinned vertices.
    pub bones: Vec<NodeHandle>,

    /// Mesh space to bone space at bind time, one per bone.
    pub(crate) inverse_bind_matrices: Vec<Affine3A>,

    /// Final per-joint skinning matrices, in mesh space. Updated every frame.
    pub(crate) joint_matrices: Vec<Mat4>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<NodeHandle>, inverse_bind_matrices: Vec<Affine3A>) -> Self {
        let count = bones.len();
        Self {
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
            joint_matrices: vec![Mat4::IDENTITY; count],
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    /// Recomputes the joint matrices from the bones' current world matrices.
    ///
    /// `root_matrix_inv` is the inverse world matrix of the skinned mesh
    /// node, bringing each joint transform back into mesh space.
    pub fn compute_joint_matrices(
        &mut self,
        nodes: &SlotMap<NodeHandle, Node>,
        root_matrix_inv: Affine3A,
    ) {
        for (i, &bone_handle) in self.bones.iter().enumerate() {
            let Some(bone_node) = nodes.get(bone_handle) else {
                continue;
            };
            let ibm = self
                .inverse_bind_matrices
                .get(i)
                .copied()
                .unwrap_or(Affine3A::IDENTITY);

            self.joint_matrices[i] = (root_matrix_inv * bone_node.transform.world_matrix * ibm).into();
        }
    }
}
