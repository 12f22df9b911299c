use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Vec3};

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Per-vertex skin influences: four joint indices and their weights.
#[derive(Debug, Clone, Default)]
pub struct SkinAttributes {
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

/// CPU-side triangle mesh data.
///
/// Geometry is immutable once built and shared behind an `Arc`; the renderer
/// caches its GPU buffers by [`id`](Self::id).
#[derive(Debug, Clone)]
pub struct Geometry {
    id: u64,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub skin: Option<SkinAttributes>,
    pub indices: Vec<u32>,
    bounding_box: Option<BoundingBox>,
}

impl Geometry {
    /// Builds a geometry. Missing normals are computed from the triangles;
    /// missing UVs are zero-filled.
    #[must_use]
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        uvs: Vec<[f32; 2]>,
        indices: Vec<u32>,
    ) -> Self {
        let count = positions.len();
        let mut geo = Self {
            id: NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed),
            positions,
            normals,
            uvs,
            skin: None,
            indices,
            bounding_box: None,
        };
        if geo.uvs.len() != count {
            geo.uvs = vec![[0.0; 2]; count];
        }
        if geo.normals.len() != count {
            geo.compute_vertex_normals();
        }
        geo.compute_bounding_box();
        geo
    }

    #[must_use]
    pub fn with_skin(mut self, skin: SkinAttributes) -> Self {
        if skin.joints.len() == self.positions.len() && skin.weights.len() == self.positions.len() {
            self.skin = Some(skin);
        } else {
            log::warn!("Skin attribute count does not match vertex count; ignoring skin");
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
    }

    /// Area-weighted smooth normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalize_or(Vec3::Y).to_array())
            .collect();
    }

    fn compute_bounding_box(&mut self) {
        let mut iter = self.positions.iter().map(|&p| Vec3::from(p));
        self.bounding_box = iter.next().map(|first| {
            let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
            BoundingBox { min, max }
        });
    }

    /// Interleaved bind-pose vertices.
    #[must_use]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((&position, &normal), &uv)| Vertex {
                position,
                normal,
                uv,
            })
            .collect()
    }

    /// Vertices deformed by `joint_matrices` (linear blend skinning).
    ///
    /// Falls back to the bind pose for unskinned geometry.
    #[must_use]
    pub fn skinned_vertices(&self, joint_matrices: &[Mat4]) -> Vec<Vertex> {
        let Some(skin) = &self.skin else {
            return self.vertices();
        };

        let mut out = Vec::with_capacity(self.positions.len());
        for i in 0..self.positions.len() {
            let joints = skin.joints[i];
            let weights = skin.weights[i];

            let mut skin_matrix = Mat4::ZERO;
            let mut total = 0.0;
            for k in 0..4 {
                let w = weights[k];
                if w <= 0.0 {
                    continue;
                }
                if let Some(m) = joint_matrices.get(joints[k] as usize) {
                    skin_matrix += *m * w;
                    total += w;
                }
            }
            if total <= 0.0 {
                skin_matrix = Mat4::IDENTITY;
            } else if (total - 1.0).abs() > 1e-3 {
                skin_matrix *= 1.0 / total;
            }

            let position = skin_matrix.transform_point3(Vec3::from(self.positions[i]));
            let normal = skin_matrix
                .transform_vector3(Vec3::from(self.normals[i]))
                .normalize_or(Vec3::Y);
            out.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: self.uvs[i],
            });
        }
        out
    }
}
