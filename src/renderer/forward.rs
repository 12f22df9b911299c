//! Forward pass: one lit pipeline plus the GPU caches behind it.
//!
//! Geometry buffers are shared per [`Geometry`](crate::resources::Geometry)
//! id; skinned meshes get a private vertex buffer per node that is rewritten
//! every frame. Each mesh node owns a uniform buffer and bind group.

use glam::Mat4;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::renderer::context::{DEPTH_FORMAT, WgpuContext};
use crate::renderer::shader_source;
use crate::renderer::uniforms::ObjectUniforms;
use crate::resources::{Geometry, Image, Mesh, Vertex};
use crate::scene::{NodeHandle, Scene};

/// Image ids start at 1; the built-in white texture uses 0.
const WHITE_TEXTURE_ID: u64 = 0;

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuObject {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    image_id: u64,
}

/// One mesh ready to draw this frame.
pub struct DrawItem {
    pub node: NodeHandle,
    pub geometry_id: u64,
    pub skinned: bool,
    pub cast_shadow: bool,
}

pub struct ForwardPass {
    pub frame_layout: wgpu::BindGroupLayout,
    pub shadow_frame_layout: wgpu::BindGroupLayout,
    pub object_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,

    base_sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,

    geometries: FxHashMap<u64, GpuGeometry>,
    skinned_vertices: FxHashMap<NodeHandle, wgpu::Buffer>,
    textures: FxHashMap<u64, wgpu::TextureView>,
    objects: FxHashMap<NodeHandle, GpuObject>,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ForwardPass {
    pub fn new(ctx: &WgpuContext) -> Self {
        let device = &ctx.device;
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Layout"),
            entries: &[
                uniform_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let shadow_frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Frame Layout"),
            entries: &[uniform_entry(0)],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[
                uniform_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Forward Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source(include_str!("shaders/forward.wgsl")).into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Forward Pipeline Layout"),
            bind_group_layouts: &[Some(&frame_layout), Some(&object_layout)],
            immediate_size: 0,
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Forward Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: Some(true),
                depth_compare: Some(wgpu::CompareFunction::Less),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let base_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Base Color Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            frame_layout,
            shadow_frame_layout,
            object_layout,
            pipeline,
            base_sampler,
            white_view: upload_image(ctx, &Image::solid([255, 255, 255, 255])),
            geometries: FxHashMap::default(),
            skinned_vertices: FxHashMap::default(),
            textures: FxHashMap::default(),
            objects: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Prepare
    // ========================================================================

    /// Uploads whatever the visible meshes need and returns them in draw
    /// order.
    pub fn prepare(&mut self, ctx: &WgpuContext, scene: &Scene) -> Vec<DrawItem> {
        let mut items = Vec::new();

        for (handle, mesh) in &scene.meshes {
            if !scene.is_visible(handle) {
                continue;
            }
            let Some(node) = scene.get_node(handle) else {
                continue;
            };
            let geometry = &mesh.geometry;
            if geometry.indices.is_empty() {
                continue;
            }

            self.ensure_geometry(&ctx.device, geometry);

            let joint_matrices = scene
                .skins
                .get(handle)
                .and_then(|skin| scene.skeletons.get(skin.skeleton))
                .map(|skeleton| skeleton.joint_matrices());
            let skinned = geometry.is_skinned() && joint_matrices.is_some();
            if let Some(joints) = joint_matrices.filter(|_| skinned) {
                self.upload_skinned(ctx, handle, geometry, joints);
            }

            self.update_object(ctx, handle, mesh, node.transform.world_matrix_as_mat4());

            items.push(DrawItem {
                node: handle,
                geometry_id: geometry.id(),
                skinned,
                cast_shadow: mesh.cast_shadow,
            });
        }

        items
    }

    fn ensure_geometry(&mut self, device: &wgpu::Device, geometry: &Geometry) {
        if self.geometries.contains_key(&geometry.id()) {
            return;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertices"),
            contents: bytemuck::cast_slice(&geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.geometries.insert(
            geometry.id(),
            GpuGeometry {
                vertex_buffer,
                index_buffer,
                index_count: geometry.indices.len() as u32,
            },
        );
    }

    fn upload_skinned(&mut self, ctx: &WgpuContext, node: NodeHandle, geometry: &Geometry, joints: &[Mat4]) {
        let vertices = geometry.skinned_vertices(joints);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let buffer = self.skinned_vertices.entry(node).or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Skinned Vertices"),
                size: bytes.len() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        ctx.queue.write_buffer(buffer, 0, bytes);
    }

    fn update_object(&mut self, ctx: &WgpuContext, node: NodeHandle, mesh: &Mesh, model: Mat4) {
        let uniforms = ObjectUniforms::new(model, &mesh.material, mesh.receive_shadow);
        let image_id = mesh.material.map.as_ref().map_or(WHITE_TEXTURE_ID, |image| image.id());

        let stale = self.objects.get(&node).is_none_or(|o| o.image_id != image_id);
        if stale {
            let view = match &mesh.material.map {
                Some(image) => self
                    .textures
                    .entry(image.id())
                    .or_insert_with(|| upload_image(ctx, image))
                    .clone(),
                None => self.white_view.clone(),
            };
            let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Object Uniforms"),
                size: std::mem::size_of::<ObjectUniforms>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object Bind Group"),
                layout: &self.object_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.base_sampler),
                    },
                ],
            });
            self.objects.insert(
                node,
                GpuObject {
                    uniform_buffer,
                    bind_group,
                    image_id,
                },
            );
        }

        if let Some(object) = self.objects.get(&node) {
            ctx.queue
                .write_buffer(&object.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    // ========================================================================
    // Draw
    // ========================================================================

    /// Binds and draws `item`. Group 0 must already be set.
    pub fn draw_item(&self, pass: &mut wgpu::RenderPass<'_>, item: &DrawItem) {
        let (Some(geometry), Some(object)) = (self.geometries.get(&item.geometry_id), self.objects.get(&item.node))
        else {
            return;
        };
        let vertex_buffer = if item.skinned {
            match self.skinned_vertices.get(&item.node) {
                Some(buffer) => buffer,
                None => return,
            }
        } else {
            &geometry.vertex_buffer
        };

        pass.set_bind_group(1, &object.bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..geometry.index_count, 0, 0..1);
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

fn upload_image(ctx: &WgpuContext, image: &Image) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Base Color Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
