//! Rendering
//!
//! A small fixed frame graph over wgpu:
//!
//! 1. **Shadow**: depth of every shadow-casting mesh from the sun.
//! 2. **Forward**: lit, fogged, shadow-receiving meshes onto the surface.
//! 3. **Overlay**: egui panels drawn on top (optional).
//!
//! [`Renderer`] owns the GPU context and the per-frame uniforms;
//! [`ForwardPass`] owns the mesh caches.

pub mod context;
pub mod forward;
pub mod overlay;
pub mod shadow;
pub mod uniforms;

pub use context::WgpuContext;
pub use forward::ForwardPass;
pub use overlay::Overlay;
pub use shadow::{ShadowMap, light_view_projection};
pub use uniforms::{FrameUniforms, ObjectUniforms};

use std::sync::Arc;

use winit::window::Window;

use crate::errors::Result;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// Prepends the shared uniform struct declarations to a WGSL module.
#[must_use]
pub fn shader_source(body: &str) -> String {
    let mut source = String::from(include_str!("shaders/common.wgsl"));
    source.push('\n');
    source.push_str(body);
    source
}

pub struct Renderer {
    ctx: WgpuContext,
    forward: ForwardPass,
    shadow: ShadowMap,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    shadow_frame_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, settings: &RenderSettings) -> Result<Self> {
        let size = window.inner_size();
        let ctx = WgpuContext::new(window, settings, size.width, size.height).await?;

        let forward = ForwardPass::new(&ctx);
        let shadow = ShadowMap::new(
            &ctx.device,
            settings.shadow_map_size.max(1),
            &forward.shadow_frame_layout,
            &forward.object_layout,
        );

        let frame_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &forward.frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                },
            ],
        });
        let shadow_frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Frame Bind Group"),
            layout: &forward.shadow_frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        log::info!("Renderer ready ({}x{} shadow map)", shadow.size, shadow.size);

        Ok(Self {
            ctx,
            forward,
            shadow,
            frame_buffer,
            frame_bind_group,
            shadow_frame_bind_group,
        })
    }

    #[must_use]
    pub fn context(&self) -> &WgpuContext {
        &self.ctx
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Draws `scene` as seen from its main camera, then the overlay.
    /// Scene matrices must be current (see [`Scene::update`]).
    pub fn render(&mut self, scene: &Scene, overlay: Option<&mut Overlay>) {
        let Some(camera) = scene.main_camera() else {
            return;
        };

        let (output, suboptimal) = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) => (output, false),
            wgpu::CurrentSurfaceTexture::Suboptimal(output) => (output, true),
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                self.ctx.reconfigure();
                return;
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                return;
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                log::error!("Surface acquisition failed validation");
                return;
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.ctx.surface_view_format),
            ..Default::default()
        });

        let environment = &scene.environment;
        let light_vp = light_view_projection(&environment.sun);
        let frame = FrameUniforms::new(camera, environment, light_vp, self.shadow.size);
        self.ctx
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let items = self.forward.prepare(&self.ctx, scene);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            if environment.sun.cast_shadow {
                pass.set_pipeline(&self.shadow.pipeline);
                pass.set_bind_group(0, &self.shadow_frame_bind_group, &[]);
                for item in items.iter().filter(|item| item.cast_shadow) {
                    self.forward.draw_item(&mut pass, item);
                }
            }
        }

        {
            let bg = environment.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(bg.x),
                            g: f64::from(bg.y),
                            b: f64::from(bg.z),
                            a: f64::from(bg.w),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(self.forward.pipeline());
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for item in &items {
                self.forward.draw_item(&mut pass, item);
            }
        }

        if let Some(overlay) = overlay {
            overlay.prepare(&self.ctx.device, &self.ctx.queue);
            overlay.paint(&mut encoder, &view);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        if suboptimal {
            self.ctx.reconfigure();
        }
    }
}
