//! Overlay panels drawn with egui on top of the 3D scene.
//!
//! Per frame:
//!
//! ```text
//! handle_input()      // forward winit events to egui
//! run(window, ...)    // build the panels, tessellate, collect close clicks
//! prepare(...)        // upload egui textures and buffers
//! paint(encoder, ..)  // record the egui pass onto the surface
//! ```

use winit::event::WindowEvent;
use winit::window::Window;

use crate::experience::OverlayPanel;

/// Widest a panel grows before wrapping its text, in points.
const PANEL_MAX_WIDTH: f32 = 280.0;

pub struct Overlay {
    egui_ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,

    clipped_primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen_descriptor: egui_wgpu::ScreenDescriptor,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self {
        let size = window.inner_size();
        let egui_ctx = egui::Context::default();

        let id = egui_ctx.viewport_id();
        let state = egui_winit::State::new(egui_ctx.clone(), id, window, None, None, None);
        let renderer = egui_wgpu::Renderer::new(device, output_format, egui_wgpu::RendererOptions::default());

        Self {
            egui_ctx,
            state,
            renderer,
            clipped_primitives: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: window.scale_factor() as f32,
            },
        }
    }

    /// Forwards a winit event to egui and returns whether egui consumed it.
    ///
    /// Mouse releases are never reported as consumed, so a drag that ends
    /// over a panel still ends for the orbit controls.
    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);

        if let WindowEvent::MouseInput {
            state: winit::event::ElementState::Released,
            ..
        } = event
        {
            return false;
        }

        response.consumed
    }

    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.screen_descriptor.size_in_pixels = [width, height];
        self.screen_descriptor.pixels_per_point = scale_factor;
    }

    /// Builds this frame's panels and returns the indices whose close
    /// button was clicked. `pointer_cursor` shows a hand cursor, used while
    /// a marker is hovered.
    pub fn run(&mut self, window: &Window, panels: &[OverlayPanel], pointer_cursor: bool) -> Vec<usize> {
        let raw_input = self.state.take_egui_input(window);
        self.egui_ctx.begin_pass(raw_input);

        let ppp = self.egui_ctx.pixels_per_point();
        let mut closed = Vec::new();
        for panel in panels {
            let anchor = egui::pos2(panel.anchor.x / ppp, panel.anchor.y / ppp);
            egui::Area::new(egui::Id::new(("waypoint_panel", panel.index)))
                .fixed_pos(anchor)
                .pivot(egui::Align2::CENTER_BOTTOM)
                .show(&self.egui_ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(PANEL_MAX_WIDTH);
                        ui.heading(&panel.title);
                        ui.label(&panel.text);
                        if ui.button("Close").clicked() {
                            closed.push(panel.index);
                        }
                    });
                });
        }
        if pointer_cursor && !self.egui_ctx.egui_wants_pointer_input() {
            self.egui_ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let egui::FullOutput {
            shapes,
            textures_delta,
            platform_output,
            ..
        } = self.egui_ctx.end_pass();

        self.state.handle_platform_output(window, platform_output);
        self.textures_delta = textures_delta;
        self.clipped_primitives = self.egui_ctx.tessellate(shapes, ppp);

        closed
    }

    /// Uploads egui textures and vertex data, submitting the copies at once.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui buffer upload"),
        });
        let user_cmd_bufs = self.renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &self.clipped_primitives,
            &self.screen_descriptor,
        );
        let mut cmd_bufs = Vec::with_capacity(1 + user_cmd_bufs.len());
        cmd_bufs.push(encoder.finish());
        cmd_bufs.extend(user_cmd_bufs);
        queue.submit(cmd_bufs);

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
        self.textures_delta.set.clear();
        self.textures_delta.free.clear();
    }

    pub fn paint(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut rpass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        self.renderer
            .render(&mut rpass, &self.clipped_primitives, &self.screen_descriptor);
    }
}
