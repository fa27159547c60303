//! The viewer: owns the GPU context, camera, simulation and renderer, and
//! runs one frame per redraw.

use crate::camera::PerspectiveCamera;
use crate::core::{Clock, Context, ContextError};
use crate::math::Vector3;
use crate::render::BlobRenderer;
use crate::sim::{
    Params, Simulation, BLOB_SIZE_RANGE, MOUSE_RADIUS_RANGE, REPULSION_FORCE_RANGE,
    SPRING_STIFFNESS_RANGE,
};
use std::sync::Arc;
use winit::window::Window;

/// Camera distance from the origin along +Z.
const CAMERA_DISTANCE: f32 = 10.0;

/// The interactive viewer. One instance per window.
pub struct Viewer {
    context: Context,
    clock: Clock,
    camera: PerspectiveCamera,
    /// The simulation state driven by this viewer.
    pub sim: Simulation,
    renderer: BlobRenderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    frame_times: Vec<f32>,
    fps: f32,
}

impl Viewer {
    /// Create a viewer for a window, spawning one starter blob.
    pub async fn new(window: Arc<Window>, params: Params) -> Result<Self, ContextError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let context = Context::new(window.clone(), width, height).await?;

        let mut camera =
            PerspectiveCamera::new(60.0, width as f32 / height as f32, 0.1, 100.0);
        camera.set_position(Vector3::new(0.0, 0.0, CAMERA_DISTANCE));
        camera.set_target(Vector3::ZERO);

        let params = crate::sim::shared(params);
        let mut sim = Simulation::new(params.clone());
        sim.spawn_at(Vector3::ZERO);

        let renderer = BlobRenderer::new(&context, params);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &context.device,
            context.surface_format,
            Some(context.depth_format),
            1,
            false,
        );

        log::info!("viewer ready at {width}x{height}");

        Ok(Self {
            context,
            clock: Clock::start_new(),
            camera,
            sim,
            renderer,
            egui_ctx,
            egui_state,
            egui_renderer,
            frame_times: Vec::with_capacity(60),
            fps: 0.0,
        })
    }

    /// Handle a window resize: surface, depth buffer and camera aspect.
    /// The simulation is untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.camera.set_aspect(self.context.aspect_ratio());
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.context.width, self.context.height)
    }

    /// Let egui see a window event first. Returns true if it consumed it.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Track a pointer move.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let (w, h) = self.size();
        self.sim.pointer_moved(x, y, w as f32, h as f32);
    }

    /// Handle a pointer press: drag the blob under the cursor or spawn one.
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        let (w, h) = self.size();
        self.sim
            .pointer_pressed(x, y, w as f32, h as f32, &mut self.camera);
    }

    /// Handle a pointer release.
    pub fn pointer_released(&mut self) {
        self.sim.pointer_released();
    }

    /// Reconfigure a lost surface.
    pub fn reconfigure_surface(&self) {
        self.context.reconfigure();
    }

    /// Run one frame: physics, uploads, blob pass, panel pass, present.
    pub fn frame(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let dt = self.clock.get_delta() as f32;
        let elapsed = self.clock.get_elapsed_time() as f32;
        self.track_fps(dt);

        // All physics for the frame completes before any render work.
        self.sim.step(dt, &mut self.camera);
        self.renderer
            .prepare(&self.context, &mut self.camera, &mut self.sim.registry, elapsed);

        let output = self.context.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Panel UI. The context handle is cheaply cloneable, which keeps the
        // closure free to borrow the rest of the viewer.
        let raw_input = self.egui_state.take_egui_input(window);
        let egui_ctx = self.egui_ctx.clone();
        let egui_output = egui_ctx.run(raw_input, |ctx| self.build_panel(ctx));

        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let clipped_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.context.width, self.context.height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.context.device, &self.context.queue, *id, image_delta);
        }

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        self.egui_renderer.update_buffers(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let clear_color = self.sim.params.borrow().background;
        self.renderer
            .draw(&mut encoder, &view, &self.context.depth_view, clear_color);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn track_fps(&mut self, dt: f32) {
        self.frame_times.push(dt);
        if self.frame_times.len() > 60 {
            self.frame_times.remove(0);
        }
        let sum: f32 = self.frame_times.iter().sum();
        if sum > 0.0 {
            self.fps = self.frame_times.len() as f32 / sum;
        }
    }

    fn build_panel(&mut self, ctx: &egui::Context) {
        let blob_count = self.sim.registry.len();
        let fps = self.fps;
        let mut add_blob = false;
        let mut remove_blob = false;
        let mut clear_all = false;
        let mut save_params = false;

        {
            let mut params = self.sim.params.borrow_mut();
            egui::Window::new("Blobs")
                .default_pos([10.0, 10.0])
                .default_width(260.0)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("Physics");
                    ui.add(
                        egui::Slider::new(&mut params.repulsion_force, REPULSION_FORCE_RANGE)
                            .text("Repulsion"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.spring_stiffness, SPRING_STIFFNESS_RANGE)
                            .text("Stiffness"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.mouse_radius, MOUSE_RADIUS_RANGE)
                            .text("Mouse radius"),
                    );

                    ui.separator();
                    ui.heading("Appearance");
                    ui.add(
                        egui::Slider::new(&mut params.blob_size, BLOB_SIZE_RANGE)
                            .text("Blob size"),
                    );

                    let mut c1 = params.color1.to_array();
                    if ui.color_edit_button_rgb(&mut c1).changed() {
                        params.color1 = c1.into();
                    }
                    let mut c2 = params.color2.to_array();
                    if ui.color_edit_button_rgb(&mut c2).changed() {
                        params.color2 = c2.into();
                    }

                    ui.separator();
                    ui.horizontal(|ui| {
                        add_blob = ui.button("Add blob").clicked();
                        remove_blob = ui.button("Remove blob").clicked();
                        clear_all = ui.button("Clear").clicked();
                    });

                    ui.separator();
                    save_params = ui.button("Save params").clicked();
                    ui.label(format!("{blob_count} blobs, {fps:.0} fps"));
                    ui.label("Click empty space to spawn, drag a blob to move it.");
                });
        }

        if add_blob {
            self.sim.spawn_at(Vector3::ZERO);
        }
        if remove_blob {
            self.sim.registry.remove_last();
        }
        if clear_all {
            self.sim.registry.clear_all();
        }
        if save_params {
            let params = self.sim.params.borrow();
            match params.to_file("gloop.json") {
                Ok(()) => log::info!("saved parameters to gloop.json"),
                Err(e) => log::warn!("failed to save parameters: {e}"),
            }
        }
    }
}
