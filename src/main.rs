//! gloop
//!
//! Interactive squishy-blob toy: click to spawn, drag to move, tune in the
//! panel.

use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use gloop::app::Viewer;
use gloop::math::Color;
use gloop::sim::Params;

/// Interactive squishy-blob toy
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a JSON parameter file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the size of newly created blobs
    #[arg(long)]
    size: Option<f32>,

    /// Override the bottom blend color (hex, e.g. "#ff3366")
    #[arg(long)]
    color1: Option<String>,

    /// Override the top blend color (hex, e.g. "#3366ff")
    #[arg(long)]
    color2: Option<String>,
}

/// Application state for the winit event loop.
struct App {
    window: Option<Arc<Window>>,
    viewer: Option<Viewer>,
    params: Params,
    last_cursor: Option<(f64, f64)>,
}

impl App {
    fn new(params: Params) -> Self {
        Self {
            window: None,
            viewer: None,
            params,
            last_cursor: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("gloop")
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );
        self.window = Some(window.clone());

        let viewer = pollster::block_on(Viewer::new(window, self.params.clone()))
            .expect("Failed to initialize GPU context");
        self.viewer = Some(viewer);

        log::info!("window created, entering frame loop");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // The panel sees events first; consumed ones never reach the
        // interaction controller.
        let egui_consumed = if let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window)
        {
            viewer.handle_event(window, &event)
        } else {
            false
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = Some((position.x, position.y));
                if !egui_consumed {
                    if let Some(viewer) = &mut self.viewer {
                        viewer.pointer_moved(position.x as f32, position.y as f32);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    if let Some(viewer) = &mut self.viewer {
                        match state {
                            ElementState::Pressed if !egui_consumed => {
                                if let Some((x, y)) = self.last_cursor {
                                    viewer.pointer_pressed(x as f32, y as f32);
                                }
                            }
                            // A release always ends the drag, even when the
                            // cursor sits over the panel.
                            ElementState::Released => viewer.pointer_released(),
                            _ => {}
                        }
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{Key, NamedKey};
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) {
                    match viewer.frame(window) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            viewer.reconfigure_surface();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("out of GPU memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut params = if let Some(ref path) = args.config {
        match Params::from_file(path) {
            Ok(p) => {
                log::info!("loaded parameters from {path}");
                p
            }
            Err(e) => {
                log::warn!("failed to load {path}: {e}, using defaults");
                Params::default()
            }
        }
    } else {
        Params::default()
    };

    if let Some(size) = args.size {
        params.blob_size = size;
        params.clamp();
    }
    if let Some(ref hex) = args.color1 {
        match Color::from_hex_str(hex) {
            Some(c) => params.color1 = c,
            None => log::warn!("invalid --color1 value {hex:?}, keeping {}", params.color1.to_hex_str()),
        }
    }
    if let Some(ref hex) = args.color2 {
        match Color::from_hex_str(hex) {
            Some(c) => params.color2 = c,
            None => log::warn!("invalid --color2 value {hex:?}, keeping {}", params.color2.to_hex_str()),
        }
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
