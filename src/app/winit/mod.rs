//! Winit-based Application Runner
//!
//! [`App`] configures the window and settings; [`App::run`] takes over the
//! current thread with winit's event loop. The internal runner owns the
//! window, renderer, overlay, scene and [`Experience`] and drives one frame
//! per redraw:
//!
//! 1. tick the timer
//! 2. [`Experience::update`] (picking, animation, physics, camera)
//! 3. [`Scene::update`] (world matrices, skins)
//! 4. build the overlay panels, apply their close clicks
//! 5. render
//!
//! ```rust,ignore
//! use journey::app::winit::App;
//! use journey::settings::Settings;
//!
//! fn main() -> journey::errors::Result<()> {
//!     App::new(Settings::from_env()?).with_title("Portfolio").run()
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::app::input::Input;
use crate::assets::{GltfLoader, LoadedModel};
use crate::errors::Result;
use crate::experience::Experience;
use crate::renderer::{Overlay, Renderer};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::utils::Timer;

pub mod input_adapter;

/// Application builder.
pub struct App {
    title: String,
    settings: Settings,
}

impl App {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            title: "Journey".into(),
            settings,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Overrides the avatar model file.
    #[must_use]
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.experience.model_path = path.into();
        self
    }

    /// Runs until the window closes.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self.title, self.settings);
        event_loop.run_app(&mut runner)?;
        Ok(())
    }
}

/// Everything that exists once the window does.
struct Running {
    window: Arc<Window>,
    renderer: Renderer,
    overlay: Overlay,
    scene: Scene,
    experience: Experience,
}

struct AppRunner {
    title: String,
    settings: Settings,
    running: Option<Running>,
    input: Input,
    timer: Timer,
}

impl AppRunner {
    fn new(title: String, settings: Settings) -> Self {
        Self {
            title,
            settings,
            running: None,
            input: Input::new(),
            timer: Timer::new(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        log::info!("Initializing renderer...");
        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.settings.render))?;
        let overlay = Overlay::new(&renderer.context().device, renderer.context().color_format(), &window);

        let mut scene = Scene::new();
        let model = load_model(&self.settings, &mut scene);

        let size = window.inner_size();
        self.input.inject_resize(size.width, size.height);
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let experience = Experience::new(
            &mut scene,
            &self.settings.experience,
            &self.settings.render,
            model,
            aspect,
        );

        Ok(Running {
            window,
            renderer,
            overlay,
            scene,
            experience,
        })
    }

    fn frame(&mut self) {
        let Some(running) = &mut self.running else {
            return;
        };

        let dt = self.timer.tick();

        running.experience.update(dt, &mut running.scene, &self.input);
        running.scene.update();

        let panels = running
            .experience
            .overlay_panels(&running.scene, self.input.screen_size());
        let hovering = running.experience.hovered().is_some();
        for k in running.overlay.run(&running.window, &panels, hovering) {
            running.experience.handle_click(k, true);
        }

        running.renderer.render(&running.scene, Some(&mut running.overlay));
        self.input.start_frame();
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(running) = &mut self.running else {
            return;
        };
        let scale_factor = running.window.scale_factor() as f32;
        running.renderer.resize(width, height);
        running.overlay.resize(width, height, scale_factor);
        if height > 0
            && let Some((_, camera)) = running.scene.query_main_camera_bundle()
        {
            camera.set_aspect(width as f32 / height as f32);
        }
    }
}

/// A missing or broken model is not fatal: the scene runs without the avatar.
fn load_model(settings: &Settings, scene: &mut Scene) -> Option<LoadedModel> {
    let path = &settings.experience.model_path;
    match GltfLoader::load(path, scene) {
        Ok(model) => Some(model),
        Err(e) => {
            log::error!("Failed to load avatar model {}: {e}", path.display());
            None
        }
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
                self.timer = Timer::new();
            }
            Err(e) => {
                log::error!("Fatal initialization error: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let consumed = running.overlay.handle_input(&running.window, &event);
        if !consumed {
            input_adapter::process_window_event(&mut self.input, &event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if consumed {
                    self.input.inject_resize(size.width, size.height);
                }
                self.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(running) = &self.running {
                    running.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
