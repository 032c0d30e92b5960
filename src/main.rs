//! Waterline - Analytic ocean wave field with planar reflections
//!
//! The demo flies a procedural orbit over (and under) the water so the
//! tracker's origin jumps and the submersion flip are both exercised
//! without any input handling.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use waterline::camera::{CameraPose, OrbitPath};
use waterline::cli::Args;
use waterline::environment::Environment;
use waterline::error::WaterError;
use waterline::params::{RenderConfig, TerrainParams, WaveDef};
use waterline::rendering::{GpuContext, RenderSystem};
use waterline::water::WaterSystem;

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    water: Option<WaterSystem>,

    terrain: TerrainParams,
    wave_defs: Vec<WaveDef>,
    render_config: RenderConfig,
    orbit: OrbitPath,

    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Self {
        Self {
            window: None,
            render_system: None,
            water: None,
            terrain: args.terrain_params(),
            wave_defs: args.wave_defs(),
            render_config: args.render_config(),
            orbit: OrbitPath::default(),
            start_time: Instant::now(),
        }
    }

    fn init_systems(&mut self, window: Arc<Window>) -> Result<(), WaterError> {
        let gpu = pollster::block_on(GpuContext::new(Arc::clone(&window)))?;

        let env = Environment {
            capabilities: gpu.capabilities(),
            viewport: (
                self.render_config.window_width,
                self.render_config.window_height,
            ),
            ..Environment::default()
        };

        let mut water = WaterSystem::new(&env, &self.terrain, &self.wave_defs)?;
        water.set_fade_color(self.render_config.fade_color);
        let render_system = RenderSystem::new(gpu, &water, &self.render_config);

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.water = Some(water);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Waterline")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("{}", WaterError::from(e));
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_systems(window) {
            eprintln!("{}", e);
            event_loop.exit();
            return;
        }

        println!("\nWaterline is running!");
        println!("Press ESC to quit\n");
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.gpu_mut().resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref render_system) = self.render_system else {
            return;
        };
        let Some(ref mut water) = self.water else {
            return;
        };

        let time_s = self.start_time.elapsed().as_secs_f32();

        // Fly the orbit; the water core does the rest per frame
        let (eye, target) = self.orbit.position_and_target(time_s);
        let mut camera = CameraPose::look_at(
            eye,
            target,
            self.render_config.fov_degrees,
            self.render_config.aspect_ratio(),
        );
        camera.near = self.render_config.near_plane_m;
        camera.far = self.render_config.far_plane_m;

        let frame = water.update(time_s, &camera);

        if frame.submersion_edge {
            println!(
                "Observer {} the surface",
                if frame.submerged { "went below" } else { "came above" }
            );
        }

        if let Err(e) = render_system.render(water, &frame) {
            eprintln!("Render error: {:?}", e);
        }
    }
}

fn main() -> Result<(), WaterError> {
    let args = Args::parse();

    println!("Waterline - analytic wave field and reflection planes");
    println!("Initializing systems...\n");

    let mut app = App::new(&args);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
