//! Bouncing Mascot
//!
//! A single bunny-sized body that falls, bounces and rolls to a stop.
//!
//! Controls:
//! - Drag: Pick the mascot up and drop it anywhere
//! - Click: Kick the mascot away from the cursor
//! - Space: Pause/resume
//! - R: Put the mascot back at its start position
//! - Escape: Quit

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use common::{GraphicsContext, ScreenCamera};
use glam::Vec2;
use toybox::renderer::Renderer;
use toybox::{Gesture, PhysicsConfig, Simulation, Viewport};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Parser, Debug)]
#[command(about = "A draggable, kickable bouncing mascot")]
struct Args {
    /// YAML file overriding the mascot constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible kick jitter
    #[arg(long)]
    seed: Option<u64>,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    camera: ScreenCamera,
    simulation: Simulation,
    cursor: Vec2,
}

impl App {
    fn new(ctx: GraphicsContext, config: PhysicsConfig, seed: Option<u64>) -> Self {
        let size = ctx.viewport_size();
        let renderer = Renderer::new(&ctx, 1, wgpu::Color { r: 0.97, g: 0.95, b: 0.9, a: 1.0 });
        let camera = ScreenCamera::new(size.x, size.y);

        let mut simulation = Simulation::mascot(config, Viewport::new(size.x, size.y));
        if let Some(seed) = seed {
            simulation = simulation.with_seed(seed);
        }

        Self {
            ctx,
            renderer,
            camera,
            simulation,
            cursor: Vec2::ZERO,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        let size = self.ctx.viewport_size();
        self.camera.resize(size.x, size.y);
        self.simulation.set_viewport(Viewport::new(size.x, size.y));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let count = self.renderer.update_instances(
            &self.ctx.device,
            &self.ctx.queue,
            self.simulation.snapshots(),
        );

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, count);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_release(&mut self) {
        if let Some(Gesture::Kick { impulse, .. }) = self.simulation.pointer_up(self.cursor) {
            log::info!("Boing! {:.1} px/frame", impulse.velocity().length());
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Space => {
                if self.simulation.is_running() {
                    self.simulation.stop();
                } else {
                    self.simulation.start();
                }
            }
            KeyCode::KeyR => self.simulation.reset(),
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = Args::parse();
    let base = PhysicsConfig::mascot();
    let config = match &args.config {
        Some(path) => PhysicsConfig::load(path, &base)
            .with_context(|| format!("failed to load mascot config from {}", path.display()))?,
        None => base,
    };

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Bouncing Mascot",
        800,
        600,
    ));

    let mut app = App::new(ctx, config, args.seed);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => app.resize(size),
                WindowEvent::CursorMoved { position, .. } => {
                    app.cursor = Vec2::new(position.x as f32, position.y as f32);
                    app.simulation.pointer_move(app.cursor);
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => {
                        app.simulation.pointer_down(app.cursor);
                    }
                    ElementState::Released => app.handle_release(),
                },
                WindowEvent::CursorLeft { .. } => app.handle_release(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    if app.handle_key(key, state) {
                        elwt.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    app.simulation.step();
                    match app.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            Event::LoopExiting => {
                app.simulation.stop();
            }
            _ => {}
        }
    })?;

    Ok(())
}
