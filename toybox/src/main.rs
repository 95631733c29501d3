//! Physics Playground
//!
//! A box of spinning shapes that fall, bounce off the window edges and
//! slide to rest on the floor. Features include:
//! - Drag shapes around and fling them on release
//! - Click a shape to kick it away from the cursor
//! - Live tuning of gravity, friction, bounce and kick strength
//!
//! Controls:
//! - Left drag: Move and throw a shape
//! - Left click: Kick a shape
//! - Double-click empty space: Spawn a shape
//! - Right click: Remove a shape
//! - Space: Pause/resume simulation
//! - R: Reset
//! - Escape: Quit

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context as _, Result};
use clap::Parser;
use common::{GraphicsContext, ScreenCamera};
use glam::Vec2;
use toybox::equations_ui::{draw_equations_sidebar, TOY_PHYSICS_EQUATIONS, TOY_PHYSICS_VARIABLES};
use toybox::renderer::Renderer;
use toybox::{DoubleClickDetector, PhysicsConfig, Simulation, Viewport};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Parser, Debug)]
#[command(about = "Drag, throw, spawn and remove bouncing shapes")]
struct Args {
    /// YAML file overriding the playground constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of shapes to start with
    #[arg(long, default_value_t = 8)]
    bodies: usize,

    /// Seed for reproducible layouts and jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    camera: ScreenCamera,
    simulation: Simulation,
    double_click: DoubleClickDetector,
    cursor: Vec2,
    /// Physical width left of the sidebar, as of the last frame
    free_width: Option<f32>,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, config: PhysicsConfig, bodies: usize, seed: Option<u64>) -> Self {
        let size = ctx.viewport_size();
        let renderer = Renderer::new(
            &ctx,
            bodies.max(64),
            wgpu::Color { r: 0.05, g: 0.06, b: 0.1, a: 1.0 },
        );
        let camera = ScreenCamera::new(size.x, size.y);
        let simulation = Simulation::playground(config, Viewport::new(size.x, size.y), bodies, seed);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            simulation,
            double_click: DoubleClickDetector::default(),
            cursor: Vec2::ZERO,
            free_width: None,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        let size = self.ctx.viewport_size();
        self.camera.resize(size.x, size.y);
        let viewport = self.playground_viewport();
        self.simulation.set_viewport(viewport);
    }

    /// Window area the shapes may use, excluding the sidebar
    fn playground_viewport(&self) -> Viewport {
        let size = self.ctx.viewport_size();
        Viewport::new(size.x, size.y).narrowed(self.free_width)
    }

    fn update(&mut self) {
        self.simulation.step();
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let num_bodies = self.renderer.update_instances(
            &self.ctx.device,
            &self.ctx.queue,
            self.simulation.snapshots(),
        );

        // Build egui UI
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let simulation = &mut self.simulation;
        let mut free_area = None;
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            let running = simulation.is_running();
            let frame = simulation.frame();
            let count = simulation.len();
            let tuned = draw_equations_sidebar(
                ctx,
                "Physics Playground",
                TOY_PHYSICS_EQUATIONS,
                TOY_PHYSICS_VARIABLES,
                Some(&mut simulation.config),
            );
            if tuned {
                log::debug!(
                    "Tuned g={:.2} f={:.3} e={:.2} k={:.1}",
                    simulation.config.gravity,
                    simulation.config.friction,
                    simulation.config.bounce,
                    simulation.config.kick_strength
                );
            }

            egui::Window::new("status")
                .title_bar(false)
                .resizable(false)
                .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(format!("Shapes: {}", count));
                        ui.separator();
                        ui.label(format!("Frame: {}", frame));
                        ui.separator();
                        if running {
                            ui.label(egui::RichText::new("RUNNING").color(egui::Color32::GREEN));
                        } else {
                            ui.label(egui::RichText::new("PAUSED").color(egui::Color32::YELLOW));
                        }
                    });
                });

            free_area = Some(ctx.available_rect());
        });

        // Shapes stay left of the sidebar
        if let Some(area) = free_area {
            self.free_width = Some(area.width() * full_output.pixels_per_point);
            let viewport = self.playground_viewport();
            self.simulation.set_viewport(viewport);
        }

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, num_bodies);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_left_press(&mut self) {
        let point = self.cursor;
        let grabbed = self.simulation.pointer_down(point);
        let double = self.double_click.press(Instant::now(), point);
        if grabbed.is_none() && double {
            self.simulation.double_click(point);
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

    /// Pointer moves and releases always reach an active drag, even over
    /// the sidebar, so a drag can never get stuck.
    fn handle_drag_event(&mut self, event: &WindowEvent) {
        if self.simulation.dragged().is_none() {
            return;
        }
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.simulation.pointer_move(self.cursor);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            }
            | WindowEvent::CursorLeft { .. } => {
                self.simulation.pointer_up(self.cursor);
            }
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn load_config(args: &Args) -> Result<PhysicsConfig> {
    let base = PhysicsConfig::playground();
    match &args.config {
        Some(path) => PhysicsConfig::load(path, &base)
            .with_context(|| format!("failed to load playground config from {}", path.display())),
        None => Ok(base),
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    println!("Physics Playground");
    println!();
    println!("Controls:");
    println!("  Drag         - Move and throw a shape");
    println!("  Click        - Kick a shape");
    println!("  Double-click - Spawn a shape");
    println!("  Right click  - Remove a shape");
    println!("  Space        - Pause/Resume");
    println!("  R            - Reset");
    println!();

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Physics Playground",
        1280,
        720,
    ));

    let mut app = App::new(ctx, config, args.bodies, args.seed);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                app.handle_drag_event(event);
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::CursorMoved { position, .. } => {
                            app.cursor = Vec2::new(position.x as f32, position.y as f32);
                        }
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } => app.handle_left_press(),
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Right,
                            ..
                        } => {
                            app.simulation.right_click(app.cursor);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => {
                            if app.handle_key(*key, *state) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            app.update();
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::warn!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
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
