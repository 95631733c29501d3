//! The simulation owns every body, the viewport, the active drag and the
//! random source. One instance per hosting window; nothing is shared.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::{Body, BodyId, BodyMode, BodySnapshot};
use crate::boundary::Viewport;
use crate::config::PhysicsConfig;
use crate::input::{self, DragSession, KickImpulse, Release};
use crate::integrator;

/// Which widget this simulation backs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One body, drag and kick only
    Mascot,
    /// Spinning shapes that can be spawned, removed and thrown
    Playground,
}

/// Outcome of a pointer release
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Kick { body: BodyId, impulse: KickImpulse },
    Throw { body: BodyId, velocity: Vec2 },
}

const MASCOT_COLOR: [f32; 4] = [1.0, 0.85, 0.9, 1.0];

pub struct Simulation {
    pub config: PhysicsConfig,
    variant: Variant,
    viewport: Viewport,
    bodies: Vec<Body>,
    drag: Option<DragSession>,
    rng: StdRng,
    next_id: u64,
    initial_count: usize,
    running: bool,
    frame: u64,
}

impl Simulation {
    /// Empty, stopped simulation
    pub fn new(variant: Variant, config: PhysicsConfig, viewport: Viewport) -> Self {
        Self {
            config,
            variant,
            viewport,
            bodies: Vec::new(),
            drag: None,
            rng: StdRng::from_entropy(),
            next_id: 0,
            initial_count: 0,
            running: false,
            frame: 0,
        }
    }

    /// Replace the random source with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// A running simulation holding the single mascot body
    pub fn mascot(config: PhysicsConfig, viewport: Viewport) -> Self {
        let mut sim = Self::new(Variant::Mascot, config, viewport);
        sim.initial_count = 1;
        sim.populate();
        sim.start();
        sim
    }

    /// A running playground with `count` randomly placed shapes
    pub fn playground(config: PhysicsConfig, viewport: Viewport, count: usize, seed: Option<u64>) -> Self {
        let mut sim = Self::new(Variant::Playground, config, viewport);
        if let Some(seed) = seed {
            sim = sim.with_seed(seed);
        }
        sim.initial_count = count;
        sim.populate();
        sim.start();
        sim
    }

    fn populate(&mut self) {
        match self.variant {
            Variant::Mascot => {
                let size = self.config.body_size;
                let position = Vec2::new(
                    (self.viewport.width - size.x) * 0.5,
                    self.viewport.height / 3.0,
                );
                let position = self.viewport.clamp(position, size);
                self.insert(Body::new(BodyId(0), position, size).with_color(MASCOT_COLOR));
            }
            Variant::Playground => {
                for _ in 0..self.initial_count {
                    let size = self.random_size();
                    let max = self.viewport.max_position(size);
                    let position = Vec2::new(
                        self.rng.gen::<f32>() * max.x,
                        self.rng.gen::<f32>() * max.y * 0.5,
                    );
                    self.spawn(position, size);
                }
            }
        }
    }

    /// Drop every body and rebuild the initial set
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.drag = None;
        self.frame = 0;
        self.populate();
        log::info!("Reset {:?} simulation with {} bodies", self.variant, self.bodies.len());
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("Started {:?} simulation", self.variant);
        }
    }

    /// Halt frame updates and end any drag in progress
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.cancel_drag();
            log::info!("Stopped {:?} simulation at frame {}", self.variant, self.frame);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The host was resized; bodies outside are pulled back next frame
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn dragged(&self) -> Option<BodyId> {
        self.drag.as_ref().map(|session| session.body)
    }

    /// Render data in draw order, bottom first
    pub fn snapshots(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
        self.bodies.iter().map(Body::snapshot)
    }

    /// Advance every body by one frame
    pub fn step(&mut self) {
        if !self.running {
            return;
        }
        if let Some(session) = self.drag.as_mut() {
            session.on_frame();
        }

        let viewport = self.viewport;
        for body in &mut self.bodies {
            integrator::step_body(body, viewport, &self.config);
            body.kicked_frames = body.kicked_frames.saturating_sub(1);
        }
        self.frame += 1;
    }

    /// Add a body, assigning it a fresh id
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body; unknown ids are ignored
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|body| body.id == id)?;
        if self.dragged() == Some(id) {
            self.drag = None;
        }
        Some(self.bodies.remove(index))
    }

    /// Topmost body under `point`
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies.iter().rev().find(|body| body.contains(point)).map(|body| body.id)
    }

    /// Grab the body under the pointer, if any
    pub fn pointer_down(&mut self, point: Vec2) -> Option<BodyId> {
        if !self.running {
            return None;
        }
        self.cancel_drag();

        let id = self.body_at(point)?;
        let body = self.body_mut(id)?;
        body.mode = BodyMode::Dragged {
            grab_offset: point - body.position,
            pointer: point,
        };
        body.velocity = Vec2::ZERO;
        self.drag = Some(DragSession::begin(id, point));
        log::debug!("Drag start on {:?} at {:?}", id, point);
        Some(id)
    }

    /// Move the dragged body along with the pointer
    pub fn pointer_move(&mut self, point: Vec2) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        session.move_to(point);
        let id = session.body;
        let viewport = self.viewport;
        if let Some(body) = self.body_mut(id) {
            if let BodyMode::Dragged { grab_offset, .. } = body.mode {
                body.mode = BodyMode::Dragged { grab_offset, pointer: point };
                body.position = viewport.clamp(point - grab_offset, body.size);
            }
        }
    }

    /// End the drag wherever the pointer is, kicking or throwing the body
    pub fn pointer_up(&mut self, point: Vec2) -> Option<Gesture> {
        let session = self.drag.take()?;
        let id = session.body;
        let release = session.release(point, self.config.click_slop);
        if let Some(body) = self.body_mut(id) {
            body.mode = BodyMode::Dynamic;
        }

        match release {
            Release::Click(click) => {
                let impulse = self.kick(id, click)?;
                Some(Gesture::Kick { body: id, impulse })
            }
            Release::Throw(delta) => {
                let velocity = delta * self.config.throw_scale;
                let body = self.body_mut(id)?;
                body.velocity = velocity;
                log::debug!("Released {:?} with velocity {:?}", id, velocity);
                Some(Gesture::Throw { body: id, velocity })
            }
        }
    }

    /// Knock a body away from `click`
    pub fn kick(&mut self, id: BodyId, click: Vec2) -> Option<KickImpulse> {
        let jitter = input::sample_jitter(&mut self.rng, self.config.kick_jitter);
        let strength = self.config.kick_strength;
        let flash = self.config.kick_flash_frames;

        let body = self.bodies.iter_mut().find(|body| body.id == id)?;
        if body.is_dragged() {
            return None;
        }
        let impulse = KickImpulse::new(body, click, strength, jitter);
        body.velocity = impulse.velocity();
        body.kicked_frames = flash;
        log::debug!("Kicked {:?} with {:?}", id, impulse);
        Some(impulse)
    }

    /// Spawn a body at the pointer when it lands on empty space.
    /// Like every pointer gesture, ignored while stopped.
    pub fn double_click(&mut self, point: Vec2) -> Option<BodyId> {
        if self.variant != Variant::Playground || !self.running || self.body_at(point).is_some() {
            return None;
        }
        let size = self.random_size();
        let id = self.spawn(point - size * 0.5, size);
        log::debug!("Spawned {:?} at {:?}", id, point);
        Some(id)
    }

    /// Remove the topmost body under the pointer
    pub fn right_click(&mut self, point: Vec2) -> Option<BodyId> {
        if self.variant != Variant::Playground || !self.running {
            return None;
        }
        let id = self.body_at(point)?;
        self.remove(id)?;
        log::debug!("Removed {:?}", id);
        Some(id)
    }

    fn spawn(&mut self, position: Vec2, size: Vec2) -> BodyId {
        let speed = self.config.spawn_speed;
        let spin = self.config.spawn_spin;
        let velocity = Vec2::new(self.symmetric(speed), self.symmetric(speed));
        let spin_speed = self.symmetric(spin);
        let position = self.viewport.clamp(position, size);

        let body = Body::new(BodyId(0), position, size)
            .with_velocity(velocity)
            .with_spin(spin_speed);
        let color = color_for_mass(body.mass());
        self.insert(body.with_color(color))
    }

    fn random_size(&mut self) -> Vec2 {
        let range = self.config.size_range;
        let side = if range.max > range.min {
            self.rng.gen_range(range.min..=range.max)
        } else {
            range.min
        };
        Vec2::splat(side)
    }

    fn symmetric(&mut self, bound: f32) -> f32 {
        if bound > 0.0 {
            self.rng.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            if let Some(body) = self.body_mut(session.body) {
                body.mode = BodyMode::Dynamic;
                body.velocity = Vec2::ZERO;
            }
            log::debug!("Drag on {:?} cancelled", session.body);
        }
    }
}

/// Light bodies are blue, heavy ones red
fn color_for_mass(mass: f32) -> [f32; 4] {
    let t = (mass / 2.5).clamp(0.0, 1.0);
    [
        0.2 + 0.8 * t,
        0.4 + 0.3 * (1.0 - t),
        1.0 - 0.6 * t,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playground(count: usize) -> Simulation {
        Simulation::playground(PhysicsConfig::playground(), Viewport::new(800.0, 600.0), count, Some(42))
    }

    #[test]
    fn mascot_starts_running_with_one_body() {
        let sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
        assert!(sim.is_running());
        assert_eq!(sim.len(), 1);
        assert_eq!(sim.bodies()[0].spin, None);
        assert_eq!(sim.bodies()[0].size, Vec2::splat(60.0));
    }

    #[test]
    fn playground_bodies_fit_size_range() {
        let sim = playground(12);
        let range = sim.config.size_range;
        assert_eq!(sim.len(), 12);
        for body in sim.bodies() {
            assert!(body.size.x >= range.min && body.size.x <= range.max);
            assert!(body.spin.is_some());
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut sim = playground(3);
        let a = sim.double_click(Vec2::new(790.0, 590.0));
        let b = sim.insert(Body::new(BodyId(0), Vec2::ZERO, Vec2::ONE));
        let mut ids: Vec<_> = sim.bodies().iter().map(|body| body.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), sim.len());
        assert_ne!(a, Some(b));
    }

    #[test]
    fn stopped_simulation_ignores_steps() {
        let mut sim = playground(4);
        sim.stop();
        let before: Vec<_> = sim.bodies().to_vec();
        sim.step();
        assert_eq!(sim.bodies(), before.as_slice());
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn paused_playground_ignores_spawn_and_remove() {
        let mut sim = playground(3);
        let target = sim.bodies()[0].center();
        let count = sim.len();
        sim.stop();

        assert_eq!(sim.right_click(target), None);
        assert_eq!(sim.double_click(Vec2::new(790.0, 590.0)), None);
        assert_eq!(sim.len(), count);

        sim.start();
        assert!(sim.right_click(target).is_some());
        assert_eq!(sim.len(), count - 1);
    }

    #[test]
    fn stop_releases_the_drag() {
        let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
        let center = sim.bodies()[0].center();
        let id = sim.pointer_down(center).unwrap();
        assert_eq!(sim.dragged(), Some(id));

        sim.stop();
        assert_eq!(sim.dragged(), None);
        assert!(!sim.body(id).unwrap().is_dragged());
        assert_eq!(sim.pointer_up(center), None);
    }

    #[test]
    fn pointer_down_on_empty_space_grabs_nothing() {
        let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
        assert_eq!(sim.pointer_down(Vec2::new(1.0, 599.0)), None);
        assert_eq!(sim.pointer_up(Vec2::new(1.0, 599.0)), None);
    }

    #[test]
    fn removing_unknown_body_is_a_no_op() {
        let mut sim = playground(2);
        assert!(sim.remove(BodyId(999)).is_none());
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn removing_dragged_body_ends_the_drag() {
        let mut sim = playground(0);
        let id = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));
        sim.pointer_down(Vec2::new(120.0, 120.0));
        sim.remove(id);
        assert_eq!(sim.dragged(), None);
        assert_eq!(sim.pointer_up(Vec2::new(300.0, 300.0)), None);
    }

    #[test]
    fn mascot_ignores_playground_gestures() {
        let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
        let center = sim.bodies()[0].center();
        assert_eq!(sim.double_click(Vec2::new(5.0, 5.0)), None);
        assert_eq!(sim.right_click(center), None);
        assert_eq!(sim.len(), 1);
    }

    #[test]
    fn kicked_flag_expires() {
        let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0)).with_seed(1);
        let id = sim.bodies()[0].id;
        let corner = sim.bodies()[0].position;
        sim.kick(id, corner).unwrap();
        assert!(sim.body(id).unwrap().is_kicked());

        for _ in 0..sim.config.kick_flash_frames {
            sim.step();
        }
        assert!(!sim.body(id).unwrap().is_kicked());
    }

    #[test]
    fn reset_restores_initial_population() {
        let mut sim = playground(5);
        sim.double_click(Vec2::new(790.0, 590.0));
        sim.step();
        sim.reset();
        assert_eq!(sim.len(), 5);
        assert_eq!(sim.frame(), 0);
    }
}
