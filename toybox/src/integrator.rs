//! Explicit Euler step, one call per animation frame.
//!
//! Units are pixels and frames: there is no `dt`, the host's redraw cadence
//! is the clock. Fast bodies may tunnel past an edge for a frame before the
//! clamp catches them; there is no sub-stepping.

use glam::Vec2;

use crate::body::{Body, BodyMode};
use crate::boundary::{self, Contacts, Viewport};
use crate::config::PhysicsConfig;

/// Advance one body by a single frame and return the edges it touched.
///
/// Dragged bodies follow their pointer sample with zero velocity and are
/// never integrated.
pub fn step_body(body: &mut Body, viewport: Viewport, config: &PhysicsConfig) -> Contacts {
    if let BodyMode::Dragged { grab_offset, pointer } = body.mode {
        body.position = viewport.clamp(pointer - grab_offset, body.size);
        body.velocity = Vec2::ZERO;
        return Contacts::default();
    }

    if !boundary::is_resting(body, viewport) {
        body.velocity.y += config.gravity;
    }
    body.velocity *= config.friction;
    body.position += body.velocity;

    let contacts = boundary::resolve(body, viewport, config);
    advance_spin(body, &contacts, config);
    contacts
}

/// Rotate by the current spin speed, shedding spin while on the floor.
/// Heavier bodies lose spin faster.
fn advance_spin(body: &mut Body, contacts: &Contacts, config: &PhysicsConfig) {
    let mass = body.mass();
    if let Some(spin) = body.spin.as_mut() {
        spin.angle = (spin.angle + spin.speed).rem_euclid(std::f32::consts::TAU);
        if contacts.floor {
            spin.speed *= config.spin_damping.powf(mass);
        }
    }
}
