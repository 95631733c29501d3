//! Viewport containment with lossy bounces

use glam::Vec2;

use crate::body::Body;
use crate::config::PhysicsConfig;

/// Visible area in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Negative or NaN extents collapse to zero
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Limit the width to `max_width` when the host reserves part of the window
    pub fn narrowed(self, max_width: Option<f32>) -> Self {
        match max_width {
            Some(max_width) => Self::new(self.width.min(max_width), self.height),
            None => self,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Largest top-left position that keeps a body of `size` fully visible.
    /// Never negative, even when the body is larger than the viewport.
    pub fn max_position(&self, size: Vec2) -> Vec2 {
        (self.size() - size).max(Vec2::ZERO)
    }

    pub fn clamp(&self, position: Vec2, size: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, self.max_position(size))
    }
}

/// Which edges a body touched during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    /// Bottom edge, either by bouncing or by resting on it
    pub floor: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.floor
    }
}

/// True when the body lies on the floor with no vertical motion
pub fn is_resting(body: &Body, viewport: Viewport) -> bool {
    body.velocity.y == 0.0 && body.position.y >= viewport.max_position(body.size).y
}

/// Clamp `body` into the viewport, reflecting velocity on each crossed edge.
///
/// Floor contact also bleeds off horizontal speed, and a floor rebound slower
/// than `rest_speed + gravity` settles the body so gravity stops
/// re-launching it.
pub fn resolve(body: &mut Body, viewport: Viewport, config: &PhysicsConfig) -> Contacts {
    let max = viewport.max_position(body.size);
    let mut contacts = Contacts::default();

    if body.position.x < 0.0 {
        body.position.x = 0.0;
        body.velocity.x = -body.velocity.x * config.bounce;
        contacts.left = true;
    } else if body.position.x > max.x {
        body.position.x = max.x;
        body.velocity.x = -body.velocity.x * config.bounce;
        contacts.right = true;
    }

    if body.position.y < 0.0 {
        body.position.y = 0.0;
        body.velocity.y = -body.velocity.y * config.bounce;
        contacts.top = true;
    } else if body.position.y > max.y {
        body.position.y = max.y;
        body.velocity.y = -body.velocity.y * config.bounce;
        // a rebound gravity can cancel within a frame would only jitter
        if body.velocity.y.abs() < config.rest_speed + config.gravity {
            body.velocity.y = 0.0;
        }
    }

    if body.position.y >= max.y {
        contacts.floor = true;
        body.velocity.x *= config.floor_friction;
    }

    contacts
}
