//! Pointer gestures: drag sessions, kicks and double-click detection

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::Rng;

use crate::body::{Body, BodyId};

/// Velocity handed to a body by a click.
///
/// The deterministic push away from the click point and the random
/// liveliness term are kept apart so each can be checked on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickImpulse {
    pub direction: Vec2,
    pub jitter: Vec2,
}

impl KickImpulse {
    pub fn new(body: &Body, click: Vec2, strength: f32, jitter: Vec2) -> Self {
        Self {
            direction: kick_direction(body, click, strength),
            jitter,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction + self.jitter
    }
}

/// Push from the click point through the body's center, measured in
/// half-extents so a click on the edge gives `strength` on that axis.
///
/// A click dead on the center has no direction and yields zero.
pub fn kick_direction(body: &Body, click: Vec2, strength: f32) -> Vec2 {
    let offset = body.center() - click;
    let half = body.size * 0.5;
    if offset.length_squared() <= f32::EPSILON || half.x <= 0.0 || half.y <= 0.0 {
        return Vec2::ZERO;
    }
    offset / half * strength
}

/// Uniform jitter in `[-amplitude, amplitude]` on each axis
pub fn sample_jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> Vec2 {
    if amplitude <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.gen_range(-amplitude..=amplitude),
        rng.gen_range(-amplitude..=amplitude),
    )
}

/// How a drag session ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// The pointer barely moved: treat it as a click at this point
    Click(Vec2),
    /// A real drag; carries the pointer displacement over the last frame
    Throw(Vec2),
}

/// Pointer bookkeeping for one press-drag-release on a body.
///
/// The session lives from pointer-down to pointer-up no matter where the
/// pointer travels, so a release outside the body still ends the drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub body: BodyId,
    press: Vec2,
    pointer: Vec2,
    /// Pointer position when the last frame ran
    frame_anchor: Vec2,
    /// Displacement the pointer made during the last frame
    frame_delta: Vec2,
    /// Farthest distance from the press point
    travel: f32,
}

impl DragSession {
    pub fn begin(body: BodyId, press: Vec2) -> Self {
        Self {
            body,
            press,
            pointer: press,
            frame_anchor: press,
            frame_delta: Vec2::ZERO,
            travel: 0.0,
        }
    }

    pub fn move_to(&mut self, point: Vec2) {
        self.pointer = point;
        self.travel = self.travel.max(point.distance(self.press));
    }

    /// Sample pointer motion once per animation frame
    pub fn on_frame(&mut self) {
        self.frame_delta = self.pointer - self.frame_anchor;
        self.frame_anchor = self.pointer;
    }

    /// Finish the gesture at `point`
    pub fn release(mut self, point: Vec2, click_slop: f32) -> Release {
        self.move_to(point);
        if self.travel <= click_slop {
            return Release::Click(point);
        }
        // a release mid-frame only sees part of a frame's motion
        let pending = self.pointer - self.frame_anchor;
        if pending.length_squared() > self.frame_delta.length_squared() {
            Release::Throw(pending)
        } else {
            Release::Throw(self.frame_delta)
        }
    }
}

/// Turns single presses into double-clicks.
///
/// The windowing layer only reports individual button presses, so two
/// presses close in time and space are folded into one gesture here.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    pub max_interval: Duration,
    pub max_distance: f32,
    last_press: Option<(Instant, Vec2)>,
}

impl DoubleClickDetector {
    pub fn new(max_interval: Duration, max_distance: f32) -> Self {
        Self {
            max_interval,
            max_distance,
            last_press: None,
        }
    }

    /// Record a press; returns true when it completes a double-click
    pub fn press(&mut self, at: Instant, point: Vec2) -> bool {
        if let Some((when, place)) = self.last_press.take() {
            let quick = at.saturating_duration_since(when) <= self.max_interval;
            if quick && point.distance(place) <= self.max_distance {
                return true;
            }
        }
        self.last_press = Some((at, point));
        false
    }
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(400), 6.0)
    }
}
