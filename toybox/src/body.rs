//! Bodies and the snapshots handed to the renderer

use glam::Vec2;

/// Area of a body with unit mass, in square pixels
pub const REFERENCE_AREA: f32 = 50.0 * 50.0;

/// Stable handle for a body within one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Who drives the body's motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyMode {
    /// The integrator owns position and velocity
    Dynamic,
    /// The pointer owns position; velocity is pinned to zero
    Dragged {
        /// Pointer position minus the body's top-left corner at grab time
        grab_offset: Vec2,
        /// Latest pointer sample
        pointer: Vec2,
    },
}

/// Cosmetic rotation, independent of translation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spin {
    pub angle: f32,
    pub speed: f32,
}

/// A single simulated 2D object. `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub mode: BodyMode,
    pub spin: Option<Spin>,
    /// Frames left on the "kicked" flag
    pub kicked_frames: u32,
    pub color: [f32; 4],
}

impl Body {
    pub fn new(id: BodyId, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            size,
            mode: BodyMode::Dynamic,
            spin: None,
            kicked_frames: 0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_spin(mut self, speed: f32) -> Self {
        self.spin = Some(Spin { angle: 0.0, speed });
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Mass relative to a body of [`REFERENCE_AREA`]
    pub fn mass(&self) -> f32 {
        (self.size.x * self.size.y) / REFERENCE_AREA
    }

    pub fn is_dragged(&self) -> bool {
        matches!(self.mode, BodyMode::Dragged { .. })
    }

    pub fn is_kicked(&self) -> bool {
        self.kicked_frames > 0
    }

    /// Axis-aligned hit test against the unrotated bounding box
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.position + self.size;
        point.x >= self.position.x && point.x <= max.x && point.y >= self.position.y && point.y <= max.y
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            position: self.position,
            size: self.size,
            angle: self.spin.map_or(0.0, |spin| spin.angle),
            dragged: self.is_dragged(),
            kicked: self.is_kicked(),
            color: self.color,
        }
    }
}

/// Plain data a presentation layer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vec2,
    pub size: Vec2,
    pub angle: f32,
    pub dragged: bool,
    pub kicked: bool,
    pub color: [f32; 4],
}
