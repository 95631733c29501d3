//! Toy Physics for the Browser-Style Widgets
//!
//! A small discrete-time 2D physics core shared by two interactive widgets:
//!
//! - **Bouncing Mascot**: a single body you can drag around or click to kick
//! - **Physics Playground**: spinning shapes you can throw, spawn with a
//!   double-click and remove with a right-click
//!
//! Everything runs in window pixel space with `y` pointing down. The
//! [`Simulation`] advances once per redraw; pointer handlers mutate it
//! between frames.

pub mod body;
pub mod boundary;
pub mod config;
pub mod integrator;
pub mod input;
pub mod simulation;
pub mod renderer;
pub mod equations_ui;

pub use body::{Body, BodyId, BodyMode, BodySnapshot, Spin};
pub use boundary::{Contacts, Viewport};
pub use config::{ConfigError, PhysicsConfig, SizeRange};
pub use input::{DoubleClickDetector, DragSession, KickImpulse, Release};
pub use simulation::{Gesture, Simulation, Variant};
