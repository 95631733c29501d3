//! Equations sidebar UI with live tuning of the physics constants

use egui::{Color32, Context, RichText, Slider};

use crate::config::PhysicsConfig;

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar. When `config` is given, sliders for the
/// main constants are shown too; returns true if any slider moved.
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
    config: Option<&mut PhysicsConfig>,
) -> bool {
    let mut changed = false;

    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });

                if let Some(config) = config {
                    ui.add_space(8.0);
                    ui.collapsing(RichText::new("🎛 Tunables").strong(), |ui| {
                        changed |= ui.add(Slider::new(&mut config.gravity, 0.0..=3.0).text("g")).changed();
                        changed |= ui.add(Slider::new(&mut config.friction, 0.9..=1.0).text("f")).changed();
                        changed |= ui.add(Slider::new(&mut config.bounce, 0.0..=0.95).text("e")).changed();
                        changed |= ui
                            .add(Slider::new(&mut config.kick_strength, 0.0..=40.0).text("k"))
                            .changed();
                    });
                }
            });
        });

    changed
}

// ============================================================================
// Toy Integrator Equations
// ============================================================================

pub const TOY_PHYSICS_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Gravity",
        formula: "vᵧ ← vᵧ + g",
        description: "Constant downward pull, applied once per frame",
    },
    Equation {
        name: "Friction Decay",
        formula: "v⃗ ← f·v⃗",
        description: "Exponential slowdown: after n frames v = fⁿ·v₀",
    },
    Equation {
        name: "Euler Step",
        formula: "x⃗ ← x⃗ + v⃗",
        description: "Position follows velocity, one frame at a time",
    },
    Equation {
        name: "Restitution",
        formula: "v ← -e·v",
        description: "Each bounce keeps only a fraction e of the speed",
    },
    Equation {
        name: "Bounce Height",
        formula: "hₙ ≈ e²ⁿ·h₀",
        description: "Rebound height shrinks geometrically",
    },
    Equation {
        name: "Kick",
        formula: "v⃗ = k·(c⃗ - p⃗)/(s⃗/2) + ξ⃗",
        description: "Push away from the click, plus a small random jitter",
    },
];

pub const TOY_PHYSICS_VARIABLES: &[(&str, &str)] = &[
    ("g", "Gravity (px/frame²)"),
    ("f", "Friction factor per frame"),
    ("e", "Restitution (bounce)"),
    ("x⃗, v⃗", "Position and velocity"),
    ("k", "Kick strength"),
    ("c⃗", "Body center"),
    ("p⃗", "Click point"),
    ("s⃗", "Body size"),
    ("ξ⃗", "Random jitter"),
];
