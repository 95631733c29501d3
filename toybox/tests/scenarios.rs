use glam::Vec2;
use toybox::{Body, BodyId, Gesture, PhysicsConfig, Simulation, Variant, Viewport};

/// Mascot-style simulation holding one body, with a fixed seed
fn single_body(config: PhysicsConfig, viewport: Viewport, position: Vec2, size: f32) -> (Simulation, BodyId) {
    let mut sim = Simulation::new(Variant::Mascot, config, viewport).with_seed(11);
    let id = sim.insert(Body::new(BodyId(0), position, Vec2::splat(size)));
    sim.start();
    (sim, id)
}

fn drop_test_config() -> PhysicsConfig {
    let mut config = PhysicsConfig::mascot();
    config.gravity = 0.8;
    config.friction = 0.98;
    config.bounce = 0.7;
    config
}

fn assert_contained(sim: &Simulation) {
    let viewport = sim.viewport();
    for body in sim.bodies() {
        let max = viewport.max_position(body.size);
        assert!(body.position.is_finite(), "{:?} has a non-finite position", body.id);
        assert!(
            body.position.x >= 0.0 && body.position.x <= max.x && body.position.y >= 0.0 && body.position.y <= max.y,
            "{:?} escaped to {:?} (max {:?})",
            body.id,
            body.position,
            max
        );
    }
}

// ==================================================================================
// Integrator and boundary scenarios
// ==================================================================================

#[test]
fn dropped_body_settles_on_the_floor() {
    let (mut sim, id) = single_body(drop_test_config(), Viewport::new(800.0, 500.0), Vec2::ZERO, 60.0);

    let mut settled_at = None;
    for frame in 0..500 {
        sim.step();
        let body = sim.body(id).unwrap();
        if (body.position.y - 440.0).abs() < 1e-3 && body.velocity.length() < 0.01 {
            settled_at = Some(frame);
            break;
        }
    }

    assert!(settled_at.is_some(), "body never came to rest: {:?}", sim.body(id));

    // and stays there
    for _ in 0..50 {
        sim.step();
    }
    let body = sim.body(id).unwrap();
    assert_eq!(body.position.y, 440.0);
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[test]
fn bounces_never_gain_speed() {
    let mut config = drop_test_config();
    config.gravity = 0.0;
    config.friction = 1.0;
    let (mut sim, id) = single_body(config, Viewport::new(400.0, 300.0), Vec2::new(100.0, 100.0), 40.0);
    sim.kick(id, Vec2::new(101.0, 103.0)).unwrap();

    let mut speed = sim.body(id).unwrap().velocity.length();
    let mut bounces = 0;
    for _ in 0..400 {
        sim.step();
        let body = sim.body(id).unwrap();
        let now = body.velocity.length();
        assert!(now <= speed + 1e-4, "speed rose from {} to {}", speed, now);
        if now < speed - 1e-4 {
            bounces += 1;
        }
        speed = now;
    }
    assert!(bounces > 0);
}

#[test]
fn every_body_stays_inside_the_viewport() {
    let mut config = PhysicsConfig::playground();
    config.spawn_speed = 40.0;
    let mut sim = Simulation::playground(config, Viewport::new(640.0, 480.0), 25, Some(3));

    for frame in 0..600 {
        if frame % 50 == 0 {
            let id = sim.bodies()[frame % sim.len()].id;
            let center = sim.body(id).unwrap().center();
            sim.kick(id, center + Vec2::new(3.0, 7.0));
        }
        sim.step();
        assert_contained(&sim);
    }
}

#[test]
fn shrinking_the_viewport_pulls_bodies_back() {
    let mut sim = Simulation::playground(PhysicsConfig::playground(), Viewport::new(1200.0, 900.0), 10, Some(9));
    for _ in 0..30 {
        sim.step();
    }

    sim.set_viewport(Viewport::new(300.0, 200.0));
    sim.step();
    assert_contained(&sim);
}

#[test]
fn zero_viewport_pins_bodies_at_origin() {
    let (mut sim, id) = single_body(drop_test_config(), Viewport::new(0.0, 0.0), Vec2::new(50.0, 50.0), 60.0);
    for _ in 0..10 {
        sim.step();
    }
    let body = sim.body(id).unwrap();
    assert_eq!(body.position, Vec2::ZERO);
    assert!(body.velocity.is_finite());
}

// ==================================================================================
// Input controller scenarios
// ==================================================================================

#[test]
fn click_kicks_away_from_the_cursor() {
    let mut config = drop_test_config();
    config.kick_jitter = 0.5;
    let (mut sim, id) = single_body(config, Viewport::new(800.0, 600.0), Vec2::new(70.0, 70.0), 60.0);
    assert_eq!(sim.body(id).unwrap().center(), Vec2::new(100.0, 100.0));

    assert_eq!(sim.pointer_down(Vec2::new(70.0, 70.0)), Some(id));
    let gesture = sim.pointer_up(Vec2::new(70.0, 70.0)).unwrap();

    let Gesture::Kick { body, impulse } = gesture else {
        panic!("expected a kick, got {:?}", gesture);
    };
    assert_eq!(body, id);
    assert!(impulse.direction.x > 0.0 && impulse.direction.y > 0.0);
    assert!(impulse.jitter.x.abs() <= 0.5 && impulse.jitter.y.abs() <= 0.5);

    let kicked = sim.body(id).unwrap();
    assert_eq!(kicked.velocity, impulse.velocity());
    assert!(kicked.is_kicked());
}

#[test]
fn kick_on_dead_center_is_jitter_only() {
    let (mut sim, id) = single_body(drop_test_config(), Viewport::new(800.0, 600.0), Vec2::new(70.0, 70.0), 60.0);
    let impulse = sim.kick(id, Vec2::new(100.0, 100.0)).unwrap();

    assert_eq!(impulse.direction, Vec2::ZERO);
    assert!(impulse.velocity().is_finite());
    assert!(impulse.velocity().length() <= sim.config.kick_jitter * 2f32.sqrt() + 1e-5);
}

#[test]
fn dragging_pins_velocity_and_follows_the_pointer() {
    let mut sim = Simulation::new(Variant::Mascot, drop_test_config(), Viewport::new(800.0, 600.0));
    let id = sim.insert(
        Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(60.0)).with_velocity(Vec2::new(6.0, -9.0)),
    );
    sim.start();

    sim.pointer_down(Vec2::new(110.0, 120.0));
    assert_eq!(sim.body(id).unwrap().velocity, Vec2::ZERO);

    for step in 0..20 {
        let pointer = Vec2::new(200.0 + step as f32 * 5.0, 250.0);
        sim.pointer_move(pointer);
        sim.step();
        let body = sim.body(id).unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.position, pointer - Vec2::new(10.0, 20.0));
    }
}

#[test]
fn drag_released_where_it_started_leaves_the_body_still() {
    let mut config = PhysicsConfig::playground();
    config.gravity = 0.0;
    let mut sim = Simulation::new(Variant::Playground, config, Viewport::new(800.0, 600.0)).with_seed(5);
    let id = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));
    sim.start();

    let press = Vec2::new(125.0, 125.0);
    sim.pointer_down(press);
    sim.pointer_move(Vec2::new(300.0, 125.0));
    sim.step();
    sim.pointer_move(press);
    sim.step();
    sim.step();

    let gesture = sim.pointer_up(press).unwrap();
    assert_eq!(gesture, Gesture::Throw { body: id, velocity: Vec2::ZERO });
    assert_eq!(sim.body(id).unwrap().velocity, Vec2::ZERO);
}

#[test]
fn playground_throw_follows_the_last_pointer_motion() {
    let mut sim = Simulation::new(Variant::Playground, PhysicsConfig::playground(), Viewport::new(800.0, 600.0));
    let id = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));
    sim.start();

    sim.pointer_down(Vec2::new(125.0, 125.0));
    sim.pointer_move(Vec2::new(140.0, 125.0));
    sim.step();
    sim.pointer_move(Vec2::new(160.0, 120.0));

    let gesture = sim.pointer_up(Vec2::new(160.0, 120.0)).unwrap();
    assert_eq!(gesture, Gesture::Throw { body: id, velocity: Vec2::new(20.0, -5.0) });
}

#[test]
fn fling_keeps_its_speed_when_released_mid_frame() {
    let mut sim = Simulation::new(Variant::Playground, PhysicsConfig::playground(), Viewport::new(800.0, 600.0));
    let id = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));
    sim.start();

    let mut pointer = Vec2::new(125.0, 125.0);
    sim.pointer_down(pointer);
    for _ in 0..5 {
        pointer.x += 20.0;
        sim.pointer_move(pointer);
        sim.step();
    }
    // one small event slips in between the last frame and the release
    pointer.x += 1.0;
    sim.pointer_move(pointer);

    let gesture = sim.pointer_up(pointer).unwrap();
    assert_eq!(gesture, Gesture::Throw { body: id, velocity: Vec2::new(20.0, 0.0) });
    assert_eq!(sim.body(id).unwrap().velocity, Vec2::new(20.0, 0.0));
}

#[test]
fn mascot_release_after_drag_drops_without_momentum() {
    let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
    let id = sim.bodies()[0].id;
    let grab = sim.bodies()[0].center();

    sim.pointer_down(grab);
    sim.pointer_move(grab + Vec2::new(80.0, -40.0));
    sim.step();
    sim.pointer_move(grab + Vec2::new(120.0, -60.0));

    let gesture = sim.pointer_up(grab + Vec2::new(120.0, -60.0)).unwrap();
    assert_eq!(gesture, Gesture::Throw { body: id, velocity: Vec2::ZERO });
}

#[test]
fn release_outside_the_body_still_ends_the_drag() {
    let mut sim = Simulation::mascot(PhysicsConfig::mascot(), Viewport::new(800.0, 600.0));
    let grab = sim.bodies()[0].center();
    sim.pointer_down(grab);
    sim.pointer_move(Vec2::new(5.0, 5.0));

    assert!(sim.pointer_up(Vec2::new(790.0, 590.0)).is_some());
    assert_eq!(sim.dragged(), None);
    assert!(!sim.bodies()[0].is_dragged());
}

#[test]
fn topmost_body_wins_the_grab() {
    let mut sim = Simulation::new(Variant::Playground, PhysicsConfig::playground(), Viewport::new(800.0, 600.0));
    let bottom = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(60.0)));
    let top = sim.insert(Body::new(BodyId(0), Vec2::new(130.0, 130.0), Vec2::splat(60.0)));
    sim.start();

    assert_eq!(sim.pointer_down(Vec2::new(140.0, 140.0)), Some(top));
    sim.pointer_up(Vec2::new(140.0, 140.0));
    assert_eq!(sim.pointer_down(Vec2::new(110.0, 110.0)), Some(bottom));
}

// ==================================================================================
// Playground spawn / remove
// ==================================================================================

#[test]
fn double_click_on_empty_space_adds_one_body() {
    let mut sim = Simulation::playground(PhysicsConfig::playground(), Viewport::new(800.0, 600.0), 0, Some(1));
    let id = sim.double_click(Vec2::new(400.0, 300.0)).unwrap();

    assert_eq!(sim.len(), 1);
    let body = sim.body(id).unwrap();
    let range = sim.config.size_range;
    assert!(body.size.x >= range.min && body.size.x <= range.max);
    assert!(body.contains(Vec2::new(400.0, 300.0)));
    assert!(body.spin.is_some());
}

#[test]
fn double_click_on_a_body_spawns_nothing() {
    let mut sim = Simulation::playground(PhysicsConfig::playground(), Viewport::new(800.0, 600.0), 0, Some(1));
    sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));

    assert_eq!(sim.double_click(Vec2::new(120.0, 120.0)), None);
    assert_eq!(sim.len(), 1);
}

#[test]
fn right_click_removes_exactly_that_body() {
    let mut sim = Simulation::playground(PhysicsConfig::playground(), Viewport::new(800.0, 600.0), 0, Some(1));
    let keep = sim.insert(Body::new(BodyId(0), Vec2::new(500.0, 100.0), Vec2::splat(50.0)));
    let gone = sim.insert(Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::splat(50.0)));

    assert_eq!(sim.right_click(Vec2::new(125.0, 125.0)), Some(gone));
    assert_eq!(sim.len(), 1);
    assert!(sim.body(gone).is_none());

    for _ in 0..10 {
        sim.step();
        assert!(sim.snapshots().all(|snapshot| snapshot.id == keep));
    }

    // nothing left under the cursor
    assert_eq!(sim.right_click(Vec2::new(125.0, 125.0)), None);
    assert_eq!(sim.len(), 1);
}
