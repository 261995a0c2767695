use driftnote_core::{
    DrawList, DrawOp, Motion, ParticleField, Point, Rgba, Theme, PARTICLE_COUNT, TRAIL_LENGTH,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn field(width: f64, height: f64, count: usize) -> ParticleField {
    ParticleField::with_rng(width, height, count, StdRng::seed_from_u64(7))
}

#[test]
fn default_field_spawns_full_population_inside_canvas() {
    let field = ParticleField::new(800.0, 600.0);
    assert_eq!(field.particles().len(), PARTICLE_COUNT);
    for particle in field.particles() {
        assert!((0.0..800.0).contains(&particle.position.x));
        assert!((0.0..600.0).contains(&particle.position.y));
        assert!((1.0..4.0).contains(&particle.radius));
        assert!((0.2..0.7).contains(&particle.base_alpha));
        assert!(particle.velocity.x.abs() <= 0.5 && particle.velocity.y.abs() <= 0.5);
        assert_eq!(particle.motion, Motion::FreeRoam);
        assert!(particle.trail.is_empty());
    }
}

#[test]
fn trails_never_exceed_capacity() {
    let mut field = field(400.0, 300.0, 20);
    let centers = [Point::new(200.0, 150.0)];
    for frame in 0..100 {
        let active: &[Point] = if frame % 3 == 0 { &centers } else { &[] };
        field.step(active);
        for particle in field.particles() {
            assert!(particle.trail.len() <= TRAIL_LENGTH);
        }
    }
    assert!(field
        .particles()
        .iter()
        .all(|particle| particle.trail.len() == TRAIL_LENGTH));
}

#[test]
fn nearby_center_captures_particle_into_orbit() {
    let mut field = field(800.0, 600.0, 1);
    let center = field.particles()[0].position;

    field.step(&[center]);

    let particle = &field.particles()[0];
    let Motion::Orbiting {
        center: orbit_center,
        radius,
        ..
    } = particle.motion
    else {
        panic!("particle should orbit, got {:?}", particle.motion);
    };
    assert_eq!(orbit_center, center);
    assert!((30.0..80.0).contains(&radius));
    assert!((particle.position.distance_to(center) - radius).abs() < 1e-9);
}

#[test]
fn orbit_keeps_radius_and_advances_angle() {
    let mut field = field(800.0, 600.0, 1);
    let center = field.particles()[0].position;
    field.step(&[center]);
    let Motion::Orbiting {
        radius: first_radius,
        angle: first_angle,
        ..
    } = field.particles()[0].motion
    else {
        panic!("not orbiting");
    };

    field.step(&[center]);
    let particle = &field.particles()[0];
    let Motion::Orbiting { radius, angle, .. } = particle.motion else {
        panic!("not orbiting");
    };
    assert_eq!(radius, first_radius);
    assert!((angle - first_angle - particle.angular_speed).abs() < 1e-12);
    assert!((0.02..0.04).contains(&particle.angular_speed));
}

#[test]
fn first_center_in_order_wins_over_nearer_one() {
    let mut field = field(800.0, 600.0, 1);
    let at = field.particles()[0].position;
    let far = Point::new(at.x + 100.0, at.y);
    let near = Point::new(at.x + 5.0, at.y);

    field.step(&[far, near]);

    match field.particles()[0].motion {
        Motion::Orbiting { center, .. } => assert_eq!(center, far),
        other => panic!("expected orbit, got {other:?}"),
    }
}

#[test]
fn distant_centers_do_not_capture() {
    let mut field = field(800.0, 600.0, 1);
    let at = field.particles()[0].position;

    field.step(&[Point::new(at.x + 500.0, at.y + 500.0)]);

    assert_eq!(field.particles()[0].motion, Motion::FreeRoam);
}

#[test]
fn release_returns_to_free_roaming_by_velocity() {
    let mut field = field(800.0, 600.0, 1);
    let center = field.particles()[0].position;
    field.step(&[center]);
    let before = field.particles()[0].clone();

    field.step(&[]);

    let after = &field.particles()[0];
    assert_eq!(after.motion, Motion::FreeRoam);
    assert!((after.position.x - (before.position.x + before.velocity.x)).abs() < 1e-12);
    assert!((after.position.y - (before.position.y + before.velocity.y)).abs() < 1e-12);
}

#[test]
fn free_particles_bounce_inside_tiny_canvas() {
    let mut field = field(1.0, 1.0, 30);
    for _ in 0..500 {
        field.step(&[]);
        for particle in field.particles() {
            assert!((-0.5..=1.5).contains(&particle.position.x));
            assert!((-0.5..=1.5).contains(&particle.position.y));
        }
    }
}

#[test]
fn disabled_frame_draws_and_moves_nothing() {
    let mut field = field(800.0, 600.0, 10);
    let before: Vec<Point> = field.particles().iter().map(|p| p.position).collect();
    let mut canvas = DrawList::new();

    assert!(!field.frame(&[], Theme::Dark, false, &mut canvas));

    assert!(canvas.is_empty());
    let after: Vec<Point> = field.particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
}

#[test]
fn frame_paints_background_then_trail_discs() {
    let mut field = field(800.0, 600.0, 4);
    let mut canvas = DrawList::new();

    assert!(field.frame(&[], Theme::Dark, true, &mut canvas));

    let ops = canvas.ops();
    assert_eq!(ops.len(), 1 + 4);
    assert_eq!(ops[0], DrawOp::Background(Rgba::new(18, 18, 18, 0.2)));
    for (op, particle) in ops[1..].iter().zip(field.particles()) {
        let DrawOp::Disc {
            center,
            radius,
            color,
        } = *op
        else {
            panic!("expected disc, got {op:?}");
        };
        assert_eq!(center, particle.position);
        assert!((radius - particle.radius * 0.3).abs() < 1e-12);
        assert_eq!((color.r, color.g, color.b), (255, 255, 255));
        assert!((color.a - particle.base_alpha).abs() < 1e-12);
    }
}

#[test]
fn light_theme_uses_light_palette() {
    let mut field = field(800.0, 600.0, 1);
    let mut canvas = DrawList::new();
    field.frame(&[], Theme::Light, true, &mut canvas);

    let ops = canvas.into_ops();
    assert_eq!(ops[0], DrawOp::Background(Rgba::new(248, 249, 250, 0.2)));
    match ops[1] {
        DrawOp::Disc { color, .. } => assert_eq!((color.r, color.g, color.b), (50, 50, 50)),
        other => panic!("expected disc, got {other:?}"),
    }
}

#[test]
fn orbiting_trail_draws_at_full_intensity_and_grows_toward_head() {
    let mut field = field(800.0, 600.0, 1);
    let center = field.particles()[0].position;
    for _ in 0..TRAIL_LENGTH {
        field.step(&[center]);
    }
    let mut canvas = DrawList::new();
    field.draw(&mut canvas, Theme::Dark);

    let radius = field.particles()[0].radius;
    let discs: Vec<(f64, f64)> = canvas
        .ops()
        .iter()
        .filter_map(|op| match *op {
            DrawOp::Disc { radius, color, .. } => Some((radius, color.a)),
            DrawOp::Background(_) => None,
        })
        .collect();
    assert_eq!(discs.len(), TRAIL_LENGTH);

    let (head_radius, head_alpha) = discs[TRAIL_LENGTH - 1];
    assert!((head_alpha - 1.0).abs() < 1e-12);
    let expected = radius * ((TRAIL_LENGTH - 1) as f64 / TRAIL_LENGTH as f64 + 0.3);
    assert!((head_radius - expected).abs() < 1e-12);

    let (tail_radius, tail_alpha) = discs[0];
    assert!((tail_alpha - 1.0 / TRAIL_LENGTH as f64).abs() < 1e-12);
    assert!((tail_radius - radius * 0.3).abs() < 1e-12);
}

#[test]
fn resize_respawns_particles_with_empty_trails() {
    let mut field = field(800.0, 600.0, 12);
    for _ in 0..5 {
        field.step(&[]);
    }

    field.resize(100.0, 50.0);

    assert_eq!(field.size(), (100.0, 50.0));
    assert_eq!(field.particles().len(), 12);
    for particle in field.particles() {
        assert!(particle.trail.is_empty());
        assert_eq!(particle.motion, Motion::FreeRoam);
        assert!((0.0..100.0).contains(&particle.position.x));
        assert!((0.0..50.0).contains(&particle.position.y));
    }
}
