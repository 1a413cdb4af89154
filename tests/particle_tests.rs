// Host-side tests for the ambient particle field.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod color {
    include!("../src/core/color.rs");
}
mod particles {
    include!("../src/core/particles.rs");
}

use color::Rgb;
use glam::Vec2;
use particles::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct Recorder {
    clears: usize,
    circles: Vec<(Vec2, f32, Rgb, f32)>,
    lines: Vec<(Vec2, Vec2, f32, f32)>,
}

impl ParticleSurface for Recorder {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.circles.push((center, radius, color, alpha));
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, alpha: f32, width: f32) {
        self.lines.push((a, b, alpha, width));
    }
}

fn still(x: f32, y: f32) -> Particle {
    Particle {
        pos: Vec2::new(x, y),
        vel: Vec2::ZERO,
        radius: 1.0,
        color: Rgb::WHITE,
        alpha: 1.0,
        anchor: None,
    }
}

fn assert_inside(field: &ParticleField, vp: Viewport) {
    for p in field.particles() {
        assert!(
            p.pos.x >= 0.0 && p.pos.x < vp.width && p.pos.y >= 0.0 && p.pos.y < vp.height,
            "particle escaped: {:?} in {:?}",
            p.pos,
            vp
        );
    }
}

#[test]
fn mobile_scenario_allocates_exact_count_and_radius_range() {
    let config = ParticleFieldConfig {
        count: 100,
        ..ParticleFieldConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let field = ParticleField::new(config, Viewport::new(375.0, 667.0), &mut rng);
    assert_eq!(field.len(), 100);
    for p in field.particles() {
        assert!(p.radius >= 1.0 && p.radius <= 3.0, "radius {}", p.radius);
        assert!(p.vel.x.abs() <= 0.06 && p.vel.y.abs() <= 0.06);
        assert!(p.alpha >= 0.3 && p.alpha <= 0.8);
    }
    assert_inside(&field, Viewport::new(375.0, 667.0));
}

#[test]
fn opaque_particles_when_alpha_blend_off() {
    let config = ParticleFieldConfig {
        count: 20,
        alpha_blend: false,
        ..ParticleFieldConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let field = ParticleField::new(config, Viewport::new(800.0, 600.0), &mut rng);
    assert!(field.particles().iter().all(|p| p.alpha == 1.0));
}

#[test]
fn colors_come_from_palette() {
    let red = Rgb::new(255, 0, 0);
    let blue = Rgb::new(0, 0, 255);
    let config = ParticleFieldConfig {
        count: 64,
        colors: vec![red, blue],
        ..ParticleFieldConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let field = ParticleField::new(config, Viewport::new(800.0, 600.0), &mut rng);
    assert!(field.particles().iter().all(|p| p.color == red || p.color == blue));
    assert!(field.particles().iter().any(|p| p.color == red));
    assert!(field.particles().iter().any(|p| p.color == blue));

    let config = ParticleFieldConfig {
        count: 4,
        colors: vec![],
        ..ParticleFieldConfig::default()
    };
    let field = ParticleField::new(config, Viewport::new(800.0, 600.0), &mut rng);
    assert!(field.particles().iter().all(|p| p.color == Rgb::WHITE));
}

#[test]
fn device_tiers_follow_viewport_width() {
    assert_eq!(DeviceTier::for_width(375.0), DeviceTier::Mobile);
    assert_eq!(DeviceTier::for_width(768.0), DeviceTier::Mobile);
    assert_eq!(DeviceTier::for_width(1024.0), DeviceTier::Tablet);
    assert_eq!(DeviceTier::for_width(1200.0), DeviceTier::Tablet);
    assert_eq!(DeviceTier::for_width(1920.0), DeviceTier::Desktop);
    assert_eq!(DeviceTier::Mobile.particle_count(), 100);
    assert_eq!(DeviceTier::Tablet.particle_count(), 150);
    assert_eq!(DeviceTier::Desktop.particle_count(), 200);
}

#[test]
fn reinitialize_replaces_rather_than_accumulates() {
    let config = ParticleFieldConfig {
        adaptive_count: true,
        ..ParticleFieldConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let mut field = ParticleField::new(config, Viewport::new(1920.0, 1080.0), &mut rng);
    assert_eq!(field.len(), 200);

    let sizes = [(375.0, 667.0), (1024.0, 768.0), (1920.0, 1080.0), (375.0, 667.0)];
    for (w, h) in sizes {
        field.reinitialize(Viewport::new(w, h), &mut rng);
        let expected = DeviceTier::for_width(w).particle_count();
        assert_eq!(field.len(), expected);
        assert_inside(&field, Viewport::new(w, h));
    }
}

#[test]
fn same_size_reinitialize_keeps_count_but_reshuffles() {
    let mut rng = StdRng::seed_from_u64(10);
    let vp = Viewport::new(800.0, 600.0);
    let mut field = ParticleField::new(ParticleFieldConfig::default(), vp, &mut rng);
    let before: Vec<Vec2> = field.particles().iter().map(|p| p.pos).collect();
    field.reinitialize(vp, &mut rng);
    assert_eq!(field.len(), before.len());
    assert!(field
        .particles()
        .iter()
        .zip(&before)
        .any(|(p, old)| p.pos != *old));
}

#[test]
fn empty_viewport_has_no_particles() {
    let mut rng = StdRng::seed_from_u64(2);
    let field = ParticleField::new(ParticleFieldConfig::default(), Viewport::new(0.0, 600.0), &mut rng);
    assert!(field.is_empty());
}

#[test]
fn wrap_axis_is_toroidal() {
    assert_eq!(wrap_axis(5.0, 100.0), 5.0);
    assert_eq!(wrap_axis(100.0, 100.0), 0.0);
    assert_eq!(wrap_axis(130.0, 100.0), 0.0);
    assert_eq!(wrap_axis(-1.0, 100.0), 99.0);
    assert_eq!(wrap_axis(-250.0, 100.0), 50.0);
    assert_eq!(wrap_axis(f32::NAN, 100.0), 0.0);
    assert_eq!(wrap_axis(10.0, 0.0), 0.0);
    let tiny = wrap_axis(-1e-9, 100.0);
    assert!((0.0..100.0).contains(&tiny));
}

#[test]
fn repulsion_matches_linear_falloff() {
    let push = repulsion(Vec2::ZERO, Vec2::new(50.0, 0.0), 100.0, 2.0).unwrap();
    assert!((push.length() - 1.0).abs() < 1e-6);
    assert!(push.x > 0.0 && push.y.abs() < 1e-6, "push points away from pointer");

    let push = repulsion(Vec2::new(10.0, 10.0), Vec2::new(10.0, 40.0), 100.0, 1.0).unwrap();
    assert!((push - Vec2::new(0.0, 0.7)).length() < 1e-6);

    assert!(repulsion(Vec2::ZERO, Vec2::new(100.0, 0.0), 100.0, 2.0).is_none());
    assert!(repulsion(Vec2::ZERO, Vec2::new(0.0, 150.0), 100.0, 2.0).is_none());

    let push = repulsion(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 100.0, 2.0).unwrap();
    assert_eq!(push, Vec2::new(-2.0, 0.0));
}

#[test]
fn drift_nudges_particle_directly() {
    let mut field = ParticleField::with_particles(
        ParticleFieldConfig::default(),
        Viewport::new(800.0, 600.0),
        vec![still(150.0, 100.0), still(600.0, 500.0)],
    );
    field.step(&PointerState::at(100.0, 100.0));
    let near = field.particles()[0].pos;
    let far = field.particles()[1].pos;
    assert!((near - Vec2::new(151.0, 100.0)).length() < 1e-5, "{near:?}");
    assert_eq!(far, Vec2::new(600.0, 500.0));
}

#[test]
fn inactive_pointer_does_not_repel() {
    let mut field = ParticleField::with_particles(
        ParticleFieldConfig::default(),
        Viewport::new(800.0, 600.0),
        vec![still(150.0, 100.0)],
    );
    let pointer = PointerState {
        active: false,
        ..PointerState::at(100.0, 100.0)
    };
    field.step(&pointer);
    assert_eq!(field.particles()[0].pos, Vec2::new(150.0, 100.0));
}

#[test]
fn constellation_eases_away_from_pointer() {
    let config = ParticleFieldConfig {
        variant: FieldVariant::Constellation,
        ..ParticleFieldConfig::default()
    };
    let mut field =
        ParticleField::with_particles(config, Viewport::new(800.0, 600.0), vec![still(150.0, 100.0)]);
    field.step(&PointerState::at(100.0, 100.0));
    // force (200 - 50) / 200 * 2 = 1.5, eased by 5 * 10%
    let p = &field.particles()[0];
    assert!((p.pos.x - 150.75).abs() < 1e-4, "{:?}", p.pos);
    assert!(p.anchor.is_some());
}

#[test]
fn constellation_returns_to_undisturbed_path() {
    let config = ParticleFieldConfig {
        variant: FieldVariant::Constellation,
        ..ParticleFieldConfig::default()
    };
    let mut p = still(100.0, 300.0);
    p.vel = Vec2::new(0.5, 0.0);
    let mut field = ParticleField::with_particles(config, Viewport::new(4000.0, 600.0), vec![p]);

    let pointer = PointerState::at(100.0, 290.0);
    for _ in 0..20 {
        field.step(&pointer);
    }
    let steps_so_far = 20.0;
    let displaced = field.particles()[0].pos;
    let path = Vec2::new(100.0 + 0.5 * steps_so_far, 300.0);
    assert!(displaced.distance(path) > 5.0, "pointer should push it off course");

    let idle = PointerState::default();
    let total = 20 + 1000;
    for _ in 0..1000 {
        field.step(&idle);
    }
    let settled = &field.particles()[0];
    let path = Vec2::new(100.0 + 0.5 * total as f32, 300.0);
    assert!(settled.anchor.is_none());
    assert!(settled.pos.distance(path) < 1.0, "{:?} vs {:?}", settled.pos, path);
}

#[test]
fn wrap_invariant_holds_under_pointer_pressure() {
    for variant in [FieldVariant::Drift, FieldVariant::Constellation] {
        let config = ParticleFieldConfig {
            count: 120,
            speed: 6.0,
            hover_factor: 40.0,
            variant,
            ..ParticleFieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(77);
        let vp = Viewport::new(320.0, 240.0);
        let mut field = ParticleField::new(config, vp, &mut rng);
        for step in 0..1500 {
            let t = step as f32 * 0.05;
            let pointer = PointerState {
                pos: Vec2::new(160.0 + 150.0 * t.cos(), 120.0 + 110.0 * t.sin()),
                active: step % 300 < 200,
            };
            field.step(&pointer);
            assert_inside(&field, vp);
        }
    }
}

#[test]
fn links_fade_with_distance() {
    let config = ParticleFieldConfig {
        variant: FieldVariant::Constellation,
        ..ParticleFieldConfig::default()
    };
    let field = ParticleField::with_particles(
        config,
        Viewport::new(800.0, 600.0),
        vec![still(100.0, 100.0), still(150.0, 100.0), still(400.0, 400.0)],
    );
    let links: Vec<Link> = field.links().collect();
    assert_eq!(links.len(), 1);
    assert!((links[0].alpha - 0.05).abs() < 1e-6);
    assert_eq!(links[0].a, Vec2::new(100.0, 100.0));
    assert_eq!(links[0].b, Vec2::new(150.0, 100.0));
}

#[test]
fn render_draws_circles_and_only_constellation_links() {
    let dots = vec![still(100.0, 100.0), still(150.0, 100.0)];

    let mut rec = Recorder::default();
    ParticleField::with_particles(ParticleFieldConfig::default(), Viewport::new(800.0, 600.0), dots.clone())
        .render(&mut rec);
    assert_eq!(rec.clears, 1);
    assert_eq!(rec.circles.len(), 2);
    assert!(rec.lines.is_empty());

    let config = ParticleFieldConfig {
        variant: FieldVariant::Constellation,
        ..ParticleFieldConfig::default()
    };
    let mut rec = Recorder::default();
    ParticleField::with_particles(config.clone(), Viewport::new(800.0, 600.0), dots.clone()).render(&mut rec);
    assert_eq!(rec.circles.len(), 2);
    assert_eq!(rec.lines.len(), 1);
    assert_eq!(rec.lines[0].3, 0.5);

    let opaque = ParticleFieldConfig {
        alpha_blend: false,
        ..config
    };
    let mut rec = Recorder::default();
    ParticleField::with_particles(opaque, Viewport::new(800.0, 600.0), dots).render(&mut rec);
    assert!(rec.lines.is_empty());
}

#[test]
fn variant_names_parse() {
    assert_eq!(FieldVariant::parse("Drift"), Some(FieldVariant::Drift));
    assert_eq!(FieldVariant::parse(" constellation "), Some(FieldVariant::Constellation));
    assert_eq!(FieldVariant::parse("swarm"), None);
}
