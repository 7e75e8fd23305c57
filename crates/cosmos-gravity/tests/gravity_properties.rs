use cosmos_config::Config;
use cosmos_gravity::{
    Body, Capabilities, GravityField, OrbitPreview, Scenario, Simulation, TrailStatus, integrator,
    pairwise_acceleration,
};
use cosmos_math::{EARTH_MASS_KG, EARTH_RADIUS_M, circular_orbit_speed};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn earth() -> Body {
    Body::new("earth", DVec3::ZERO, DVec3::ZERO, EARTH_MASS_KG)
        .with_capabilities(Capabilities::massive())
        .with_radius(EARTH_RADIUS_M)
}

#[test]
fn test_force_positive_and_monotonic_for_random_pairs() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x2545_f491);
    for _ in 0..200 {
        let mass = rng.random_range(1.0..1e25);
        let direction = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(DVec3::X);
        let near = rng.random_range(1.0..1e7);
        let far = near * rng.random_range(1.001..2.0);

        let (a_near, _) = pairwise_acceleration(DVec3::ZERO, mass, direction * near).unwrap();
        let (a_far, _) = pairwise_acceleration(DVec3::ZERO, mass, direction * far).unwrap();
        assert!(a_near > 0.0 && a_far > 0.0);
        assert!(a_far < a_near);
    }
}

#[test]
fn test_self_pair_equals_sum_of_others() {
    let mut field = GravityField::new();
    let ids: Vec<_> = [
        (DVec3::ZERO, 5e24),
        (DVec3::new(4e8, 0.0, 0.0), 7e22),
        (DVec3::new(0.0, -2e8, 1e8), 3e23),
        (DVec3::new(1e7, 1e7, 1e7), 1e20),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (p, m))| {
        field
            .spawn(
                Body::new(format!("b{i}"), p, DVec3::ZERO, m)
                    .with_capabilities(Capabilities::massive()),
            )
            .unwrap()
    })
    .collect();

    for &me in &ids {
        let point = field.get(me).unwrap().position;
        let mut expected = DVec3::ZERO;
        for &other in &ids {
            if other == me {
                continue;
            }
            let (m, d) = field.acceleration_from(other, point).unwrap().unwrap();
            expected += d * m;
        }
        let actual = field.acceleration_at(point, Some(me));
        assert!((actual - expected).length() <= 1e-12 * expected.length());
    }
}

#[test]
fn test_preview_leaves_live_state_untouched() {
    let config = Config::default();
    let scenario = Scenario::build(&config).unwrap();
    let before: Vec<_> = scenario
        .field
        .all()
        .map(|(_, b)| (b.position, b.velocity))
        .collect();

    let result = OrbitPreview {
        steps: 300,
        time_step: 30.0,
        ..Default::default()
    }
    .simulate(&scenario.field);
    assert!(result.steps_run > 0);

    let after: Vec<_> = scenario
        .field
        .all()
        .map(|(_, b)| (b.position, b.velocity))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_circular_orbit_closes_before_step_limit() {
    let radius = 7.0e6;
    let speed = circular_orbit_speed(EARTH_MASS_KG, radius);
    let mut field = GravityField::new();
    field
        .spawn(earth().with_capabilities(Capabilities::anchor()))
        .unwrap();
    let sat = field
        .spawn(Body::new(
            "sat",
            DVec3::new(radius, 0.0, 0.0),
            DVec3::new(0.0, 0.0, speed),
            1.0,
        ))
        .unwrap();

    let period = std::f64::consts::TAU * radius / speed;
    let steps = (period / 10.0).ceil() as u32 + 100;
    let result = OrbitPreview {
        steps,
        time_step: 10.0,
        closure_radius: 2e5,
        min_closure_steps: 10,
        reference: None,
    }
    .simulate(&field);

    let status = result.trail(sat).unwrap().status;
    assert!(
        matches!(status, TrailStatus::Closed { step } if step < steps),
        "unexpected status {status:?}"
    );
}

#[test]
fn test_low_orbit_single_step_within_ten_meters() {
    let mut field = GravityField::new();
    field.spawn(earth()).unwrap();
    let speed = circular_orbit_speed(EARTH_MASS_KG, EARTH_RADIUS_M);
    let sat = field
        .spawn(Body::new(
            "sat",
            DVec3::new(EARTH_RADIUS_M, 0.0, 0.0),
            DVec3::new(0.0, speed, 0.0),
            1.0,
        ))
        .unwrap();

    integrator::step(&mut field, 1.0);

    let position = field.get(sat).unwrap().position;
    assert!((position.length() - EARTH_RADIUS_M).abs() < 10.0);
}

#[test]
fn test_default_scenario_runs_through_schedule() {
    let config = Config::default();
    let mut world = Scenario::build(&config)
        .unwrap()
        .into_world(&config)
        .unwrap();
    let mut sim = Simulation::new();
    for _ in 0..120 {
        sim.tick(&mut world).unwrap();
    }

    let field = world.resource::<GravityField>();
    let probe = field.find_by_name("probe").unwrap();
    let terra = field.find_by_name("terra").unwrap();
    let distance = field
        .get(probe)
        .unwrap()
        .position
        .distance(field.get(terra).unwrap().position);
    // Two seconds of a 7,000 km orbit barely changes the altitude.
    assert!((distance - 7.0e6).abs() < 100.0);
    assert_eq!(field.strongest_emitter(probe), Some(terra));
}
