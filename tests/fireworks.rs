use valentine_card::fireworks::{
    CYCLE_S, DISTANCE_SPREAD, MAX_DELAY_S, MIN_DISTANCE, PARTICLE_COUNT, Particle,
    particle_frame, spawn_particles,
};

fn sequence(values: &[f64]) -> impl FnMut() -> f64 {
    let values = values.to_vec();
    let mut i = 0;
    move || {
        let v = values[i % values.len()];
        i += 1;
        v
    }
}

#[test]
fn spawns_twenty_evenly_spaced_particles() {
    let particles = spawn_particles(&mut sequence(&[0.0, 0.5, 0.999, 0.25]));
    assert_eq!(particles.len(), PARTICLE_COUNT);
    assert_eq!(PARTICLE_COUNT, 20);

    for (i, particle) in particles.iter().enumerate() {
        assert!((particle.angle_deg - i as f64 * 18.0).abs() < 1e-9);
        assert!(particle.distance >= MIN_DISTANCE);
        assert!(particle.distance < MIN_DISTANCE + DISTANCE_SPREAD);
        assert!(particle.delay_s >= 0.0 && particle.delay_s < MAX_DELAY_S);
    }
}

#[test]
fn particle_waits_out_its_delay() {
    let particle = Particle {
        angle_deg: 0.0,
        distance: 250.0,
        delay_s: 1.5,
    };
    assert!(particle_frame(&particle, 0.0).is_none());
    assert!(particle_frame(&particle, 1.49).is_none());
    assert!(particle_frame(&particle, 1.5).is_some());
}

#[test]
fn particle_grows_outward_and_fades() {
    let particle = Particle {
        angle_deg: 90.0,
        distance: 200.0,
        delay_s: 0.0,
    };

    let start = particle_frame(&particle, 0.0).expect("frame at start");
    assert_eq!(start.scale, 0.0);
    assert_eq!(start.opacity, 1.0);
    assert!(start.dx.abs() < 1e-9 && start.dy.abs() < 1e-9);

    let middle = particle_frame(&particle, CYCLE_S * 0.5).expect("frame at middle");
    assert_eq!(middle.opacity, 1.0);
    assert!(middle.dy > 0.0 && middle.dy < 200.0);
    assert!(middle.dx.abs() < 1e-6);

    let late = particle_frame(&particle, CYCLE_S * 0.999).expect("frame near end");
    assert!(late.opacity < 0.01);
    assert!(late.scale > 0.99);
    assert!((late.dy - 200.0).abs() < 1.0);
}

#[test]
fn animation_loops_every_cycle() {
    let particle = Particle {
        angle_deg: 45.0,
        distance: 300.0,
        delay_s: 0.3,
    };
    let first = particle_frame(&particle, 0.8).expect("first loop");
    let later = particle_frame(&particle, 0.8 + 3.0 * CYCLE_S).expect("later loop");
    assert!((first.dx - later.dx).abs() < 1e-6);
    assert!((first.opacity - later.opacity).abs() < 1e-9);
}
