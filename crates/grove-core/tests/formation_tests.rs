use grove_core::constants::{
    CORE_RADIUS, FORMATION_CENTER, HALO_INNER_RADIUS, HALO_JITTER_AMPLITUDE, OUTER_RADIUS,
    SPARK_FRACTION,
};
use grove_core::formation::{
    core_radius, generate_points, halo_radius, scatter_position, seeded_rng,
};
use grove_core::particles::{ParticleField, PerformanceMode};

#[test]
fn core_samples_stay_inside_core_radius() {
    let mut rng = seeded_rng(7, 0);
    for _ in 0..5000 {
        let p = scatter_position(false, &mut rng);
        let r = p.distance(FORMATION_CENTER);
        assert!(r <= CORE_RADIUS + 1e-4, "core point escaped: r={r}");
    }
}

#[test]
fn halo_samples_stay_inside_shell() {
    let mut rng = seeded_rng(7, 1);
    for _ in 0..5000 {
        let p = scatter_position(true, &mut rng);
        let r = p.distance(FORMATION_CENTER);
        assert!(
            r >= HALO_INNER_RADIUS - 1e-3 && r <= OUTER_RADIUS + 1e-3,
            "halo point outside shell: r={r}"
        );
    }
}

#[test]
fn halo_radius_distribution_is_volumetrically_uniform() {
    // Property: with inverse cube-root sampling, equal-volume sub-shells
    // receive equal point counts up to sampling noise.
    let mut rng = seeded_rng(11, 2);
    let n = 60_000;
    let r_min3 = HALO_INNER_RADIUS.powi(3);
    let r_max3 = OUTER_RADIUS.powi(3);
    let mut buckets = [0usize; 3];
    for _ in 0..n {
        let r3 = halo_radius(&mut rng).powi(3);
        let frac = (r3 - r_min3) / (r_max3 - r_min3);
        let idx = ((frac * 3.0) as usize).min(2);
        buckets[idx] += 1;
    }
    let expected = n as f32 / 3.0;
    for (i, count) in buckets.iter().enumerate() {
        let dev = (*count as f32 - expected).abs() / expected;
        assert!(
            dev < 0.05,
            "bucket {i} deviates {dev:.3} from uniform ({count} vs {expected})"
        );
    }
}

#[test]
fn core_radius_distribution_is_volumetrically_uniform() {
    let mut rng = seeded_rng(13, 3);
    let n = 60_000;
    let mut inner_half_volume = 0usize;
    for _ in 0..n {
        let r3 = core_radius(&mut rng).powi(3);
        if r3 < CORE_RADIUS.powi(3) / 2.0 {
            inner_half_volume += 1;
        }
    }
    let frac = inner_half_volume as f32 / n as f32;
    assert!(
        (frac - 0.5).abs() < 0.02,
        "half the volume should hold half the points, got {frac}"
    );
}

#[test]
fn generated_points_respect_shell_bounds_with_jitter_margin() {
    let mut rng = seeded_rng(3, 4);
    let points = generate_points(4000, &mut rng);
    for p in &points {
        let r = p.scatter.distance(FORMATION_CENTER);
        if p.motion.is_halo() {
            assert!(
                r >= HALO_INNER_RADIUS - HALO_JITTER_AMPLITUDE
                    && r <= OUTER_RADIUS + HALO_JITTER_AMPLITUDE,
                "halo point outside jittered shell: r={r}"
            );
        } else {
            assert!(r <= CORE_RADIUS + 1e-4, "core point escaped: r={r}");
        }
    }
}

#[test]
fn core_halo_split_matches_weighted_coin() {
    let mut rng = seeded_rng(19, 5);
    let points = generate_points(20_000, &mut rng);
    let core = points.iter().filter(|p| !p.motion.is_halo()).count();
    let frac = core as f32 / points.len() as f32;
    assert!(
        (frac - 0.75).abs() < 0.02,
        "core fraction drifted from the coin weight: {frac}"
    );
}

#[test]
fn generation_is_deterministic_for_a_fixed_seed() {
    let a = generate_points(256, &mut seeded_rng(42, 9));
    let b = generate_points(256, &mut seeded_rng(42, 9));
    for (pa, pb) in a.iter().zip(b.iter()) {
        assert_eq!(pa.assembled, pb.assembled);
        assert_eq!(pa.scatter, pb.scatter);
        assert_eq!(pa.seed, pb.seed);
    }
}

#[test]
fn cone_positions_taper_toward_the_apex() {
    let mut rng = seeded_rng(5, 6);
    let points = generate_points(2000, &mut rng);
    let mut low_sum = 0.0f32;
    let mut high_sum = 0.0f32;
    let (mut low_n, mut high_n) = (0, 0);
    for p in &points {
        let radial = (p.assembled.x * p.assembled.x + p.assembled.z * p.assembled.z).sqrt();
        if p.assembled.y < 0.0 {
            low_sum += radial;
            low_n += 1;
        } else {
            high_sum += radial;
            high_n += 1;
        }
    }
    assert!(low_n > 0 && high_n > 0);
    assert!(
        low_sum / low_n as f32 > high_sum / high_n as f32,
        "lower cone slices should be wider than upper slices"
    );
}

#[test]
fn particle_field_tiers_and_spark_share() {
    assert_eq!(PerformanceMode::High.population(), 6000);
    assert_eq!(PerformanceMode::Medium.population(), 4000);
    assert_eq!(PerformanceMode::Low.population(), 2000);

    let field = ParticleField::new(PerformanceMode::High, 42);
    assert_eq!(field.len(), 6000);
    let sparks = field.attrs().iter().filter(|a| a.spark > 0.5).count();
    let frac = sparks as f32 / field.len() as f32;
    assert!(
        (frac - SPARK_FRACTION).abs() < 0.02,
        "spark share should be near {SPARK_FRACTION}, got {frac}"
    );
}

#[test]
fn particle_field_rebuild_replaces_population_and_bumps_generation() {
    let mut field = ParticleField::new(PerformanceMode::Low, 1);
    assert_eq!(field.generation(), 0);
    field.rebuild(PerformanceMode::Medium, 2);
    assert_eq!(field.generation(), 1);
    assert_eq!(field.len(), 4000);
    assert_eq!(field.mode(), PerformanceMode::Medium);
}

#[test]
fn bloom_strength_scales_down_with_mode() {
    assert!(
        PerformanceMode::High.bloom_strength() > PerformanceMode::Medium.bloom_strength()
            && PerformanceMode::Medium.bloom_strength() > PerformanceMode::Low.bloom_strength()
    );
}
