use grove_core::ease::ease_in_out_cubic;
use grove_core::morph::MorphState;

#[test]
fn ease_hits_endpoints_and_midpoint() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
    assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn ease_is_monotonic_non_decreasing() {
    let mut prev = ease_in_out_cubic(0.0);
    for i in 1..=1000 {
        let x = i as f32 / 1000.0;
        let y = ease_in_out_cubic(x);
        assert!(
            y >= prev,
            "easing decreased at x={x}: {y} < {prev}"
        );
        prev = y;
    }
}

#[test]
fn ease_clamps_out_of_range_inputs() {
    assert_eq!(ease_in_out_cubic(-0.5), 0.0);
    assert_eq!(ease_in_out_cubic(1.5), 1.0);
}

#[test]
fn ease_accelerates_from_rest() {
    // Property: the first tenth of the input range covers far less than a
    // tenth of the output range.
    assert!(ease_in_out_cubic(0.1) < 0.01);
    assert!(ease_in_out_cubic(0.9) > 0.99);
}

#[test]
fn morph_settles_to_exactly_one() {
    let mut morph = MorphState::new(0.0);
    morph.set_target(1.0);
    for _ in 0..500 {
        morph.advance();
    }
    assert_eq!(morph.current(), 1.0, "morph should snap exactly to target");
    assert_eq!(morph.eased(), 1.0);
}

#[test]
fn morph_settles_back_to_exactly_zero() {
    let mut morph = MorphState::new(1.0);
    morph.set_target(0.0);
    for _ in 0..500 {
        morph.advance();
    }
    assert_eq!(morph.current(), 0.0);
}

#[test]
fn morph_value_stays_in_unit_interval() {
    let mut morph = MorphState::new(0.0);
    morph.set_target(7.0); // clamped
    assert_eq!(morph.target(), 1.0);
    for _ in 0..300 {
        morph.advance();
        assert!(
            (0.0..=1.0).contains(&morph.current()),
            "morph escaped [0,1]: {}",
            morph.current()
        );
    }
}

#[test]
fn morph_moves_monotonically_toward_target() {
    let mut morph = MorphState::new(0.0);
    morph.set_target(1.0);
    let mut prev = morph.current();
    for _ in 0..200 {
        morph.advance();
        assert!(morph.current() >= prev);
        prev = morph.current();
    }
}
