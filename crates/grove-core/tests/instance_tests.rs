use grove_core::constants::{HALO_DRIFT_AMPLITUDE, INSTANCE_ROT_X_STEP, INSTANCE_ROT_Y_STEP};
use grove_core::formation::seeded_rng;
use grove_core::instances::InstanceMorphEngine;
use grove_core::morph::MorphState;

#[test]
fn assembled_pose_is_exact_with_no_idle_motion() {
    let mut engine = InstanceMorphEngine::new(64, &mut seeded_rng(42, 0));
    let morph = MorphState::new(0.0);
    engine.update(&morph, 12.5);
    for (point, transform) in engine.points().iter().zip(engine.transforms()) {
        assert_eq!(
            transform.position, point.assembled,
            "idle motion must be off while fully assembled"
        );
    }
}

#[test]
fn morph_to_one_converges_on_scatter_homes() {
    let mut engine = InstanceMorphEngine::new(64, &mut seeded_rng(42, 1));
    let mut morph = MorphState::new(0.0);
    morph.set_target(1.0);
    for i in 0..500 {
        morph.advance();
        engine.update(&morph, i as f32 / 60.0);
    }
    assert_eq!(morph.current(), 1.0);
    // idle motion keeps points oscillating, bounded by the drift amplitude
    let bound = HALO_DRIFT_AMPLITUDE * 3.0f32.sqrt() + 1e-3;
    for (point, transform) in engine.points().iter().zip(engine.transforms()) {
        let dist = transform.position.distance(point.scatter);
        assert!(
            dist <= bound,
            "instance strayed {dist} from its scatter home (bound {bound})"
        );
    }
}

#[test]
fn transforms_dirty_exactly_once_per_update() {
    let mut engine = InstanceMorphEngine::new(8, &mut seeded_rng(1, 2));
    assert!(engine.take_dirty(), "fresh engine needs an initial upload");
    assert!(!engine.take_dirty());
    engine.update(&MorphState::new(0.5), 1.0);
    assert!(engine.take_dirty());
    assert!(!engine.take_dirty());
}

#[test]
fn per_index_rotation_is_static_across_updates() {
    let mut engine = InstanceMorphEngine::new(16, &mut seeded_rng(9, 3));
    let before: Vec<_> = engine.transforms().iter().map(|t| t.rotation).collect();
    for i in 0..50 {
        engine.update(&MorphState::new(0.7), i as f32);
    }
    for (i, (prev, now)) in before.iter().zip(engine.transforms()).enumerate() {
        assert_eq!(*prev, now.rotation, "rotation drifted for instance {i}");
        assert_eq!(now.rotation.x, i as f32 * INSTANCE_ROT_X_STEP);
        assert_eq!(now.rotation.y, i as f32 * INSTANCE_ROT_Y_STEP);
    }
}

#[test]
fn pairing_is_immutable_across_updates() {
    let mut engine = InstanceMorphEngine::new(32, &mut seeded_rng(4, 4));
    let homes: Vec<_> = engine
        .points()
        .iter()
        .map(|p| (p.assembled, p.scatter, p.motion.is_halo()))
        .collect();
    for i in 0..100 {
        engine.update(&MorphState::new(i as f32 / 100.0), i as f32 * 0.016);
    }
    for (point, (assembled, scatter, halo)) in engine.points().iter().zip(&homes) {
        assert_eq!(point.assembled, *assembled);
        assert_eq!(point.scatter, *scatter);
        assert_eq!(point.motion.is_halo(), *halo);
    }
}
