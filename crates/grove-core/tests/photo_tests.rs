use glam::Vec3;
use grove_core::constants::{PHOTO_BASE_SCALE, PHOTO_FOCUS_DISTANCE, PHOTO_FOCUS_SCALE};
use grove_core::formation::seeded_rng;
use grove_core::morph::MorphState;
use grove_core::photos::{look_at_camera, PhotoError, PhotoFocusSystem};

fn system_with(count: usize) -> PhotoFocusSystem {
    let mut system = PhotoFocusSystem::default();
    system
        .replace(count, &mut seeded_rng(21, 0))
        .expect("slot count within limit");
    system
}

#[test]
fn replace_rejects_oversized_sets() {
    let mut system = PhotoFocusSystem::default();
    let err = system.replace(13, &mut seeded_rng(21, 0)).unwrap_err();
    assert_eq!(err, PhotoError::TooMany { got: 13, max: 12 });
    assert!(system.slots().is_empty());
}

#[test]
fn replace_assigns_sequential_identities_from_zero() {
    let system = system_with(5);
    let ids: Vec<u32> = system.slots().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn nearest_slot_is_selected_once_and_held() {
    let mut system = system_with(6);
    let near = system.slots()[3].position;
    let eye = near + Vec3::new(0.05, 0.05, 0.05);
    system.set_active(true, eye);
    assert_eq!(system.focus().focused, Some(3));

    // repeated activation while held must not reselect, even if the camera
    // is now closer to a different slot
    let other = system.slots()[0].position;
    for _ in 0..10 {
        system.set_active(true, other);
        assert_eq!(system.focus().focused, Some(3));
    }

    system.set_active(false, eye);
    assert_eq!(system.focus().focused, None);
    assert!(!system.focus().active);
}

#[test]
fn at_most_one_slot_is_focused() {
    let mut system = system_with(8);
    system.set_active(true, Vec3::ZERO);
    let focused = system.focus().focused;
    assert!(focused.is_some());
    system.set_active(true, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(system.focus().focused, focused);
}

#[test]
fn focused_slot_converges_in_front_of_the_camera() {
    let mut system = system_with(4);
    let morph = MorphState::new(0.0);
    let eye = Vec3::new(0.0, 0.5, 11.0);
    let forward = Vec3::new(0.0, 0.0, -1.0);
    system.set_active(true, eye);
    let id = system.focus().focused.expect("a slot is focused");
    for i in 0..600 {
        system.update(&morph, i as f32 / 60.0, eye, forward);
    }
    let slot = system
        .slots()
        .iter()
        .find(|s| s.id == id)
        .expect("focused slot exists");
    let target = eye + forward * PHOTO_FOCUS_DISTANCE;
    assert!(
        slot.position.distance(target) < 0.05,
        "focused slot should settle in front of the camera, off by {}",
        slot.position.distance(target)
    );
    assert!((slot.scale - PHOTO_BASE_SCALE * PHOTO_FOCUS_SCALE).abs() < 0.01);
}

#[test]
fn unfocused_slots_follow_the_eased_morph() {
    let mut system = system_with(3);
    let morph = MorphState::new(1.0);
    let eye = Vec3::new(0.0, 0.5, 11.0);
    let forward = Vec3::new(0.0, 0.0, -1.0);
    for i in 0..800 {
        system.update(&morph, i as f32 / 60.0, eye, forward);
    }
    for slot in system.slots() {
        // fully scattered: position orbits its scatter home within bob range
        assert!(
            slot.position.distance(slot.scatter) < 0.2,
            "slot {} strayed {} from its scatter home",
            slot.id,
            slot.position.distance(slot.scatter)
        );
    }
}

#[test]
fn billboard_orientation_approaches_the_camera_without_snapping() {
    let mut system = system_with(1);
    let morph = MorphState::new(0.0);
    let eye = Vec3::new(6.0, 2.0, 6.0);
    let forward = (Vec3::ZERO - eye).normalize();

    let target = look_at_camera(system.slots()[0].position, eye);
    let mut prev_err = system.slots()[0].rotation.angle_between(target);
    let mut first_step_err = None;
    for i in 0..120 {
        system.update(&morph, i as f32 / 60.0, eye, forward);
        let slot = system.slots()[0];
        let target = look_at_camera(slot.position, eye);
        let err = slot.rotation.angle_between(target);
        assert!(err <= prev_err + 1e-3, "angular error increased at step {i}");
        if first_step_err.is_none() {
            first_step_err = Some(err);
        }
        prev_err = err;
    }
    // never snapping: the very first step leaves most of the error in place
    assert!(first_step_err.unwrap() > prev_err);
    assert!(prev_err < 0.05, "orientation should settle on the camera");
}
