use grove_core::gesture::{classify, GestureAction, GestureClass, GestureFsm, HandFrame};

// MediaPipe hand layout: wrist 0, then (PIP, TIP) pairs per finger.
const FINGERS: [(usize, usize); 5] = [(2, 4), (6, 8), (10, 12), (14, 16), (18, 20)];

fn set(data: &mut [f32; 63], index: usize, x: f32, y: f32) {
    data[index * 3] = x;
    data[index * 3 + 1] = y;
    data[index * 3 + 2] = 0.0;
}

/// Synthetic hand at `wrist` with the given per-finger extension flags
/// (thumb, index, middle, ring, pinky). Extended tips sit twice as far from
/// the wrist as their PIP joint; curled tips sit inside it.
fn hand_at(wrist: (f32, f32), extended: [bool; 5]) -> HandFrame {
    let mut data = [0.0f32; 63];
    set(&mut data, 0, wrist.0, wrist.1);
    for (i, (pip, tip)) in FINGERS.iter().enumerate() {
        let angle = 1.2 + i as f32 * 0.3;
        let (dx, dy) = (angle.cos(), -angle.sin());
        set(&mut data, *pip, wrist.0 + dx * 0.10, wrist.1 + dy * 0.10);
        let tip_dist = if extended[i] { 0.20 } else { 0.05 };
        set(&mut data, *tip, wrist.0 + dx * tip_dist, wrist.1 + dy * tip_dist);
    }
    HandFrame::from_slice(&data).expect("synthetic frame")
}

fn fist() -> HandFrame {
    hand_at((0.5, 0.5), [false, false, false, false, false])
}

fn open_palm() -> HandFrame {
    hand_at((0.5, 0.5), [true, true, true, true, true])
}

#[test]
fn classification_matches_boolean_patterns() {
    assert_eq!(classify(&fist()), GestureClass::Fist);
    assert_eq!(classify(&open_palm()), GestureClass::OpenPalm);
    assert_eq!(
        classify(&hand_at((0.5, 0.5), [false, true, true, false, false])),
        GestureClass::VSign
    );
    assert_eq!(
        classify(&hand_at((0.5, 0.5), [false, true, false, false, false])),
        GestureClass::IndexUp
    );
    // index + ring matches no pattern
    assert_eq!(
        classify(&hand_at((0.5, 0.5), [false, true, false, true, false])),
        GestureClass::Unknown
    );
}

#[test]
fn thumb_does_not_break_fist_or_open_palm() {
    assert_eq!(
        classify(&hand_at((0.5, 0.5), [true, false, false, false, false])),
        GestureClass::Fist
    );
    assert_eq!(
        classify(&hand_at((0.5, 0.5), [false, true, true, true, true])),
        GestureClass::OpenPalm
    );
}

#[test]
fn malformed_landmark_stream_is_rejected() {
    assert!(HandFrame::from_slice(&[0.0; 62]).is_err());
    assert!(HandFrame::from_slice(&[0.0; 64]).is_err());
    assert!(HandFrame::from_slice(&[0.0; 63]).is_ok());
}

#[test]
fn debounce_commits_on_the_eighth_frame_not_earlier() {
    let mut fsm = GestureFsm::new();
    let frame = fist();
    for i in 1..8 {
        fsm.update(Some(&frame), i as f64);
        assert_eq!(
            fsm.stable(),
            GestureClass::Unknown,
            "stable committed early at frame {i}"
        );
    }
    let out = fsm.update(Some(&frame), 8.0);
    assert_eq!(fsm.stable(), GestureClass::Fist);
    assert_eq!(out.actions.as_slice(), &[GestureAction::Assemble]);
}

#[test]
fn unknown_resets_the_debounce_counter() {
    let mut fsm = GestureFsm::new();
    let frame = fist();
    let unknown = hand_at((0.5, 0.5), [false, true, false, true, false]);
    for _ in 0..5 {
        fsm.update(Some(&frame), 0.0);
    }
    fsm.update(Some(&unknown), 0.0);
    // seven more identical frames are not enough after the reset
    for _ in 0..7 {
        fsm.update(Some(&frame), 0.0);
        assert_eq!(fsm.stable(), GestureClass::Unknown);
    }
    fsm.update(Some(&frame), 0.0);
    assert_eq!(fsm.stable(), GestureClass::Fist);
}

#[test]
fn class_change_resets_the_debounce_counter() {
    let mut fsm = GestureFsm::new();
    for _ in 0..6 {
        fsm.update(Some(&fist()), 0.0);
    }
    for _ in 0..7 {
        fsm.update(Some(&open_palm()), 0.0);
        assert_eq!(fsm.stable(), GestureClass::Unknown);
    }
    fsm.update(Some(&open_palm()), 0.0);
    assert_eq!(fsm.stable(), GestureClass::OpenPalm);
}

#[test]
fn cooldown_blocks_a_refire_at_500ms_but_not_900ms() {
    let mut actions = 0;
    let mut fsm = GestureFsm::new();
    for i in 0..8 {
        actions += fsm.update(Some(&fist()), i as f64).actions.len();
    }
    assert_eq!(actions, 1, "first commit should fire immediately");
    actions += fsm.update(Some(&fist()), 500.0).actions.len();
    assert_eq!(actions, 1, "500ms is inside the cooldown window");
    actions += fsm.update(Some(&fist()), 900.0).actions.len();
    assert_eq!(actions, 2, "900ms is past the cooldown window");
}

#[test]
fn focus_tracks_stable_index_up_without_cooldown() {
    let mut fsm = GestureFsm::new();
    let point = hand_at((0.5, 0.5), [false, true, false, false, false]);
    for _ in 0..7 {
        let out = fsm.update(Some(&point), 0.0);
        assert!(!out.focus_active);
    }
    let out = fsm.update(Some(&point), 0.0);
    assert!(out.focus_active);
    // a single divergent raw frame does not drop the stable class
    let out = fsm.update(Some(&fist()), 0.0);
    assert!(out.focus_active);
    // losing the hand clears focus immediately
    let out = fsm.update(None, 0.0);
    assert!(!out.focus_active);
}

#[test]
fn wrist_deadzone_floors_small_deltas() {
    let mut fsm = GestureFsm::new();
    fsm.update(Some(&hand_at((0.5, 0.5), [false; 5])), 0.0);
    let out = fsm.update(Some(&hand_at((0.502, 0.502), [false; 5])), 16.0);
    assert_eq!(out.yaw_delta, 0.0);
    assert_eq!(out.pitch_delta, 0.0);
    assert!(!out.hand_rotating);
}

#[test]
fn wrist_motion_above_deadzone_drives_rotation() {
    let mut fsm = GestureFsm::new();
    fsm.update(Some(&hand_at((0.5, 0.5), [false; 5])), 0.0);
    let out = fsm.update(Some(&hand_at((0.52, 0.51), [false; 5])), 16.0);
    assert!(out.hand_rotating);
    assert!(out.yaw_delta > 0.0);
    assert!(out.pitch_delta > 0.0);
    // yaw is scaled harder than pitch
    assert!(out.yaw_delta > out.pitch_delta);
}

#[test]
fn losing_the_hand_clears_the_remembered_wrist() {
    let mut fsm = GestureFsm::new();
    fsm.update(Some(&hand_at((0.1, 0.1), [false; 5])), 0.0);
    fsm.update(None, 16.0);
    // a re-detection far away must not produce a spurious large delta
    let out = fsm.update(Some(&hand_at((0.9, 0.9), [false; 5])), 32.0);
    assert!(!out.hand_rotating);
    assert_eq!(out.yaw_delta, 0.0);
}
