use glam::Vec3;
use std::f32::consts::PI;

// Shared formation/morph tuning constants used by both the instance set and
// the particle field.

// Morph smoothing
pub const MORPH_SMOOTH_K: f32 = 0.05; // per-tick exponential approach rate
pub const MORPH_SNAP_EPSILON: f32 = 0.001; // snap to target inside this band
pub const IDLE_MOTION_MIN_MORPH: f32 = 0.01; // idle motion off while assembled

// Assembled (cone) formation
pub const CONE_HEIGHT: f32 = 7.0;
pub const CONE_BASE_RADIUS: f32 = 2.6;
pub const CONE_BASE_Y: f32 = -3.0;
pub const CONE_RADIUS_JITTER: f32 = 0.22; // fractional per-point radius spread

// Scatter (sphere) formation
pub const FORMATION_CENTER: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const CORE_RADIUS: f32 = 3.2; // dense inner ball
pub const HALO_INNER_RADIUS: f32 = CORE_RADIUS * 1.05; // shell starts just outside
pub const OUTER_RADIUS: f32 = 8.5;
pub const CORE_FRACTION: f32 = 0.75; // share of points sampled in the core
pub const HALO_JITTER_CHANCE: f32 = 0.30;
pub const HALO_JITTER_AMPLITUDE: f32 = 0.6;

// Idle motion
pub const CORE_PULSE_AMPLITUDE: f32 = 0.05;
pub const CORE_PULSE_RATE: f32 = 1.7;
pub const HALO_DRIFT_AMPLITUDE: f32 = 0.35;
pub const HALO_DRIFT_RATE: f32 = 0.23;

// Instance set
pub const INSTANCE_ROT_X_STEP: f32 = 0.1; // static per-index orientation
pub const INSTANCE_ROT_Y_STEP: f32 = 0.2;

// Particle field
pub const SPARK_FRACTION: f32 = 0.10; // twinkling subpopulation

// Photo slots
pub const PHOTO_MAX_COUNT: usize = 12;
pub const PHOTO_BASE_SCALE: f32 = 0.55;
pub const PHOTO_DAMPING: f32 = 0.08; // position/scale chase rate
pub const PHOTO_BILLBOARD_DAMPING: f32 = 0.1; // rotation slerp rate
pub const PHOTO_FOCUS_SCALE: f32 = 2.5;
pub const PHOTO_FOCUS_DISTANCE: f32 = 2.2; // in front of the camera eye
pub const PHOTO_BOB_RATE: f32 = 0.5;
pub const PHOTO_BOB_AMPLITUDE: f32 = 0.08;

// Gesture classification and debounce
pub const FINGER_EXTENDED_MARGIN: f32 = 1.1; // tip vs PIP distance ratio
pub const GESTURE_DEBOUNCE_FRAMES: u32 = 8;
pub const GESTURE_COOLDOWN_MS: f64 = 800.0;
pub const WRIST_DEADZONE: f32 = 0.003; // normalized units, per axis
pub const YAW_DELTA_SCALE: f32 = PI * 1.25;
pub const PITCH_DELTA_SCALE: f32 = PI * 0.6;
pub const PITCH_CLAMP: f32 = 0.6; // radians

// Orbit smoothing
pub const ORBIT_SMOOTH_K: f32 = 0.05;

// Camera
pub const CAMERA_DISTANCE: f32 = 11.0;

// Post-processing defaults (strength comes from the performance mode)
pub const BLOOM_THRESHOLD: f32 = 0.35;
