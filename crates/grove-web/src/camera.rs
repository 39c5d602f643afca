use glam::{Mat4, Vec3};
use grove_core::constants::{CAMERA_DISTANCE, FORMATION_CENTER};
use grove_core::OrbitState;

/// Per-frame camera derivation from the smoothed orbit angles.
pub struct CameraFrame {
    pub eye: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub view_proj: Mat4,
}

/// Right-handed orbit around the formation center. The camera moves; the
/// formation stays in world space.
pub fn camera_frame(orbit: &OrbitState, aspect: f32) -> CameraFrame {
    let (sin_yaw, cos_yaw) = orbit.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = orbit.pitch.sin_cos();
    let eye = FORMATION_CENTER
        + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * CAMERA_DISTANCE;
    let forward = (FORMATION_CENTER - eye).normalize();
    let right = forward.cross(Vec3::Y).normalize();
    let up = right.cross(forward);
    let proj = Mat4::perspective_rh(
        std::f32::consts::FRAC_PI_4,
        aspect.max(1e-3),
        0.1,
        100.0,
    );
    let view = Mat4::look_at_rh(eye, FORMATION_CENTER, Vec3::Y);
    CameraFrame {
        eye,
        forward,
        right,
        up,
        view_proj: proj * view,
    }
}
