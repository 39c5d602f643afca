use crate::constants::*;
use crate::formation::scatter_position;
use crate::morph::MorphState;
use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhotoError {
    #[error("photo set holds at most {max} images, got {got}")]
    TooMany { got: usize, max: usize },
}

/// One billboarded image plane. Identity is stable for the lifetime of an
/// upload batch; position/scale/rotation chase per-frame targets.
#[derive(Clone, Copy, Debug)]
pub struct PhotoSlot {
    pub id: u32,
    pub assembled: Vec3,
    pub scatter: Vec3,
    pub position: Vec3,
    pub scale: f32,
    pub rotation: Quat,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FocusState {
    pub active: bool,
    pub focused: Option<u32>,
}

/// Tracks the photo slots and the at-most-one camera-focused slot.
#[derive(Default)]
pub struct PhotoFocusSystem {
    slots: Vec<PhotoSlot>,
    focus: FocusState,
}

impl PhotoFocusSystem {
    pub fn slots(&self) -> &[PhotoSlot] {
        &self.slots
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    /// Replace the whole slot set. Identities restart at zero; the renderer
    /// must dispose prior slot resources before calling this.
    pub fn replace<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<(), PhotoError> {
        if count > PHOTO_MAX_COUNT {
            return Err(PhotoError::TooMany {
                got: count,
                max: PHOTO_MAX_COUNT,
            });
        }
        self.focus = FocusState::default();
        self.slots = (0..count as u32)
            .map(|id| {
                // spiral the assembled homes up the cone surface
                let t = (id as f32 + 0.5) / count.max(1) as f32;
                let angle = id as f32 * 2.4 + rng.gen::<f32>() * 0.3;
                let radius = CONE_BASE_RADIUS * (1.0 - t) + 0.35;
                let assembled = Vec3::new(
                    radius * angle.cos(),
                    CONE_BASE_Y + t * CONE_HEIGHT,
                    radius * angle.sin(),
                );
                PhotoSlot {
                    id,
                    assembled,
                    scatter: scatter_position(true, rng),
                    position: assembled,
                    scale: PHOTO_BASE_SCALE,
                    rotation: Quat::IDENTITY,
                }
            })
            .collect();
        log::info!("[photos] slot set replaced count={}", count);
        Ok(())
    }

    /// Drive the focus flag. On the rising edge with nothing focused, the
    /// slot nearest the camera is selected exactly once and held until the
    /// flag falls.
    pub fn set_active(&mut self, active: bool, camera_eye: Vec3) {
        if active {
            if self.focus.focused.is_none() {
                self.focus.focused = self
                    .slots
                    .iter()
                    .min_by(|a, b| {
                        let da = a.position.distance_squared(camera_eye);
                        let db = b.position.distance_squared(camera_eye);
                        da.total_cmp(&db)
                    })
                    .map(|s| s.id);
                if let Some(id) = self.focus.focused {
                    log::info!("[photos] focus slot {}", id);
                }
            }
        } else if self.focus.focused.take().is_some() {
            log::info!("[photos] focus cleared");
        }
        self.focus.active = active;
    }

    /// Resolve per-slot targets and advance the damped chase. Orientation
    /// slerps toward the camera every frame, never snapping.
    pub fn update(
        &mut self,
        morph: &MorphState,
        time: f32,
        camera_eye: Vec3,
        camera_forward: Vec3,
    ) {
        let eased = morph.eased();
        let focused = self.focus.focused;
        for slot in &mut self.slots {
            let (target_pos, target_scale) = if focused == Some(slot.id) {
                (
                    camera_eye + camera_forward * PHOTO_FOCUS_DISTANCE,
                    PHOTO_BASE_SCALE * PHOTO_FOCUS_SCALE,
                )
            } else {
                let bob = (time * PHOTO_BOB_RATE + slot.id as f32).sin() * PHOTO_BOB_AMPLITUDE;
                (
                    slot.assembled.lerp(slot.scatter, eased) + Vec3::Y * bob,
                    PHOTO_BASE_SCALE,
                )
            };
            slot.position += (target_pos - slot.position) * PHOTO_DAMPING;
            slot.scale += (target_scale - slot.scale) * PHOTO_DAMPING;
            let look = look_at_camera(slot.position, camera_eye);
            slot.rotation = slot.rotation.slerp(look, PHOTO_BILLBOARD_DAMPING);
        }
    }
}

/// Orientation turning a +Z-facing plane at `position` toward the camera,
/// keeping world up.
pub fn look_at_camera(position: Vec3, camera_eye: Vec3) -> Quat {
    let forward = (camera_eye - position).normalize_or_zero();
    let right = Vec3::Y.cross(forward);
    // degenerate when the camera sits on the slot or straight above/below it
    if right.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}
