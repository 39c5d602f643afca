use crate::constants::{MORPH_SMOOTH_K, MORPH_SNAP_EPSILON};
use crate::ease::{approach, ease_in_out_cubic};

/// Scalar morph control in \[0, 1\]: 0 is the assembled cone, 1 the scatter
/// sphere. `current` chases `target` by exponential smoothing each tick and
/// snaps once inside the epsilon band, so a settled morph is exactly 0 or 1.
#[derive(Clone, Copy, Debug)]
pub struct MorphState {
    current: f32,
    target: f32,
}

impl Default for MorphState {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
        }
    }
}

impl MorphState {
    pub fn new(value: f32) -> Self {
        let v = value.clamp(0.0, 1.0);
        Self {
            current: v,
            target: v,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    /// Advance one tick toward the target.
    pub fn advance(&mut self) {
        self.current = approach(self.current, self.target, MORPH_SMOOTH_K).clamp(0.0, 1.0);
        if (self.target - self.current).abs() < MORPH_SNAP_EPSILON {
            self.current = self.target;
        }
    }

    /// The eased value driving all visual interpolation. The raw `current`
    /// is never used for blending.
    pub fn eased(&self) -> f32 {
        ease_in_out_cubic(self.current)
    }
}
