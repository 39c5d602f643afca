use crate::constants::*;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

// Landmark indices for the keypoints the classifier consumes.
pub const WRIST: usize = 0;
const THUMB_MCP: usize = 2;
const THUMB_TIP: usize = 4;
const INDEX_PIP: usize = 6;
const INDEX_TIP: usize = 8;
const MIDDLE_PIP: usize = 10;
const MIDDLE_TIP: usize = 12;
const RING_PIP: usize = 14;
const RING_TIP: usize = 16;
const PINKY_PIP: usize = 18;
const PINKY_TIP: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected {expected} landmark floats, got {got}")]
    BadLength { got: usize, expected: usize },
}

/// One hand's normalized landmark set for a single video frame.
#[derive(Clone, Copy, Debug)]
pub struct HandFrame {
    pub landmarks: [Vec3; LANDMARK_COUNT],
}

impl HandFrame {
    /// Build from a flat `[x, y, z] * 21` stream as delivered by the
    /// detector bridge. Zero hands is represented by the absence of a frame,
    /// not by an error; a wrong-length stream is malformed input.
    pub fn from_slice(data: &[f32]) -> Result<Self, FrameError> {
        if data.len() != LANDMARK_COUNT * 3 {
            return Err(FrameError::BadLength {
                got: data.len(),
                expected: LANDMARK_COUNT * 3,
            });
        }
        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        for (i, chunk) in data.chunks_exact(3).enumerate() {
            landmarks[i] = Vec3::new(chunk[0], chunk[1], chunk[2]);
        }
        Ok(Self { landmarks })
    }

    pub fn wrist(&self) -> Vec3 {
        self.landmarks[WRIST]
    }

    fn extended(&self, tip: usize, joint: usize) -> bool {
        let wrist = self.wrist();
        wrist.distance(self.landmarks[tip])
            > wrist.distance(self.landmarks[joint]) * FINGER_EXTENDED_MARGIN
    }
}

/// Per-finger extension booleans derived from wrist-to-tip vs wrist-to-joint
/// distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

pub fn finger_state(frame: &HandFrame) -> FingerState {
    FingerState {
        thumb: frame.extended(THUMB_TIP, THUMB_MCP),
        index: frame.extended(INDEX_TIP, INDEX_PIP),
        middle: frame.extended(MIDDLE_TIP, MIDDLE_PIP),
        ring: frame.extended(RING_TIP, RING_PIP),
        pinky: frame.extended(PINKY_TIP, PINKY_PIP),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureClass {
    #[default]
    Unknown,
    Fist,
    OpenPalm,
    VSign,
    IndexUp,
}

impl GestureClass {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureClass::Unknown => "unknown",
            GestureClass::Fist => "fist",
            GestureClass::OpenPalm => "open palm",
            GestureClass::VSign => "v sign",
            GestureClass::IndexUp => "index up",
        }
    }
}

/// Fixed boolean-pattern classification. The thumb does not participate:
/// a fist is "nothing besides the thumb extended".
pub fn classify(frame: &HandFrame) -> GestureClass {
    let f = finger_state(frame);
    match (f.index, f.middle, f.ring, f.pinky) {
        (false, false, false, false) => GestureClass::Fist,
        (true, true, true, true) => GestureClass::OpenPalm,
        (true, true, false, false) => GestureClass::VSign,
        (true, false, false, false) => GestureClass::IndexUp,
        _ => GestureClass::Unknown,
    }
}

/// Discrete control actions dispatched by a stable gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureAction {
    Assemble,
    Scatter,
    CycleDisplay,
}

/// Result of one FSM update: actions to dispatch plus the continuous control
/// signals derived this frame.
#[derive(Clone, Debug, Default)]
pub struct FsmOutput {
    pub actions: SmallVec<[GestureAction; 2]>,
    pub focus_active: bool,
    pub yaw_delta: f32,
    pub pitch_delta: f32,
    pub hand_rotating: bool,
}

/// Temporal gesture state machine: classifies every frame, debounces the raw
/// class against jitter, cooldown-gates discrete actions, and derives the
/// wrist-motion rotation signal.
pub struct GestureFsm {
    raw: GestureClass,
    streak: u32,
    stable: GestureClass,
    last_action_ms: f64,
    last_wrist: Option<Vec2>,
}

impl Default for GestureFsm {
    fn default() -> Self {
        Self {
            raw: GestureClass::Unknown,
            streak: 0,
            stable: GestureClass::Unknown,
            last_action_ms: f64::NEG_INFINITY,
            last_wrist: None,
        }
    }
}

impl GestureFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stable(&self) -> GestureClass {
        self.stable
    }

    pub fn raw(&self) -> GestureClass {
        self.raw
    }

    /// Advance one video frame. `frame` is `None` when no hand was detected,
    /// which clears tracking so the next detection cannot produce a spurious
    /// wrist delta.
    pub fn update(&mut self, frame: Option<&HandFrame>, now_ms: f64) -> FsmOutput {
        let mut out = FsmOutput::default();
        let Some(frame) = frame else {
            self.raw = GestureClass::Unknown;
            self.streak = 0;
            self.stable = GestureClass::Unknown;
            self.last_wrist = None;
            return out;
        };

        let raw = classify(frame);
        if raw == self.raw && raw != GestureClass::Unknown {
            self.streak += 1;
        } else {
            self.raw = raw;
            self.streak = if raw == GestureClass::Unknown { 0 } else { 1 };
        }
        if self.streak >= GESTURE_DEBOUNCE_FRAMES {
            if self.stable != self.raw {
                log::info!("[gesture] stable {}", self.raw.as_str());
            }
            self.stable = self.raw;
            let action = match self.stable {
                GestureClass::Fist => Some(GestureAction::Assemble),
                GestureClass::OpenPalm => Some(GestureAction::Scatter),
                GestureClass::VSign => Some(GestureAction::CycleDisplay),
                _ => None,
            };
            if let Some(action) = action {
                if now_ms - self.last_action_ms >= GESTURE_COOLDOWN_MS {
                    out.actions.push(action);
                    self.last_action_ms = now_ms;
                }
            }
        }
        // Focus tracks the stable class continuously, exempt from cooldown.
        out.focus_active = self.stable == GestureClass::IndexUp;

        let wrist = frame.wrist().truncate();
        if let Some(prev) = self.last_wrist {
            let mut delta = wrist - prev;
            if delta.x.abs() < WRIST_DEADZONE {
                delta.x = 0.0;
            }
            if delta.y.abs() < WRIST_DEADZONE {
                delta.y = 0.0;
            }
            if delta != Vec2::ZERO {
                out.yaw_delta = delta.x * YAW_DELTA_SCALE;
                out.pitch_delta = delta.y * PITCH_DELTA_SCALE;
                out.hand_rotating = true;
            }
        }
        self.last_wrist = Some(wrist);
        out
    }
}
