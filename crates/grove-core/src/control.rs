use crate::constants::*;
use crate::ease::approach;
use crate::gesture::{FsmOutput, GestureAction};
use crate::morph::MorphState;

/// Lifecycle of the hand-tracking setup. `Loading` transitions to `On` or
/// `Error` once, never retried automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingStatus {
    Idle,
    Loading,
    On,
    Error,
}

impl TrackingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Idle => "idle",
            TrackingStatus::Loading => "loading",
            TrackingStatus::On => "on",
            TrackingStatus::Error => "error",
        }
    }
}

/// Camera orbit angles. Targets move instantly (from gestures or pointer
/// drag); the actual angles chase them by exponential smoothing each tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_target: f32,
    pub pitch_target: f32,
}

impl OrbitState {
    pub fn apply_delta(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw_target += yaw_delta;
        self.pitch_target = (self.pitch_target + pitch_delta).clamp(-PITCH_CLAMP, PITCH_CLAMP);
    }

    pub fn advance(&mut self) {
        self.yaw = approach(self.yaw, self.yaw_target, ORBIT_SMOOTH_K);
        self.pitch = approach(self.pitch, self.pitch_target, ORBIT_SMOOTH_K);
    }
}

/// The single process-owned control context shared between the render tick
/// and the video-frame tick. Both run on the same single-threaded executor
/// on wasm, so the type carries no locks; a multi-threaded port must guard
/// it explicitly.
pub struct ControlState {
    pub morph: MorphState,
    pub orbit: OrbitState,
    pub focus_active: bool,
    pub hand_rotating: bool,
    pub tracking: TrackingStatus,
    /// Bumped by the cycle-display action; the embedding UI interprets it.
    pub display_cycle: u32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            morph: MorphState::default(),
            orbit: OrbitState::default(),
            focus_active: false,
            hand_rotating: false,
            tracking: TrackingStatus::Idle,
            display_cycle: 0,
        }
    }
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one FSM update into the shared state.
    pub fn apply_gesture(&mut self, out: &FsmOutput) {
        for action in &out.actions {
            match action {
                GestureAction::Assemble => self.morph.set_target(0.0),
                GestureAction::Scatter => self.morph.set_target(1.0),
                GestureAction::CycleDisplay => self.display_cycle = self.display_cycle.wrapping_add(1),
            }
            log::info!("[gesture] action {:?}", action);
        }
        self.focus_active = out.focus_active;
        if out.hand_rotating {
            self.orbit.apply_delta(out.yaw_delta, out.pitch_delta);
        }
        self.hand_rotating = out.hand_rotating;
    }

    /// Advance the smoothed values one render tick.
    pub fn advance(&mut self) {
        self.morph.advance();
        self.orbit.advance();
    }
}
