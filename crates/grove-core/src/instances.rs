use crate::constants::*;
use crate::formation::{generate_points, FormationPoint};
use crate::morph::MorphState;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Per-instance transform written each tick and uploaded when dirty.
#[derive(Clone, Copy, Debug)]
pub struct InstanceTransform {
    pub position: Vec3,
    /// Static per-index orientation (x/y Euler). Not time-varying.
    pub rotation: Vec2,
    pub scale: f32,
}

/// Morph engine for the discrete instance set: a bounded population sharing
/// one mesh/material, re-posed every tick from the current morph value.
pub struct InstanceMorphEngine {
    points: Vec<FormationPoint>,
    transforms: Vec<InstanceTransform>,
    dirty: bool,
}

impl InstanceMorphEngine {
    pub fn new<R: Rng>(count: usize, rng: &mut R) -> Self {
        Self::from_points(generate_points(count, rng), rng)
    }

    pub fn from_points<R: Rng>(points: Vec<FormationPoint>, rng: &mut R) -> Self {
        let transforms = points
            .iter()
            .enumerate()
            .map(|(i, p)| InstanceTransform {
                position: p.assembled,
                rotation: Vec2::new(
                    i as f32 * INSTANCE_ROT_X_STEP,
                    i as f32 * INSTANCE_ROT_Y_STEP,
                ),
                scale: 0.8 + rng.gen::<f32>() * 0.4,
            })
            .collect();
        Self {
            points,
            transforms,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[FormationPoint] {
        &self.points
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Re-pose every instance from the eased morph value plus idle motion.
    /// Marks the transform buffer dirty for upload once per call.
    pub fn update(&mut self, morph: &MorphState, time: f32) {
        let eased = morph.eased();
        let idle = morph.current() > IDLE_MOTION_MIN_MORPH;
        for (point, transform) in self.points.iter().zip(self.transforms.iter_mut()) {
            let mut pos = point.assembled.lerp(point.scatter, eased);
            if idle {
                pos += point.motion.offset(point.radial(), eased, time);
            }
            transform.position = pos;
        }
        self.dirty = true;
    }

    /// Consume the dirty flag; the caller uploads when this returns true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
