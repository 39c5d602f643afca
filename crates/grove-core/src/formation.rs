use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Idle-motion policy attached to each point. Core points pulse radially;
/// halo points drift independently per axis. The two policies are mutually
/// exclusive and fixed at generation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdleMotion {
    Core { phase: f32 },
    Halo { phase: Vec3 },
}

impl IdleMotion {
    pub fn is_halo(&self) -> bool {
        matches!(self, IdleMotion::Halo { .. })
    }

    /// Offset applied on top of the morphed position. `radial` is the unit
    /// direction from the formation center toward the point's scatter home.
    pub fn offset(&self, radial: Vec3, eased: f32, time: f32) -> Vec3 {
        match self {
            IdleMotion::Core { phase } => {
                radial * (CORE_PULSE_AMPLITUDE * eased * (time * CORE_PULSE_RATE + phase).sin())
            }
            IdleMotion::Halo { phase } => {
                Vec3::new(
                    (time * HALO_DRIFT_RATE + phase.x).sin(),
                    (time * HALO_DRIFT_RATE * 1.3 + phase.y).sin(),
                    (time * HALO_DRIFT_RATE * 0.8 + phase.z).sin(),
                ) * (HALO_DRIFT_AMPLITUDE * eased)
            }
        }
    }
}

/// Identity-stable pairing of a point's two formation homes. Created once
/// and never reassigned.
#[derive(Clone, Copy, Debug)]
pub struct FormationPoint {
    pub assembled: Vec3,
    pub scatter: Vec3,
    pub motion: IdleMotion,
    pub seed: f32,
}

impl FormationPoint {
    pub fn radial(&self) -> Vec3 {
        (self.scatter - FORMATION_CENTER).normalize_or_zero()
    }
}

/// Position on the cone for point `index` of `count`: height from the
/// vertical fraction, radius shrinking toward the apex, with small per-point
/// randomization of radius and angle.
pub fn cone_position<R: Rng>(index: usize, count: usize, rng: &mut R) -> Vec3 {
    let t = index as f32 / count.max(1) as f32;
    let jitter = 1.0 - CONE_RADIUS_JITTER + rng.gen::<f32>() * 2.0 * CONE_RADIUS_JITTER;
    let radius = CONE_BASE_RADIUS * (1.0 - t) * jitter;
    let angle = rng.gen::<f32>() * TAU;
    Vec3::new(
        radius * angle.cos(),
        CONE_BASE_Y + t * CONE_HEIGHT,
        radius * angle.sin(),
    )
}

/// Uniform direction on the unit sphere via inverse-CDF sampling.
fn unit_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

/// Radius for a core point: cube-root scaling keeps volumetric density
/// uniform inside the ball.
pub fn core_radius<R: Rng>(rng: &mut R) -> f32 {
    CORE_RADIUS * rng.gen::<f32>().cbrt()
}

/// Radius for a halo point: inverse cube-root over the shell so density is
/// uniform between the inner and outer bounds.
pub fn halo_radius<R: Rng>(rng: &mut R) -> f32 {
    let r_min3 = HALO_INNER_RADIUS.powi(3);
    let r_max3 = OUTER_RADIUS.powi(3);
    (r_min3 + rng.gen::<f32>() * (r_max3 - r_min3)).cbrt()
}

/// Scatter home before the optional halo jitter.
pub fn scatter_position<R: Rng>(is_halo: bool, rng: &mut R) -> Vec3 {
    let r = if is_halo {
        halo_radius(rng)
    } else {
        core_radius(rng)
    };
    FORMATION_CENTER + unit_direction(rng) * r
}

/// Generate the full point set. Core/halo membership is an independent coin
/// flip so both formations visually interleave; a minority of halo points
/// receive an extra low-frequency positional jitter.
pub fn generate_points<R: Rng>(count: usize, rng: &mut R) -> Vec<FormationPoint> {
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let assembled = cone_position(i, count, rng);
        let is_halo = rng.gen::<f32>() >= CORE_FRACTION;
        let mut scatter = scatter_position(is_halo, rng);
        if is_halo && rng.gen::<f32>() < HALO_JITTER_CHANCE {
            scatter += unit_direction(rng) * (rng.gen::<f32>() * HALO_JITTER_AMPLITUDE);
        }
        let motion = if is_halo {
            IdleMotion::Halo {
                phase: Vec3::new(
                    rng.gen::<f32>() * TAU,
                    rng.gen::<f32>() * TAU,
                    rng.gen::<f32>() * TAU,
                ),
            }
        } else {
            IdleMotion::Core {
                phase: rng.gen::<f32>() * TAU,
            }
        };
        points.push(FormationPoint {
            assembled,
            scatter,
            motion,
            seed: rng.gen(),
        });
    }
    points
}

/// Derive a per-subsystem RNG from a base seed so each population can be
/// reseeded independently.
pub fn seeded_rng(seed: u64, stream: u64) -> StdRng {
    let mix = seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}
