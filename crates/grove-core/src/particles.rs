use crate::constants::*;
use crate::formation::{generate_points, seeded_rng};
use rand::Rng;

/// Quality tier controlling the particle population and bloom strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceMode {
    High,
    Medium,
    Low,
}

impl PerformanceMode {
    pub fn population(self) -> usize {
        match self {
            PerformanceMode::High => 6000,
            PerformanceMode::Medium => 4000,
            PerformanceMode::Low => 2000,
        }
    }

    pub fn bloom_strength(self) -> f32 {
        match self {
            PerformanceMode::High => 0.45,
            PerformanceMode::Medium => 0.35,
            PerformanceMode::Low => 0.25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceMode::High => "high",
            PerformanceMode::Medium => "medium",
            PerformanceMode::Low => "low",
        }
    }
}

/// Interleaved per-point vertex attributes. The morph and idle-motion math
/// for these points runs per-vertex in `POINTS_WGSL`; the CPU only generates
/// the static attribute streams.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointAttr {
    pub position: [f32; 3], // assembled home
    pub seed: f32,
    pub scatter_position: [f32; 3],
    pub halo: f32,
    pub color: [f32; 3],
    pub spark: f32,
}

/// CPU side of the particle field: owns the attribute array for the current
/// performance tier. Rebuilding fully regenerates every attribute and bumps
/// the generation counter so the renderer disposes and recreates its buffers.
pub struct ParticleField {
    mode: PerformanceMode,
    attrs: Vec<PointAttr>,
    generation: u64,
}

impl ParticleField {
    pub fn new(mode: PerformanceMode, seed: u64) -> Self {
        Self {
            mode,
            attrs: build_attrs(mode, seed),
            generation: 0,
        }
    }

    pub fn mode(&self) -> PerformanceMode {
        self.mode
    }

    pub fn attrs(&self) -> &[PointAttr] {
        &self.attrs
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Monotonic counter; changes exactly when the population is regenerated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Regenerate the full population for a new tier. The only destructive
    /// operation in the subsystem.
    pub fn rebuild(&mut self, mode: PerformanceMode, seed: u64) {
        self.mode = mode;
        self.attrs = build_attrs(mode, seed);
        self.generation += 1;
        log::info!(
            "[particles] rebuilt population={} mode={}",
            self.attrs.len(),
            mode.label()
        );
    }
}

fn build_attrs(mode: PerformanceMode, seed: u64) -> Vec<PointAttr> {
    let mut rng = seeded_rng(seed, mode.population() as u64);
    let points = generate_points(mode.population(), &mut rng);
    points
        .iter()
        .map(|p| {
            let spark = rng.gen::<f32>() < SPARK_FRACTION;
            let warm = rng.gen::<f32>();
            // warm golds for the core, cooler blues toward the halo
            let color = if spark {
                [1.0, 0.96, 0.88]
            } else if p.motion.is_halo() {
                [0.45 + 0.2 * warm, 0.62 + 0.15 * warm, 0.95]
            } else {
                [1.0, 0.72 + 0.16 * warm, 0.32 + 0.18 * warm]
            };
            PointAttr {
                position: p.assembled.to_array(),
                seed: p.seed,
                scatter_position: p.scatter.to_array(),
                halo: if p.motion.is_halo() { 1.0 } else { 0.0 },
                color,
                spark: if spark { 1.0 } else { 0.0 },
            }
        })
        .collect()
}
