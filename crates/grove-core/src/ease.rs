/// Cubic ease-in-out used for all visual interpolation.
///
/// Monotonic on \[0, 1\] with `ease(0) = 0`, `ease(0.5) = 0.5`, `ease(1) = 1`,
/// so motion accelerates out of one formation and decelerates into the other.
#[inline]
pub fn ease_in_out_cubic(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        let t = -2.0 * x + 2.0;
        1.0 - t * t * t / 2.0
    }
}

/// One step of exponential approach toward `target` at rate `k`.
#[inline]
pub fn approach(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}
