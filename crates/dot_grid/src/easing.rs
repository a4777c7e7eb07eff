//! Easing curves for the push and return phases, pure functions of progress in `[0, 1]`.

use core::f32::consts::TAU;

/// Overshoot of the elastic return, 1 means the first swing mirrors the push.
const ELASTIC_AMPLITUDE: f32 = 1.0;
/// Oscillation period of the elastic return, as a fraction of its duration.
const ELASTIC_PERIOD: f32 = 0.75;

/// Constant deceleration: full speed at `u = 0`, at rest at `u = 1`.
pub fn glide_out(u: f32) -> f32 {
    let remaining = 1.0 - u.clamp(0.0, 1.0);
    remaining.mul_add(-remaining, 1.0)
}

/// Exponentially damped sine settling on 1, overshooting it on the way.
pub fn elastic_out(u: f32) -> f32 {
    if u <= 0.0 {
        return 0.0;
    }
    if u >= 1.0 {
        return 1.0;
    }

    let phase_shift = ELASTIC_PERIOD / TAU * (1.0 / ELASTIC_AMPLITUDE).asin();
    let wave = ((u - phase_shift) * TAU / ELASTIC_PERIOD).sin();
    (ELASTIC_AMPLITUDE * 2.0f32.powf(-10.0 * u)).mul_add(wave, 1.0)
}
