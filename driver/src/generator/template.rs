use std::f32::consts::PI;

/// 0 outside `[start, end]`, 1 inside, with linear edges `ramp` seconds wide.
pub fn burst_envelope(t: f64, start: f64, end: f64, ramp: f64) -> f32 {
    if t < start || t > end {
        return 0.0;
    }
    let edge = (t - start).min(end - t);
    if ramp <= 0.0 || edge >= ramp {
        1.0
    } else {
        (edge / ramp) as f32
    }
}

/// Periodic ripple in `[-1, 1]` at `frequency` Hz.
pub fn ripple(t: f64, frequency: f32) -> f32 {
    (2.0 * PI * frequency * t as f32).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_flat_inside_and_zero_outside() {
        assert_eq!(burst_envelope(0.1, 0.5, 2.5, 0.1), 0.0);
        assert_eq!(burst_envelope(1.5, 0.5, 2.5, 0.1), 1.0);
        assert_eq!(burst_envelope(2.6, 0.5, 2.5, 0.1), 0.0);
        let edge = burst_envelope(0.55, 0.5, 2.5, 0.1);
        assert!(edge > 0.4 && edge < 0.6);
    }
}
