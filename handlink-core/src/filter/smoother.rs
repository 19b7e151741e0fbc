//! Exponential moving average
//!
//! `output = alpha * target + (1 - alpha) * previous`, evaluated as
//! `previous + alpha * (target - previous)` so that a target equal to the
//! previous output reproduces it bit for bit. Only the previous output is
//! remembered.

use crate::channel::AngleVector;

/// Default smoothing factor
pub const DEFAULT_ALPHA: f32 = 0.5;

/// Elementwise EMA over angle vectors
///
/// Higher `alpha` tracks faster with more jitter; `alpha = 1` passes the
/// target through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    alpha: f32,
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl Smoother {
    /// Create a smoother; `alpha` is clamped into `[0, 1]`
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        Self { alpha }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn smooth(&self, target: &AngleVector, previous: &AngleVector) -> AngleVector {
        if self.alpha >= 1.0 {
            return *target;
        }
        target.zip_map(previous, |t, p| p + self.alpha * (t - p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point() {
        let smoother = Smoother::new(0.37);
        let v = AngleVector::new([0.0, 12.345, 90.0, 133.7, 180.0]);
        assert_eq!(smoother.smooth(&v, &v), v);
    }

    #[test]
    fn test_alpha_one_is_passthrough() {
        let smoother = Smoother::new(1.0);
        let target = AngleVector::new([1.1, 2.2, 3.3, 4.4, 5.5]);
        let previous = AngleVector::splat(90.0);
        assert_eq!(smoother.smooth(&target, &previous), target);
    }

    #[test]
    fn test_half_alpha() {
        let smoother = Smoother::new(0.5);
        let out = smoother.smooth(&AngleVector::splat(180.0), &AngleVector::splat(90.0));
        assert_eq!(out, AngleVector::splat(135.0));
    }

    #[test]
    fn test_geometric_convergence() {
        let alpha = 0.3;
        let smoother = Smoother::new(alpha);
        let target = AngleVector::splat(180.0);
        let mut current = AngleVector::splat(0.0);
        let mut error = target.max_abs_diff(&current);

        for _ in 0..50 {
            current = smoother.smooth(&target, &current);
            let next_error = target.max_abs_diff(&current);
            // Never overshoots, never moves away
            assert!(next_error <= error);
            assert!((next_error - error * (1.0 - alpha)).abs() < 1e-3);
            error = next_error;
        }
        assert!(error < 1e-3);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Smoother::new(3.0).alpha(), 1.0);
        assert_eq!(Smoother::new(-1.0).alpha(), 0.0);
        assert_eq!(Smoother::new(f32::NAN).alpha(), 1.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_output_between_target_and_previous(
                alpha in 0.01f32..=1.0,
                target in proptest::array::uniform5(0.0f32..180.0),
                previous in proptest::array::uniform5(0.0f32..180.0),
            ) {
                let out = Smoother::new(alpha).smooth(&AngleVector(target), &AngleVector(previous));
                for i in 0..target.len() {
                    let lo = target[i].min(previous[i]) - 1e-3;
                    let hi = target[i].max(previous[i]) + 1e-3;
                    prop_assert!((lo..=hi).contains(&out.0[i]));
                }
            }
        }
    }
}
