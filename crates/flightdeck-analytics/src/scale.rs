//! Clamped continuous scales mapping metric values to pixel coordinates.

use serde::Serialize;

use crate::bounds::Bounds;

/// Left inset of the x range.
pub const X_INSET_START: f64 = 20.0;
/// Right inset of the x range.
pub const X_INSET_END: f64 = 100.0;
/// Bottom inset of the y range.
pub const Y_INSET_BOTTOM: f64 = 40.0;
/// Top inset of the y range.
pub const Y_INSET_TOP: f64 = 100.0;

/// Linear scale from `domain` onto `range`, clamped to the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Vertical axis: larger values sit higher (smaller pixel y).
    #[must_use]
    pub fn y_axis(bounds: &Bounds, height: f64) -> Self {
        Self::new(
            (bounds.min, bounds.max),
            (height - Y_INSET_BOTTOM, Y_INSET_TOP),
        )
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        interpolate(self.domain, self.range, value)
    }
}

/// Power scale `sign(v) * |v|^exponent`, interpolated linearly in the
/// transformed space and clamped to the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowScale {
    pub exponent: f64,
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl PowScale {
    #[must_use]
    pub const fn new(exponent: f64, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            exponent,
            domain,
            range,
        }
    }

    /// Horizontal axis with exponent `4 * avg / max`.
    ///
    /// Skewed populations (a few large values) get a compressive exponent.
    /// Falls back to a linear exponent when `max` is zero or the ratio is
    /// not a usable number.
    #[must_use]
    pub fn x_axis(bounds: &Bounds, width: f64) -> Self {
        let ratio = 4.0 * bounds.avg / bounds.max;
        let exponent = if bounds.max == 0.0 || !ratio.is_finite() || ratio <= 0.0 {
            1.0
        } else {
            ratio
        };
        Self::new(
            exponent,
            (bounds.min, bounds.max),
            (X_INSET_START, width - X_INSET_END),
        )
    }

    fn transform(&self, value: f64) -> f64 {
        value.signum() * value.abs().powf(self.exponent)
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let domain = (self.transform(self.domain.0), self.transform(self.domain.1));
        interpolate(domain, self.range, self.transform(value))
    }
}

/// Map `value` from `domain` onto `range`, clamped. A degenerate domain
/// maps everything to the range start.
fn interpolate(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let (d0, d1) = domain;
    let (r0, r1) = range;
    let span = d1 - d0;
    if span == 0.0 || !span.is_finite() || !value.is_finite() {
        return r0;
    }
    let t = ((value - d0) / span).clamp(0.0, 1.0);
    (r1 - r0).mul_add(t, r0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn bounds(min: f64, max: f64, avg: f64) -> Bounds {
        Bounds {
            min,
            max,
            avg,
            unique: vec![min, max],
        }
    }

    #[test]
    fn linear_maps_and_clamps() {
        let scale = LinearScale::new((0.0, 10.0), (600.0, 100.0));
        assert!(close(scale.apply(0.0), 600.0));
        assert!(close(scale.apply(5.0), 350.0));
        assert!(close(scale.apply(10.0), 100.0));
        assert!(close(scale.apply(50.0), 100.0));
        assert!(close(scale.apply(-3.0), 600.0));
    }

    #[test]
    fn y_axis_is_inverted_with_insets() {
        let scale = LinearScale::y_axis(&bounds(1.0, 6.0, 3.0), 640.0);
        assert!(close(scale.apply(1.0), 600.0));
        assert!(close(scale.apply(6.0), 100.0));
    }

    #[test]
    fn x_axis_exponent_from_average() {
        let scale = PowScale::x_axis(&bounds(0.0, 100.0, 10.0), 1280.0);
        assert!(close(scale.exponent, 0.4));
        assert!(close(scale.apply(0.0), 20.0));
        assert!(close(scale.apply(100.0), 1180.0));
        // Compressive exponent pushes small values right of linear.
        let linear_mid = 20.0 + 0.1 * 1160.0;
        assert!(scale.apply(10.0) > linear_mid);
    }

    #[test]
    fn x_axis_zero_max_falls_back_to_linear() {
        let scale = PowScale::x_axis(&bounds(-4.0, 0.0, -2.0), 1280.0);
        assert!(close(scale.exponent, 1.0));
        assert!(close(scale.apply(-2.0), 600.0));
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let scale = LinearScale::new((3.0, 3.0), (600.0, 100.0));
        assert!(close(scale.apply(3.0), 600.0));
        let pow = PowScale::new(2.0, (0.0, 0.0), (20.0, 1180.0));
        assert!(close(pow.apply(0.0), 20.0));
    }
}
