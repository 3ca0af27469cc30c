//! Circle size and colour for a plotted ticket.

/// Fixed categorical palette, indexed by the colour metric's value.
pub const PALETTE: [&str; 6] = ["#bbb", "#2ca02c", "#98df8a", "#bd9e39", "#ff7f0e", "#d62728"];

/// Ceiling of the ordinal rating scale.
const RATING_CEILING: f64 = 6.0;

/// Circle radius for a ticket.
///
/// The mapping is inverted: a *lower* rating yields a *larger* circle
/// (`5 + 3 * (6 - own)`), so low-complexity items stand out. `gate` is the
/// value used to decide whether the ticket gets a circle at all (usually
/// the dependency-propagated value); zero or non-finite means no circle.
/// Ratings above the ceiling cannot produce a negative radius.
#[must_use]
pub fn radius(gate: f64, own: f64) -> f64 {
    if gate == 0.0 || !gate.is_finite() {
        return 0.0;
    }
    3.0f64.mul_add(RATING_CEILING - own, 5.0).max(0.0)
}

/// Palette index for `value`: rounded, then clamped into range.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn color_index(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let last = (PALETTE.len() - 1) as f64;
    value.round().clamp(0.0, last) as usize
}

#[must_use]
pub fn color(value: f64) -> &'static str {
    PALETTE[color_index(value)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_ratings_draw_larger_circles() {
        assert!((radius(2.0, 2.0) - 17.0).abs() < f64::EPSILON);
        assert!((radius(1.0, 1.0) - 20.0).abs() < f64::EPSILON);
        assert!(radius(1.0, 1.0) > radius(5.0, 5.0));
    }

    #[test]
    fn zero_gate_has_no_circle() {
        assert!(radius(0.0, 4.0).abs() < f64::EPSILON);
        assert!(radius(f64::NAN, 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gate_and_radius_may_differ() {
        // Own value 0 but dependencies contribute: gated in, full size.
        assert!((radius(3.0, 0.0) - 23.0).abs() < f64::EPSILON);
    }

    #[test]
    fn radius_never_negative() {
        assert!(radius(40.0, 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn color_clamps_to_palette() {
        assert_eq!(color(0.0), "#bbb");
        assert_eq!(color(3.0), "#bd9e39");
        assert_eq!(color(2.6), "#bd9e39");
        assert_eq!(color(-4.0), "#bbb");
        assert_eq!(color(99.0), "#d62728");
        assert_eq!(color(f64::INFINITY), "#bbb");
    }
}
