//! Pure proximity math behind the magnetic hover effect.
//!
//! Everything here is stateless: identical inputs give bit-identical
//! outputs. Falloff is linear in the distance from the target's nearest
//! edge, and the final offset is hard-capped at `max_offset` in a separate
//! stage, so the tuning constants can shape the curve without ever
//! pushing a target past its ceiling.

use serde::{Deserialize, Serialize};

use super::geometry::{Offset, Point, Rect};

/// Per-category tuning for the magnetic pull.
///
/// The four numbers scale one shared formula; they never change its shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnetTuning {
    /// Distance from the edge (px) beyond which there is no pull.
    pub radius: f64,
    /// Hard ceiling on the offset magnitude (px).
    pub max_offset: f64,
    pub pull_factor: f64,
    pub intensity_multiplier: f64,
}

impl MagnetTuning {
    pub const fn new(
        radius: f64,
        max_offset: f64,
        pull_factor: f64,
        intensity_multiplier: f64,
    ) -> Self {
        MagnetTuning {
            radius,
            max_offset,
            pull_factor,
            intensity_multiplier,
        }
    }
}

/// Euclidean distance from `point` to the nearest edge of `rect`.
/// Zero when the point is inside or on the boundary.
pub fn distance_from_edge(rect: &Rect, point: Point) -> f64 {
    let dx = (rect.left - point.x).max(point.x - rect.right).max(0.0);
    let dy = (rect.top - point.y).max(point.y - rect.bottom).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// Linear falloff: 1 at the edge, 0 at `radius` and beyond.
pub fn intensity(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    ((radius - distance) / radius).clamp(0.0, 1.0)
}

/// Offset pulling the target toward the pointer.
///
/// Returns [`Offset::ZERO`] when the pointer is at or beyond the radius, or
/// exactly at the rectangle's center (where the direction is undefined).
pub fn pull_vector(rect: &Rect, point: Point, tuning: &MagnetTuning) -> Offset {
    let distance = distance_from_edge(rect, point);
    if distance >= tuning.radius {
        return Offset::ZERO;
    }

    let center = rect.center();
    let delta_x = point.x - center.x;
    let delta_y = point.y - center.y;
    let to_center = (delta_x * delta_x + delta_y * delta_y).sqrt();
    if to_center == 0.0 {
        return Offset::ZERO;
    }

    let unit_x = delta_x / to_center;
    let unit_y = delta_y / to_center;
    let strength = tuning.max_offset
        * intensity(distance, tuning.radius)
        * tuning.pull_factor
        * tuning.intensity_multiplier;

    Offset::new(unit_x * strength, unit_y * strength).clamp_magnitude(tuning.max_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Rect {
        Rect::new(100.0, 100.0, 140.0, 140.0)
    }

    fn tuning(pull_factor: f64, multiplier: f64) -> MagnetTuning {
        MagnetTuning::new(100.0, 12.0, pull_factor, multiplier)
    }

    #[test]
    fn distance_is_zero_inside_and_on_edge() {
        assert_eq!(distance_from_edge(&square(), Point::new(120.0, 120.0)), 0.0);
        assert_eq!(distance_from_edge(&square(), Point::new(100.0, 140.0)), 0.0);
    }

    #[test]
    fn distance_uses_clamped_axis_gaps() {
        // Straight right of the box
        assert_eq!(distance_from_edge(&square(), Point::new(220.0, 120.0)), 80.0);
        // Diagonal from the bottom-right corner: 3-4-5
        assert_eq!(distance_from_edge(&square(), Point::new(143.0, 144.0)), 5.0);
    }

    #[test]
    fn pointer_right_of_target_pulls_right() {
        let offset = pull_vector(&square(), Point::new(220.0, 120.0), &tuning(1.0, 1.0));
        // intensity 0.2 * max 12 = 2.4, pointing +x
        assert!((offset.dx - 2.4).abs() < 1e-9);
        assert_eq!(offset.dy, 0.0);
    }

    #[test]
    fn strong_multiplier_is_capped_at_max_offset() {
        let offset = pull_vector(&square(), Point::new(220.0, 120.0), &tuning(1.0, 10.0));
        assert!(offset.dx > 0.0);
        assert!((offset.magnitude() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn far_pointer_has_no_pull() {
        let offset = pull_vector(&square(), Point::new(500.0, 500.0), &tuning(1.0, 1.0));
        assert_eq!(offset, Offset::ZERO);
    }

    #[test]
    fn pull_is_zero_exactly_at_radius() {
        let offset = pull_vector(&square(), Point::new(240.0, 120.0), &tuning(1.0, 1.0));
        assert_eq!(offset, Offset::ZERO);
    }

    #[test]
    fn pointer_at_center_is_zero_not_nan() {
        let offset = pull_vector(&square(), Point::new(120.0, 120.0), &tuning(1.0, 1.0));
        assert_eq!(offset, Offset::ZERO);

        // Degenerate zero-size target with the pointer sitting on it
        let dot = Rect::new(50.0, 50.0, 50.0, 50.0);
        let offset = pull_vector(&dot, Point::new(50.0, 50.0), &tuning(1.0, 1.0));
        assert!(!offset.dx.is_nan() && !offset.dy.is_nan());
        assert_eq!(offset, Offset::ZERO);
    }

    #[test]
    fn falloff_is_monotonic_in_distance() {
        let t = tuning(0.5, 1.0);
        let mut previous = f64::INFINITY;
        for step in 0..=120 {
            let x = 140.0 + step as f64;
            let magnitude = pull_vector(&square(), Point::new(x, 120.0), &t).magnitude();
            assert!(
                magnitude <= previous,
                "pull grew from {previous} to {magnitude} at x={x}"
            );
            previous = magnitude;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn magnitude_never_exceeds_ceiling() {
        let t = MagnetTuning::new(500.0, 3.0, 1e6, 1e6);
        for (x, y) in [(141.0, 120.0), (0.0, 0.0), (300.0, -50.0), (120.0, 141.0)] {
            let offset = pull_vector(&square(), Point::new(x, y), &t);
            assert!(offset.magnitude() <= 3.0 + 1e-9);
        }
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let t = tuning(0.08, 15.0);
        let p = Point::new(171.3, 88.25);
        let a = pull_vector(&square(), p, &t);
        let b = pull_vector(&square(), p, &t);
        assert_eq!(a.dx.to_bits(), b.dx.to_bits());
        assert_eq!(a.dy.to_bits(), b.dy.to_bits());
    }

    #[test]
    fn intensity_bounds() {
        assert_eq!(intensity(0.0, 60.0), 1.0);
        assert_eq!(intensity(60.0, 60.0), 0.0);
        assert_eq!(intensity(90.0, 60.0), 0.0);
        assert_eq!(intensity(5.0, 0.0), 0.0);
        assert!((intensity(30.0, 60.0) - 0.5).abs() < 1e-12);
    }
}
