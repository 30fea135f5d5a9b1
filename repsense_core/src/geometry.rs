//! Null-safe 2-D geometry over landmark positions.
//!
//! Both functions accept absent points and resolve every degenerate case to
//! a fixed default, so a dropped landmark can never fail an evaluator.

use crate::Point;

/// Angle reported when the angle cannot be measured: "fully open"
pub const OPEN_ANGLE_DEG: f64 = 180.0;

/// Angle at vertex `b` between rays b→a and b→c, in degrees within [0, 180].
///
/// Returns [`OPEN_ANGLE_DEG`] when any point is absent or either ray has
/// zero length.
pub fn angle_between(a: Option<Point>, b: Option<Point>, c: Option<Point>) -> f64 {
    let (Some(a), Some(b), Some(c)) = (a, b, c) else {
        return OPEN_ANGLE_DEG;
    };

    let (abx, aby) = (a.x - b.x, a.y - b.y);
    let (cbx, cby) = (c.x - b.x, c.y - b.y);
    let mag_ab = abx.hypot(aby);
    let mag_cb = cbx.hypot(cby);
    if mag_ab == 0.0 || mag_cb == 0.0 {
        return OPEN_ANGLE_DEG;
    }

    let cos = ((abx * cbx + aby * cby) / (mag_ab * mag_cb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Euclidean distance in normalized space; 0 when either point is absent.
pub fn distance(a: Option<Point>, b: Option<Point>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (a.x - b.x).hypot(a.y - b.y),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Option<Point> {
        Some(Point::new(x, y))
    }

    #[test]
    fn test_angle_defaults_when_point_missing() {
        assert_eq!(angle_between(None, p(0.0, 0.0), p(1.0, 0.0)), 180.0);
        assert_eq!(angle_between(p(0.0, 1.0), None, p(1.0, 0.0)), 180.0);
        assert_eq!(angle_between(p(0.0, 1.0), p(0.0, 0.0), None), 180.0);
    }

    #[test]
    fn test_angle_defaults_for_zero_length_rays() {
        assert_eq!(angle_between(p(0.3, 0.3), p(0.3, 0.3), p(0.3, 0.3)), 180.0);
        assert_eq!(angle_between(p(0.3, 0.3), p(0.3, 0.3), p(0.9, 0.1)), 180.0);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_between(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_symmetric_in_outer_points() {
        let cases = [
            (p(0.1, 0.9), p(0.4, 0.5), p(0.8, 0.7)),
            (p(0.5, 0.2), p(0.5, 0.5), p(0.52, 0.8)),
            (p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)),
        ];
        for (a, b, c) in cases {
            assert_eq!(angle_between(a, b, c), angle_between(c, b, a));
        }
    }

    #[test]
    fn test_collinear_points() {
        let straight = angle_between(p(0.0, 0.0), p(0.5, 0.5), p(1.0, 1.0));
        assert!((straight - 180.0).abs() < 1e-6);

        let folded = angle_between(p(1.0, 1.0), p(0.0, 0.0), p(2.0, 2.0));
        assert!(folded.abs() < 1e-6);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(None, p(1.0, 1.0)), 0.0);
        assert_eq!(distance(p(1.0, 1.0), None), 0.0);
        assert!((distance(p(0.0, 0.0), p(0.3, 0.4)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_distance_triangle_inequality() {
        let points = [p(0.1, 0.2), p(0.9, 0.4), p(0.5, 0.95), p(0.33, 0.33)];
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    assert!(distance(a, c) <= distance(a, b) + distance(b, c) + 1e-12);
                }
            }
        }
    }
}
