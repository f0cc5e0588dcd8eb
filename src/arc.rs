//! Elliptic arc maths: endpoint-to-center parameterization and conversion
//! to quadratic bézier curves.

use std::f64::consts::{FRAC_PI_4, PI};

use crate::math::{point, vector, Angle, Point, Rotation, Vector};

/// Flag parameters for arcs as described by the SVG specification.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArcFlags {
    /// Pick the larger of the two arcs joining the endpoints.
    pub large_arc: bool,
    /// Sweep in the direction of increasing angles.
    pub sweep: bool,
}

/// An elliptic arc in SVG's endpoint parameterization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SvgArc {
    pub from: Point,
    pub to: Point,
    pub radii: Vector,
    pub x_rotation: Angle,
    pub flags: ArcFlags,
}

/// An elliptic arc in center parameterization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radii: Vector,
    pub start_angle: Angle,
    pub sweep_angle: Angle,
    pub x_rotation: Angle,
}

impl SvgArc {
    /// Whether the arc's endpoints coincide. Per the SVG grammar such an arc
    /// draws nothing.
    pub fn is_zero_length(&self) -> bool {
        self.from == self.to
    }

    /// Whether the arc degenerates to a straight line because one of the
    /// radii is zero.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x == 0.0 || self.radii.y == 0.0
    }

    pub fn to_arc(&self) -> Arc {
        Arc::from_svg_arc(self)
    }

    /// See `Arc::for_each_quadratic_bezier`.
    pub fn for_each_quadratic_bezier<F>(&self, callback: &mut F)
    where
        F: FnMut(Point, Point),
    {
        Arc::from_svg_arc(self).for_each_quadratic_bezier(callback);
    }
}

impl Arc {
    /// Converts from the SVG endpoint parameterization to a center and a
    /// pair of angles.
    ///
    /// Implements the endpoint-to-center equations of the SVG implementation
    /// notes (F.6.5), including the radii corrections of F.6.6: radii are
    /// taken in absolute value and scaled up by the minimum amount when they
    /// are too small to span the chord, so the conversion always succeeds.
    /// Degenerate arcs (coinciding endpoints or a zero radius) produce an
    /// arc with a zero sweep.
    pub fn from_svg_arc(arc: &SvgArc) -> Arc {
        debug_assert!(!arc.from.x.is_nan());
        debug_assert!(!arc.from.y.is_nan());
        debug_assert!(!arc.to.x.is_nan());
        debug_assert!(!arc.to.y.is_nan());
        debug_assert!(!arc.radii.x.is_nan());
        debug_assert!(!arc.radii.y.is_nan());
        debug_assert!(!arc.x_rotation.radians.is_nan());

        if arc.is_zero_length() || arc.is_straight_line() {
            return Arc {
                center: arc.from,
                radii: arc.radii,
                start_angle: Angle::radians(0.0),
                sweep_angle: Angle::radians(0.0),
                x_rotation: arc.x_rotation,
            };
        }

        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();

        let xr = arc.x_rotation.radians % (2.0 * PI);
        let cos_phi = xr.cos();
        let sin_phi = xr.sin();
        let hd_x = (arc.from.x - arc.to.x) / 2.0;
        let hd_y = (arc.from.y - arc.to.y) / 2.0;
        let hs_x = (arc.from.x + arc.to.x) / 2.0;
        let hs_y = (arc.from.y + arc.to.y) / 2.0;
        // F6.5.1
        let p = point(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        // F6.6: if the radii cannot span the chord, scale them up uniformly
        // by the minimum factor that makes the ellipse fit.
        let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        // F6.5.2, with the root sign picked from the flag combination. The
        // radicand is zero up to rounding when the radii were scaled.
        let sign_coe = if arc.flags.large_arc == arc.flags.sweep {
            -1.0
        } else {
            1.0
        };
        let coe = sign_coe * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();

        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        // F6.5.3
        let center = point(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        // F6.5.5 and F6.5.6: the sweep direction and magnitude follow from
        // the sweep flag, the large arc variant having been selected through
        // the center above.
        let start_v = vector((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let end_v = vector((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = start_v.angle_from_x_axis();

        let mut sweep_angle = (end_v.angle_from_x_axis() - start_angle).radians % (2.0 * PI);
        if arc.flags.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        } else if !arc.flags.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        }

        Arc {
            center,
            radii: vector(rx, ry),
            start_angle,
            sweep_angle: Angle::radians(sweep_angle),
            x_rotation: arc.x_rotation,
        }
    }

    /// Approximates the arc with a sequence of quadratic bézier curves, each
    /// covering at most a 45 degree slice of the ellipse.
    ///
    /// The callback receives the control point and the on-curve end point of
    /// each segment, ordered from the start of the arc. The output is a
    /// deterministic function of the arc parameters.
    pub fn for_each_quadratic_bezier<F>(&self, callback: &mut F)
    where
        F: FnMut(Point, Point),
    {
        let sweep = self.sweep_angle.radians.max(-2.0 * PI).min(2.0 * PI);
        let n_steps = (sweep.abs() / FRAC_PI_4).ceil();
        let step = sweep / n_steps;

        for i in 0..n_steps as i32 {
            let a1 = self.start_angle.radians + step * i as f64;
            let a2 = self.start_angle.radians + step * (i + 1) as f64;

            // The tangents at the two slice endpoints intersect at the point
            // halfway along the slice, pushed out of the unit circle by
            // 1/cos(step/2). Mapping it through the radii and the ellipse
            // rotation gives the control point.
            let mid = (a1 + a2) / 2.0;
            let half = (a2 - a1) / 2.0;
            let ctrl = self.center
                + Rotation::new(self.x_rotation).transform_vector(vector(
                    self.radii.x * (mid.cos() / half.cos()),
                    self.radii.y * (mid.sin() / half.cos()),
                ));
            let to = self.point_at_angle(Angle::radians(a2));

            callback(ctrl, to);
        }
    }

    /// Sample the arc at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        self.point_at_angle(self.start_angle + self.sweep_angle * t)
    }

    pub fn from(&self) -> Point {
        self.point_at_angle(self.start_angle)
    }

    pub fn to(&self) -> Point {
        self.point_at_angle(self.end_angle())
    }

    pub fn end_angle(&self) -> Angle {
        self.start_angle + self.sweep_angle
    }

    fn point_at_angle(&self, angle: Angle) -> Point {
        self.center + sample_ellipse(self.radii, self.x_rotation, angle)
    }
}

fn sample_ellipse(radii: Vector, x_rotation: Angle, angle: Angle) -> Vector {
    Rotation::new(x_rotation).transform_vector(vector(
        radii.x * angle.radians.cos(),
        radii.y * angle.radians.sin(),
    ))
}

#[cfg(test)]
use std::f64::consts::{FRAC_PI_2, FRAC_PI_8};

#[cfg(test)]
fn assert_approx(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{} != {}", actual, expected);
}

#[cfg(test)]
fn assert_point_approx(actual: Point, expected: Point) {
    assert_approx(actual.x, expected.x);
    assert_approx(actual.y, expected.y);
}

#[test]
fn endpoint_to_center_quarter_circle() {
    let arc = SvgArc {
        from: point(100.0, 0.0),
        to: point(0.0, 100.0),
        radii: vector(100.0, 100.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    }
    .to_arc();

    assert_point_approx(arc.center, point(0.0, 0.0));
    assert_approx(arc.radii.x, 100.0);
    assert_approx(arc.radii.y, 100.0);
    assert_approx(arc.start_angle.radians, 0.0);
    assert_approx(arc.sweep_angle.radians, FRAC_PI_2);
    assert_point_approx(arc.from(), point(100.0, 0.0));
    assert_point_approx(arc.to(), point(0.0, 100.0));
}

#[test]
fn endpoint_to_center_large_arc() {
    // Large arc, swept towards negative angles.
    let arc = SvgArc {
        from: point(100.0, 100.0),
        to: point(250.0, -50.0),
        radii: vector(150.0, 150.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags {
            large_arc: true,
            sweep: false,
        },
    }
    .to_arc();

    assert_point_approx(arc.center, point(250.0, 100.0));
    assert_approx(arc.start_angle.radians, PI);
    assert_approx(arc.sweep_angle.radians, -3.0 * FRAC_PI_2);
}

#[test]
fn radii_too_small_are_scaled_up() {
    // The requested radii cannot span the chord. They grow by the minimum
    // factor instead of failing.
    let arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(100.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    }
    .to_arc();

    assert_approx(arc.radii.x, 50.0);
    assert_approx(arc.radii.y, 50.0);
    assert_point_approx(arc.center, point(50.0, 0.0));
    assert_approx(arc.sweep_angle.radians, PI);
}

#[test]
fn quadratic_approximation_half_circle() {
    // Half a circle of radius 100: four 45 degree slices, whose control
    // points sit at distance r/cos(22.5 degrees) from the center.
    let arc = SvgArc {
        from: point(100.0, 0.0),
        to: point(-100.0, 0.0),
        radii: vector(100.0, 100.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let mut segments = Vec::new();
    arc.for_each_quadratic_bezier(&mut |ctrl, to| segments.push((ctrl, to)));

    let t = 100.0 * (FRAC_PI_8.sin() / FRAC_PI_8.cos());
    let d = 100.0 * FRAC_PI_4.cos();
    let expected = [
        (point(100.0, t), point(d, d)),
        (point(t, 100.0), point(0.0, 100.0)),
        (point(-t, 100.0), point(-d, d)),
        (point(-100.0, t), point(-100.0, 0.0)),
    ];

    assert_eq!(segments.len(), expected.len());
    for ((ctrl, to), (expected_ctrl, expected_to)) in segments.iter().zip(expected.iter()) {
        assert_point_approx(*ctrl, *expected_ctrl);
        assert_point_approx(*to, *expected_to);
    }
}

#[test]
fn quadratic_joins_are_control_point_midpoints() {
    // With equal angular slices the on-curve join between two consecutive
    // segments is exactly the midpoint of their control points, which is
    // what lets a whole arc be emitted as one qcurve_to call.
    let arc = SvgArc {
        from: point(100.0, 100.0),
        to: point(250.0, -50.0),
        radii: vector(150.0, 150.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags {
            large_arc: true,
            sweep: false,
        },
    };

    let mut segments = Vec::new();
    arc.for_each_quadratic_bezier(&mut |ctrl, to| segments.push((ctrl, to)));

    assert_eq!(segments.len(), 6);
    for window in segments.windows(2) {
        let (ctrl1, join) = window[0];
        let (ctrl2, _) = window[1];
        assert_point_approx(ctrl1.lerp(ctrl2, 0.5), join);
    }
}

#[test]
fn circle_is_rotation_invariant() {
    let arc = |x_rotation: Angle| SvgArc {
        from: point(100.0, 0.0),
        to: point(0.0, 100.0),
        radii: vector(100.0, 100.0),
        x_rotation,
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let mut segments = Vec::new();
    arc(Angle::radians(0.0)).for_each_quadratic_bezier(&mut |ctrl, to| segments.push((ctrl, to)));

    let mut rotated = Vec::new();
    arc(Angle::degrees(45.0)).for_each_quadratic_bezier(&mut |ctrl, to| rotated.push((ctrl, to)));

    assert_eq!(segments.len(), rotated.len());
    for ((ctrl1, to1), (ctrl2, to2)) in segments.iter().zip(rotated.iter()) {
        assert_point_approx(*ctrl1, *ctrl2);
        assert_point_approx(*to1, *to2);
    }
}

#[test]
fn degenerate_arcs_have_no_sweep() {
    let zero_length = SvgArc {
        from: point(10.0, 10.0),
        to: point(10.0, 10.0),
        radii: vector(50.0, 50.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags::default(),
    };
    assert!(zero_length.is_zero_length());
    assert_eq!(zero_length.to_arc().sweep_angle.radians, 0.0);

    let flat = SvgArc {
        from: point(0.0, 0.0),
        to: point(10.0, 10.0),
        radii: vector(0.0, 50.0),
        x_rotation: Angle::radians(0.0),
        flags: ArcFlags::default(),
    };
    assert!(flat.is_straight_line());
    assert_eq!(flat.to_arc().sweep_angle.radians, 0.0);
}
