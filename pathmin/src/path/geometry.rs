// this_file: pathmin/src/path/geometry.rs

//! Numerical geometry used by the curve rewrites.
//!
//! Cubic segments are handled in their own relative frame: the start point
//! sits at the origin and the six coordinates are the two control points
//! and the end point.

/// Arc detection thresholds. `threshold` scales the coordinate error for
/// the fit tolerance floor, `tolerance` is a percentage of the candidate
/// radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MakeArcs {
    pub threshold: f64,
    pub tolerance: f64,
}

impl Default for MakeArcs {
    fn default() -> Self {
        Self {
            threshold: 2.5,
            tolerance: 0.5,
        }
    }
}

/// A circle candidate fitted to a cubic, in the cubic's relative frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
}

/// Euclidean distance between two points.
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    f64::hypot(a[0] - b[0], a[1] - b[1])
}

/// Reflects `point` through `base`.
pub fn reflect(point: [f64; 2], base: [f64; 2]) -> [f64; 2] {
    [2.0 * base[0] - point[0], 2.0 * base[1] - point[1]]
}

/// Intersects the line through (`p1`, `p2`) with the line through
/// (`p3`, `p4`). Parallel lines and non-finite solutions yield `None`.
pub fn line_intersection(
    p1: [f64; 2],
    p2: [f64; 2],
    p3: [f64; 2],
    p4: [f64; 2],
) -> Option<[f64; 2]> {
    // implicit line equation coefficients a·x + b·y + c = 0
    let a1 = p1[1] - p2[1];
    let b1 = p2[0] - p1[0];
    let c1 = p1[0] * p2[1] - p2[0] * p1[1];
    let a2 = p3[1] - p4[1];
    let b2 = p4[0] - p3[0];
    let c2 = p3[0] * p4[1] - p4[0] * p3[1];
    let denom = a1 * b2 - a2 * b1;
    if denom == 0.0 {
        return None;
    }
    let cross = [
        (b1 * c2 - b2 * c1) / denom,
        (a1 * c2 - a2 * c1) / -denom,
    ];
    if !cross[0].is_finite() || !cross[1].is_finite() {
        return None;
    }
    Some(cross)
}

/// Evaluates a cubic Bézier with `p0` at the origin at parameter `t`.
pub fn cubic_point(curve: &[f64; 6], t: f64) -> [f64; 2] {
    let mt = 1.0 - t;
    let b1 = 3.0 * mt * mt * t;
    let b2 = 3.0 * mt * t * t;
    let b3 = t * t * t;
    [
        b1 * curve[0] + b2 * curve[2] + b3 * curve[4],
        b1 * curve[1] + b2 * curve[3] + b3 * curve[5],
    ]
}

/// Whether the control quadrilateral of a cubic is convex: the diagonals
/// must intersect strictly inside it.
pub fn is_convex(curve: &[f64; 6]) -> bool {
    let Some(center) = line_intersection(
        [0.0, 0.0],
        [curve[2], curve[3]],
        [curve[0], curve[1]],
        [curve[4], curve[5]],
    ) else {
        return false;
    };
    (curve[2] < center[0]) == (center[0] < 0.0)
        && (curve[3] < center[1]) == (center[1] < 0.0)
        && (curve[4] < center[0]) == (center[0] < curve[0])
        && (curve[5] < center[1]) == (center[1] < curve[1])
}

/// Whether every control point lies within `error` of the chord from the
/// origin to the end point. Degenerate curves ending at the origin fail.
pub fn is_curve_straight(data: &[f64], error: f64) -> bool {
    // chord line a·x + b·y = 0 through the origin and the end point
    let mut i = data.len() - 2;
    let a = -data[i + 1];
    let b = data[i];
    let d = 1.0 / (a * a + b * b);
    if i <= 1 || !d.is_finite() {
        return false;
    }
    while i >= 2 {
        i -= 2;
        if ((a * data[i] + b * data[i + 1]).powi(2) * d).sqrt() > error {
            return false;
        }
    }
    true
}

fn fit_tolerance(radius: f64, make_arcs: &MakeArcs, error: f64) -> f64 {
    f64::min(make_arcs.threshold * error, make_arcs.tolerance * radius / 100.0)
}

/// Fits a circle to a cubic by intersecting the perpendicular bisectors of
/// its two half-chords, then verifies the fit by sampling.
pub fn find_circle(curve: &[f64; 6], make_arcs: &MakeArcs, error: f64) -> Option<Circle> {
    let mid = cubic_point(curve, 0.5);
    let m1 = [mid[0] / 2.0, mid[1] / 2.0];
    let m2 = [(mid[0] + curve[4]) / 2.0, (mid[1] + curve[5]) / 2.0];
    let center = line_intersection(
        m1,
        [m1[0] + m1[1], m1[1] - m1[0]],
        m2,
        [m2[0] + (m2[1] - mid[1]), m2[1] - (m2[0] - mid[0])],
    )?;
    let radius = distance([0.0, 0.0], center);
    if !(radius < 1e15) {
        return None;
    }
    let tolerance = fit_tolerance(radius, make_arcs, error);
    for t in [0.25, 0.75] {
        if (distance(cubic_point(curve, t), center) - radius).abs() > tolerance {
            return None;
        }
    }
    Some(Circle { center, radius })
}

/// Whether the cubic stays on `circle` at the sampled parameters.
pub fn is_arc(curve: &[f64; 6], circle: &Circle, make_arcs: &MakeArcs, error: f64) -> bool {
    let tolerance = fit_tolerance(circle.radius, make_arcs, error);
    [0.0, 0.25, 0.5, 0.75, 1.0].iter().all(|&t| {
        (distance(cubic_point(curve, t), circle.center) - circle.radius).abs() <= tolerance
    })
}

/// [`is_arc`] for the cubic preceding the one `circle` was fitted to, with
/// the center shifted into that cubic's frame.
pub fn is_arc_prev(curve: &[f64; 6], circle: &Circle, make_arcs: &MakeArcs, error: f64) -> bool {
    let shifted = Circle {
        center: [circle.center[0] + curve[4], circle.center[1] + curve[5]],
        radius: circle.radius,
    };
    is_arc(curve, &shifted, make_arcs, error)
}

/// Angle subtended by a cubic against a circle given in the cubic's frame.
pub fn arc_angle(curve: &[f64; 6], rel_circle: &Circle) -> f64 {
    let x1 = -rel_circle.center[0];
    let y1 = -rel_circle.center[1];
    let x2 = curve[4] - rel_circle.center[0];
    let y2 = curve[5] - rel_circle.center[1];
    ((x1 * x2 + y1 * y2) / ((x1 * x1 + y1 * y1) * (x2 * x2 + y2 * y2)).sqrt()).acos()
}

/// Sagitta of an arc command. Defined only for near-equal radii with the
/// large-arc flag unset and a chord that fits the circle.
pub fn sagitta(args: &[f64]) -> Option<f64> {
    if args[3] == 1.0 {
        return None;
    }
    let (rx, ry) = (args[0], args[1]);
    if (rx - ry).abs() > 1e-3 {
        return None;
    }
    let chord = f64::hypot(args[5], args[6]);
    if chord > 2.0 * rx {
        return None;
    }
    Some(rx - (rx * rx - chord * chord / 4.0).sqrt())
}
