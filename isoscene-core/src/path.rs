/// Vector-path assembly and curve-to-arc conversion
use nalgebra::{Point2, Vector2};

use crate::command::PathCommand;
use crate::projection::{round6, Projection};

/// Anchor coordinate used when a pattern is requested before any geometry
/// exists. Largest integer exactly representable in an f64; preserved for
/// output compatibility.
pub const NO_GEOMETRY_CORNER: f64 = 9007199254740991.0;

/// Radii and x-axis rotation of the ellipse defined by a pair of
/// conjugate semi-diameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseArc {
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl EllipseArc {
    /// Solve the ellipse with conjugate semi-diameters `u` and `v`.
    ///
    /// Rotation is in degrees, normalized into `[0, 180)`. A degenerate
    /// pair (both vectors zero) yields zero radii rather than an error.
    pub fn from_conjugate_diameters(u: Vector2<f64>, v: Vector2<f64>) -> Self {
        let m00 = u.x * u.x + v.x * v.x;
        let m01 = u.x * u.y + v.x * v.y;
        let m11 = u.y * u.y + v.y * v.y;
        let s1 = m00 + m11;
        let s2 = ((m00 - m11) * (m00 - m11) + 4.0 * m01 * m01).sqrt();
        let rx = ((s1 + s2) / 2.0).sqrt();
        let half_minor = (s1 - s2) / 2.0;
        // s2 can exceed s1 by a rounding hair for collinear diameters
        let ry = if half_minor > 0.0 { half_minor.sqrt() } else { 0.0 };
        let mut rotation = ((2.0 * m01).atan2(m00 - m11) / 2.0).to_degrees();
        if rotation < 0.0 {
            rotation += 180.0;
        }
        Self {
            rx: round6(rx),
            ry: round6(ry),
            rotation: round6(rotation),
        }
    }

    /// X-axis rotation of the supplementary 180-degree arc.
    pub fn opposite_rotation(&self) -> f64 {
        if self.rotation > 0.0 {
            self.rotation - 180.0
        } else {
            self.rotation + 180.0
        }
    }
}

/// Assemble a sequence of path operations into a renderable path string.
///
/// The first operation's end point is always emitted as an absolute move,
/// whatever its tag; a leading line or curve therefore produces a move to
/// its own end point followed by the (degenerate) segment. This mirrors
/// observed behavior for sequences with no starting move and is kept
/// as-is. With `autoclose` a close marker is appended without a space.
pub fn build_path(commands: &[PathCommand], projection: &Projection, autoclose: bool) -> String {
    if commands.is_empty() {
        return String::new();
    }

    let start = projection.project(commands[0].point());
    let mut segments = vec![format!("M{} {}", start.x, start.y)];
    let mut current = start;

    for (index, command) in commands.iter().enumerate() {
        match command {
            PathCommand::Move(point) => {
                // The leading move is already emitted
                if index > 0 {
                    current = projection.project(point);
                    segments.push(format!("M{} {}", current.x, current.y));
                }
            }
            PathCommand::Line(point) => {
                current = projection.project(point);
                segments.push(format!("L{} {}", current.x, current.y));
            }
            PathCommand::Curve { control, end } => {
                let control = projection.project(control);
                let end = projection.project(end);
                segments.push(curve_segment(current, control, end));
                current = end;
            }
        }
    }

    let mut path = segments.join(" ");
    if autoclose {
        path.push('z');
    }
    path
}

/// Emit a curve as a 180-degree elliptical arc through the control point.
///
/// The arc's ellipse has conjugate semi-diameters from the control point
/// to each endpoint; control == endpoint degenerates to a zero-radius arc.
fn curve_segment(start: Point2<f64>, control: Point2<f64>, end: Point2<f64>) -> String {
    let u = control - end;
    let v = control - start;
    let arc = EllipseArc::from_conjugate_diameters(u, v);
    let sweep = if u.x * v.y - u.y * v.x > 0.0 { 1 } else { 0 };
    format!(
        "A {} {} {} 0 {} {} {}",
        arc.rx, arc.ry, arc.rotation, sweep, end.x, end.y
    )
}

/// The pattern anchor for a command sequence: the leftmost projected
/// point (ties broken by the smaller y). An empty sequence anchors at
/// [`NO_GEOMETRY_CORNER`] on both axes.
pub fn texture_corner(commands: &[PathCommand], projection: &Projection) -> Point2<f64> {
    commands
        .iter()
        .map(|command| projection.project(command.point()))
        .fold(
            Point2::new(NO_GEOMETRY_CORNER, NO_GEOMETRY_CORNER),
            |corner, point| {
                if point.x < corner.x || (point.x == corner.x && point.y < corner.y) {
                    point
                } else {
                    corner
                }
            },
        )
}
