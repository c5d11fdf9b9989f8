/// Plane primitives: rectangle and circle outlines
use crate::command::PathCommand;
use crate::path::EllipseArc;
use crate::plane::PlaneView;
use crate::point::IsoPoint;
use crate::projection::{Projection, COS30, SIN30};

/// Four-corner outline of a rectangle lying on one plane, anchored at
/// `origin`, as a move plus three lines (the close marker supplies the
/// fourth edge). Winding is fixed per plane so fill direction is stable.
pub fn rectangle_commands(
    plane: PlaneView,
    width: f64,
    height: f64,
    origin: IsoPoint,
) -> Vec<PathCommand> {
    let corners = match plane {
        PlaneView::Top => [
            origin,
            origin.translate(width, 0.0, 0.0),
            origin.translate(width, height, 0.0),
            origin.translate(0.0, height, 0.0),
        ],
        PlaneView::Front => [
            origin,
            origin.translate(0.0, width, 0.0),
            origin.translate(0.0, width, height),
            origin.translate(0.0, 0.0, height),
        ],
        PlaneView::Side => [
            origin,
            origin.translate(width, 0.0, 0.0),
            origin.translate(width, 0.0, height),
            origin.translate(0.0, 0.0, height),
        ],
    };
    corners
        .iter()
        .enumerate()
        .map(|(index, &corner)| {
            if index == 0 {
                PathCommand::Move(corner)
            } else {
                PathCommand::Line(corner)
            }
        })
        .collect()
}

/// Closed elliptical outline of a circle lying on one plane, anchored at
/// `origin`, as two supplementary 180-degree arcs.
///
/// The ellipse's conjugate semi-diameters are the plane's two projected
/// unit-axis vectors scaled by `radius * scale`; the foreshortening per
/// plane falls out of the same 30-degree basis the projector uses. The
/// outline is rebuilt from scratch on every call.
pub fn circle_path(
    plane: PlaneView,
    radius: f64,
    origin: IsoPoint,
    projection: &Projection,
) -> String {
    let k = radius * projection.scale;
    let right_axis = nalgebra::Vector2::new(COS30 * k, SIN30 * k);
    let left_axis = nalgebra::Vector2::new(-COS30 * k, SIN30 * k);
    let top_axis = nalgebra::Vector2::new(0.0, -k);

    // Arc endpoints sit at +-radius along one logical axis of the plane
    let (u, v, start, end) = match plane {
        PlaneView::Top => (
            right_axis,
            left_axis,
            origin.translate(0.0, radius, 0.0),
            origin.translate(0.0, -radius, 0.0),
        ),
        PlaneView::Front => (
            left_axis,
            top_axis,
            origin.translate(0.0, radius, 0.0),
            origin.translate(0.0, -radius, 0.0),
        ),
        PlaneView::Side => (
            right_axis,
            top_axis,
            origin.translate(-radius, 0.0, 0.0),
            origin.translate(radius, 0.0, 0.0),
        ),
    };

    let arc = EllipseArc::from_conjugate_diameters(u, v);
    let start = projection.project(&start);
    let end = projection.project(&end);
    format!(
        "M{} {} A {} {} {} 0 0 {} {} A {} {} {} 0 0 {} {}z",
        start.x,
        start.y,
        arc.rx,
        arc.ry,
        arc.rotation,
        end.x,
        end.y,
        arc.rx,
        arc.ry,
        arc.opposite_rotation(),
        start.x,
        start.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::build_path;

    fn ctx() -> Projection {
        Projection::new(120.0, 250.0, 160.0)
    }

    fn rectangle_path(plane: PlaneView, width: f64, height: f64, origin: IsoPoint) -> String {
        build_path(&rectangle_commands(plane, width, height, origin), &ctx(), true)
    }

    #[test]
    fn test_unit_rectangles_per_plane() {
        let origin = IsoPoint::origin();
        assert_eq!(
            rectangle_path(PlaneView::Top, 1.0, 1.0, origin),
            "M250 160 L353.923 220 L250 280 L146.077 220z"
        );
        assert_eq!(
            rectangle_path(PlaneView::Front, 1.0, 1.0, origin),
            "M250 160 L146.077 220 L146.077 100 L250 40z"
        );
        assert_eq!(
            rectangle_path(PlaneView::Side, 1.0, 1.0, origin),
            "M250 160 L353.923 220 L353.923 100 L250 40z"
        );
    }

    #[test]
    fn test_rectangle_dimensions() {
        let origin = IsoPoint::origin();
        assert_eq!(
            rectangle_path(PlaneView::Top, 2.0, 1.0, origin),
            "M250 160 L457.846 280 L353.923 340 L146.077 220z"
        );
        assert_eq!(
            rectangle_path(PlaneView::Top, 2.0, 2.0, origin),
            "M250 160 L457.846 280 L250 400 L42.154 280z"
        );
    }

    #[test]
    fn test_rectangle_winding_is_plane_independent() {
        // Same command count and tags on every plane, only corners differ
        let origin = IsoPoint::origin();
        for plane in [PlaneView::Top, PlaneView::Front, PlaneView::Side] {
            let commands = rectangle_commands(plane, 1.0, 1.0, origin);
            assert_eq!(commands.len(), 4);
            assert!(matches!(commands[0], PathCommand::Move(_)));
            assert!(commands[1..]
                .iter()
                .all(|command| matches!(command, PathCommand::Line(_))));
        }
    }

    #[test]
    fn test_cube_face_rectangles() {
        // The three faces of the canonical unit cube
        assert_eq!(
            rectangle_path(PlaneView::Top, 1.0, 1.0, IsoPoint::new(0.0, 0.0, 1.0)),
            "M250 40 L353.923 100 L250 160 L146.077 100z"
        );
        assert_eq!(
            rectangle_path(PlaneView::Front, 1.0, 1.0, IsoPoint::new(1.0, 0.0, 0.0)),
            "M353.923 220 L250 280 L250 160 L353.923 100z"
        );
        assert_eq!(
            rectangle_path(PlaneView::Side, 1.0, 1.0, IsoPoint::new(0.0, 1.0, 0.0)),
            "M146.077 220 L250 280 L250 160 L146.077 100z"
        );
    }

    #[test]
    fn test_circles_per_plane() {
        let origin = IsoPoint::origin();
        assert_eq!(
            circle_path(PlaneView::Top, 0.5, origin, &ctx()),
            "M198.0385 190 A 73.484658 42.426407 0 0 0 301.9615 130 \
             A 73.484658 42.426407 180 0 0 198.0385 190z"
        );
        assert_eq!(
            circle_path(PlaneView::Front, 0.5, origin, &ctx()),
            "M198.0385 190 A 73.484684 42.426392 119.999977 0 0 301.9615 130 \
             A 73.484684 42.426392 -60.000023 0 0 198.0385 190z"
        );
        assert_eq!(
            circle_path(PlaneView::Side, 0.5, origin, &ctx()),
            "M198.0385 130 A 73.484684 42.426392 60.000023 0 0 301.9615 190 \
             A 73.484684 42.426392 -119.999977 0 0 198.0385 130z"
        );
    }

    #[test]
    fn test_circle_radius() {
        assert_eq!(
            circle_path(PlaneView::Top, 1.0, IsoPoint::origin(), &ctx()),
            "M146.077 220 A 146.969316 84.852814 0 0 0 353.923 100 \
             A 146.969316 84.852814 180 0 0 146.077 220z"
        );
    }

    #[test]
    fn test_circle_position() {
        assert_eq!(
            circle_path(PlaneView::Top, 0.5, IsoPoint::new(0.0, 0.0, 1.0), &ctx()),
            "M198.0385 70 A 73.484658 42.426407 0 0 0 301.9615 10 \
             A 73.484658 42.426407 180 0 0 198.0385 70z"
        );
    }
}
