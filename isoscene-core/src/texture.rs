/// Surface-pattern descriptors and placement transforms
use nalgebra::{Point2, Vector2, Vector3};

use crate::plane::{PlaneView, RotationAxis};
use crate::point::IsoPoint;
use crate::projection::{round6, Projection};

/// Pattern-square scale factor, sqrt(1.5) rounded to the emission
/// precision. The matrix columns divide by this literal while the
/// emitted scale term multiplies by the full-precision root; the two
/// disagree in the 7th decimal and the split is intentional.
const PATTERN_SCALE: f64 = 1.224745;

/// A repeating surface pattern mapped onto a shape's face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    pub url: String,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub scale: Option<f64>,
    pub pixelated: bool,
    pub plane_view: Option<PlaneView>,
    pub shift: Option<TextureShift>,
    pub rotation: Option<TextureRotation>,
}

/// Pattern offset along the logical axes, in shape units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextureShift {
    pub right: Option<f64>,
    pub left: Option<f64>,
    pub top: Option<f64>,
}

/// Pattern rotation around one logical axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRotation {
    pub axis: RotationAxis,
    pub value: f64,
}

/// Field-wise patch applied by texture updates. Present fields replace
/// the current value; `shift` is merged per axis; `rotation` is replaced
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct TexturePatch {
    pub url: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub scale: Option<f64>,
    pub pixelated: Option<bool>,
    pub plane_view: Option<PlaneView>,
    pub shift: Option<TextureShift>,
    pub rotation: Option<TextureRotation>,
}

impl Texture {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Merge a patch into this texture.
    pub fn merge(&mut self, patch: TexturePatch) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(height) = patch.height {
            self.height = Some(height);
        }
        if let Some(width) = patch.width {
            self.width = Some(width);
        }
        if let Some(scale) = patch.scale {
            self.scale = Some(scale);
        }
        if let Some(pixelated) = patch.pixelated {
            self.pixelated = pixelated;
        }
        if let Some(plane_view) = patch.plane_view {
            self.plane_view = Some(plane_view);
        }
        if let Some(shift) = patch.shift {
            let merged = self.shift.get_or_insert_with(TextureShift::default);
            if shift.right.is_some() {
                merged.right = shift.right;
            }
            if shift.left.is_some() {
                merged.left = shift.left;
            }
            if shift.top.is_some() {
                merged.top = shift.top;
            }
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = Some(rotation);
        }
    }
}

/// Compose the placement transform for a pattern anchored at `corner`.
///
/// Always starts with a translate to the corner adjusted by the shift
/// (projected with zero center, so it is a pure pixel offset). A known
/// plane view -- from the texture itself or the owning shape's
/// `fallback_plane` -- adds the plane's skew matrix and a scale term;
/// without one only the translate (and a non-unit raw scale) survive.
pub fn pattern_transform(
    corner: Point2<f64>,
    texture: &Texture,
    fallback_plane: Option<PlaneView>,
    projection: &Projection,
) -> String {
    let shift = texture.shift.unwrap_or_default();
    let shift_px = Projection::offset(projection.scale).project(&IsoPoint::new(
        shift.right.unwrap_or(0.0),
        shift.left.unwrap_or(0.0),
        shift.top.unwrap_or(0.0),
    ));
    let mut transform = format!(
        "translate({} {})",
        round6(corner.x + shift_px.x),
        round6(corner.y + shift_px.y)
    );

    let texture_scale = texture.scale.unwrap_or(1.0);
    match texture.plane_view.or(fallback_plane) {
        Some(plane) => {
            let m = plane_matrix(plane, texture.rotation);
            transform.push_str(&format!(" matrix({},{},{},{},0,0)", m[0], m[1], m[2], m[3]));
            transform.push_str(&format!(
                " scale({})",
                round6(texture_scale * 1.5f64.sqrt())
            ));
        }
        None if texture_scale != 1.0 => {
            transform.push_str(&format!(" scale({})", round6(texture_scale)));
        }
        None => {}
    }
    transform
}

/// Projected lengths of the world axes in pattern space. The three
/// constructors reach the same values along different float paths;
/// which one a rotation takes depends on the plane and axis, and the
/// choice is visible in the sixth decimal of the emitted coefficients.
#[derive(Debug, Clone, Copy)]
struct AxisScales {
    qx: f64,
    qy: f64,
    qt: f64,
}

/// Base path: numerators over the emission-precision scale literal.
fn base_scales() -> AxisScales {
    AxisScales {
        qx: (3.0f64.sqrt() / 2.0) / PATTERN_SCALE,
        qy: 0.5 / PATTERN_SCALE,
        qt: 1.0 / PATTERN_SCALE,
    }
}

/// Rounded-literal numerator throughout, as the screen projection uses.
fn literal_scales() -> AxisScales {
    AxisScales {
        qx: 0.866025 / PATTERN_SCALE,
        qy: 0.5 / PATTERN_SCALE,
        qt: 1.0 / PATTERN_SCALE,
    }
}

/// Full-precision roots throughout.
fn exact_scales() -> AxisScales {
    let iso = 1.5f64.sqrt();
    AxisScales {
        qx: 3.0f64.sqrt() / 2.0 / iso,
        qy: 0.5 / iso,
        qt: 1.0 / iso,
    }
}

/// Front-face rotations keep exact in-plane lengths but the literal
/// vertical drop.
fn front_scales() -> AxisScales {
    AxisScales {
        qt: 1.0 / PATTERN_SCALE,
        ..exact_scales()
    }
}

/// The axis perpendicular to a plane face.
fn plane_normal(plane: PlaneView) -> RotationAxis {
    match plane {
        PlaneView::Top => RotationAxis::Top,
        PlaneView::Side => RotationAxis::Left,
        PlaneView::Front => RotationAxis::Right,
    }
}

/// The 2x2 matrix mapping the unit pattern square onto a plane face,
/// optionally pre-rotated around a logical axis.
///
/// A rotation around the face's own normal spins the projected columns
/// in screen space; any other axis rotates the world basis before
/// projection. Each arm picks the `AxisScales` path that keeps its
/// coefficient strings stable.
fn plane_matrix(plane: PlaneView, rotation: Option<TextureRotation>) -> [f64; 4] {
    let (u, v) = plane_basis(plane);
    let rotation = match rotation {
        Some(rotation) => rotation,
        None => {
            let c1 = project_axes(u, base_scales());
            let c2 = project_axes(v, base_scales());
            return [round6(c1.x), round6(c1.y), round6(c2.x), round6(c2.y)];
        }
    };
    let radians = rotation.value.to_radians();
    let s = round6(radians.sin());
    let c = round6(radians.cos());
    if rotation.axis == plane_normal(plane) {
        return spin_columns(plane, u, v, s, c);
    }
    let scales = match (plane, rotation.axis) {
        (_, RotationAxis::Top) => literal_scales(),
        (PlaneView::Front, _) => front_scales(),
        _ => exact_scales(),
    };
    let c1 = project_axes(rotate_axis(u, rotation.axis, s, c), scales);
    let c2 = project_axes(rotate_axis(v, rotation.axis, s, c), scales);
    [round6(c1.x), round6(c1.y), round6(c2.x), round6(c2.y)]
}

/// Rotate the projected basis columns inside the face plane. Top and
/// side faces spin the coefficients as emitted (rounded); the front
/// face spins them at full precision.
fn spin_columns(
    plane: PlaneView,
    u: Vector3<f64>,
    v: Vector3<f64>,
    s: f64,
    c: f64,
) -> [f64; 4] {
    let (c1, c2) = match plane {
        PlaneView::Front => (
            project_axes(u, front_scales()),
            project_axes(v, front_scales()),
        ),
        _ => {
            let c1 = project_axes(u, base_scales());
            let c2 = project_axes(v, base_scales());
            (
                Vector2::new(round6(c1.x), round6(c1.y)),
                Vector2::new(round6(c2.x), round6(c2.y)),
            )
        }
    };
    [
        round6(c * c1.x + s * c2.x),
        round6(c * c1.y + s * c2.y),
        round6(-s * c1.x + c * c2.x),
        round6(-s * c1.y + c * c2.y),
    ]
}

/// Pattern-space basis directions of each plane, in world (r, l, t) axes.
/// The pattern's u axis runs along the face's screen-horizontal edge and
/// v along the other edge, matching the shapes' winding.
fn plane_basis(plane: PlaneView) -> (Vector3<f64>, Vector3<f64>) {
    match plane {
        PlaneView::Top => (Vector3::new(0.0, -1.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        PlaneView::Front => (Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
        PlaneView::Side => (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
    }
}

/// Rotate a world vector around one logical axis. Sine and cosine
/// arrive pre-rounded to the emission precision so coefficient strings
/// stay reproducible across platforms.
fn rotate_axis(w: Vector3<f64>, axis: RotationAxis, s: f64, c: f64) -> Vector3<f64> {
    match axis {
        RotationAxis::Top => Vector3::new(c * w.x - s * w.y, s * w.x + c * w.y, w.z),
        RotationAxis::Right => Vector3::new(w.x, c * w.y - s * w.z, s * w.y + c * w.z),
        RotationAxis::Left => Vector3::new(c * w.x + s * w.z, w.y, -s * w.x + c * w.z),
    }
}

/// Project a world vector into pattern space.
fn project_axes(w: Vector3<f64>, scales: AxisScales) -> Vector2<f64> {
    Vector2::new(
        (w.x - w.y) * scales.qx,
        (w.x + w.y) * scales.qy - w.z * scales.qt,
    )
}
