/// Scene context and 3-axis to 2D projection
use nalgebra::Point2;

use crate::point::IsoPoint;

/// Cosine of 30 degrees, pre-rounded to the emission precision. The
/// projection must use this literal rather than `3f64.sqrt() / 2.0`:
/// emitted coordinates are rounded to [`DECIMALS`] places and the
/// full-precision constant lands on the other side of the rounding
/// boundary for some inputs (e.g. right = 2 at scale 120).
pub const COS30: f64 = 0.866025;

/// Sine of 30 degrees.
pub const SIN30: f64 = 0.5;

/// Number of decimal places kept in every emitted coordinate.
pub const DECIMALS: i32 = 6;

/// Round to the emission precision, half away from zero.
///
/// The final `+ 0.0` normalizes a negative zero produced by rounding a
/// tiny negative value, so `Display` never prints `-0`.
pub fn round6(value: f64) -> f64 {
    let factor = 10f64.powi(DECIMALS);
    (value * factor).round() / factor + 0.0
}

/// Shared scene context: pixel scale and projection center.
///
/// Every projection and path computation is parametric in this context,
/// so the same logical coordinates can be re-rendered at a different
/// scale or center without re-parsing commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Projection {
    pub fn new(scale: f64, center_x: f64, center_y: f64) -> Self {
        Self {
            scale,
            center_x,
            center_y,
        }
    }

    /// Zero-centered variant used for pure pixel offsets (texture shifts).
    pub fn offset(scale: f64) -> Self {
        Self::new(scale, 0.0, 0.0)
    }

    /// Project a 3-axis point to 2D screen space.
    ///
    /// The fixed isometric basis puts the right and left axes at 30
    /// degrees from horizontal (opposite directions) and the top axis
    /// straight up; the y axis grows downward. Pure and total: NaN and
    /// infinity inputs propagate into the output.
    pub fn project(&self, point: &IsoPoint) -> Point2<f64> {
        let x = self.center_x + (point.right - point.left) * self.scale * COS30;
        let y = self.center_y + ((point.right + point.left) * SIN30 - point.top) * self.scale;
        Point2::new(round6(x), round6(y))
    }
}

impl Default for Projection {
    fn default() -> Self {
        // Matches the default 640x480 scene at scale 1
        Self::new(1.0, 320.0, 240.0)
    }
}
