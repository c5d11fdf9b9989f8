/// Logical 3-axis coordinates

/// A position in the right/left/top oblique coordinate space.
///
/// Units are shape-local, not pixels; the conversion to screen space
/// happens in [`crate::projection::Projection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoPoint {
    pub right: f64,
    pub left: f64,
    pub top: f64,
}

impl IsoPoint {
    pub fn new(right: f64, left: f64, top: f64) -> Self {
        Self { right, left, top }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Offset this point along each logical axis.
    pub fn translate(&self, right: f64, left: f64, top: f64) -> Self {
        Self::new(self.right + right, self.left + left, self.top + top)
    }
}

impl Default for IsoPoint {
    fn default() -> Self {
        Self::origin()
    }
}
