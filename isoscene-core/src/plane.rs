/// Fixed projection planes and rotation axes

/// One of the three fixed orthographic plane views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneView {
    Top,
    Front,
    Side,
}

/// Logical axis around which a surface pattern may be rotated before
/// placement. Rotation itself is optional, so there is no "none" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    Top,
    Right,
    Left,
}
