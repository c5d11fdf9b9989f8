/// Isoscene Core Library - isometric projection and path generation
///
/// This library provides the stateless core for 2D isometric rendering:
/// 3-axis coordinate projection, drawing-command parsing, vector-path
/// assembly, plane primitives, and texture placement transforms.

pub mod command;
pub mod path;
pub mod plane;
pub mod point;
pub mod projection;
pub mod shape;
pub mod texture;

// Re-export commonly used types
pub use command::{parse_commands, PathCommand};
pub use path::{build_path, texture_corner, EllipseArc, NO_GEOMETRY_CORNER};
pub use plane::{PlaneView, RotationAxis};
pub use point::IsoPoint;
pub use projection::{round6, Projection};
pub use shape::{circle_path, rectangle_commands};
pub use texture::{pattern_transform, Texture, TexturePatch, TextureRotation, TextureShift};
