/// Isoscene SVG Library
///
/// Scene container and figure rendering on top of isoscene-core. A
/// [`Scene`] owns a [`Surface`] (an abstract svg node store) plus the
/// projection context, and renders [`Figure`]s into it. The bundled
/// [`MemorySurface`] keeps the tree in memory and serializes it to an
/// svg string.
pub mod memory;
pub mod scene;
pub mod shapes;
pub mod style;
pub mod surface;

pub use memory::MemorySurface;
pub use scene::{Scene, SceneProps};
pub use shapes::{CircleShape, Figure, Graphic, PathShape, RectangleShape};
pub use style::{LineCap, LineJoin, Style};
pub use surface::{NodeId, Surface, SurfaceError};
