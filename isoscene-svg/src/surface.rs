/// Rendering-surface capability boundary
use thiserror::Error;

/// Handle to an element owned by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// The capabilities a rendering backend must provide.
///
/// Scenes and shapes are written against this trait only; they stay
/// testable without any real rendering target. Implementations decide
/// what an element is -- an in-memory node, a DOM handle, a retained
/// display-list entry.
pub trait Surface {
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str)
        -> Result<(), SurfaceError>;
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), SurfaceError>;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError>;
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError>;
}
