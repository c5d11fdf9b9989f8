/// In-memory element tree and SVG serializer
use std::fmt::Write as _;

use crate::surface::{NodeId, Surface, SurfaceError};

#[derive(Debug)]
struct Node {
    tag: String,
    // Insertion-ordered so serialization is deterministic
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// A [`Surface`] holding its element tree in memory, with an SVG string
/// serializer. The bundled backend for tests and offline rendering.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: Vec<Node>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> Result<&Node, SurfaceError> {
        self.nodes.get(id.0).ok_or(SurfaceError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SurfaceError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(SurfaceError::UnknownNode(id))
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0).and_then(|n| {
            n.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Serialize the subtree rooted at `root` as an SVG fragment.
    pub fn to_svg_string(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.write_node(root, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
        }
        if node.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for &child in &node.children {
                self.write_node(child, out);
            }
            let _ = write!(out, "</{}>", node.tag);
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

impl Surface for MemorySurface {
    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), SurfaceError> {
        let node = self.node_mut(node)?;
        match node.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), SurfaceError> {
        let node = self.node_mut(node)?;
        node.attributes.retain(|(key, _)| key != name);
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError> {
        self.node(parent)?;
        // Detach from any previous parent first
        if let Some(old_parent) = self.node(child)?.parent {
            self.node_mut(old_parent)?.children.retain(|&id| id != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SurfaceError> {
        let children = &mut self.node_mut(parent)?.children;
        let Some(position) = children.iter().position(|&id| id == child) else {
            return Err(SurfaceError::NotAChild { parent, child });
        };
        children.remove(position);
        self.node_mut(child)?.parent = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_insertion_order() {
        let mut surface = MemorySurface::new();
        let node = surface.create_element("path");
        surface.set_attribute(node, "fill", "white").unwrap();
        surface.set_attribute(node, "stroke", "black").unwrap();
        surface.set_attribute(node, "fill", "red").unwrap();
        assert_eq!(surface.attribute(node, "fill"), Some("red"));
        assert_eq!(surface.to_svg_string(node), "<path fill=\"red\" stroke=\"black\"/>");
    }

    #[test]
    fn test_remove_attribute() {
        let mut surface = MemorySurface::new();
        let node = surface.create_element("path");
        surface.set_attribute(node, "d", "M0 0").unwrap();
        surface.remove_attribute(node, "d").unwrap();
        assert_eq!(surface.attribute(node, "d"), None);
    }

    #[test]
    fn test_append_and_remove_child() {
        let mut surface = MemorySurface::new();
        let root = surface.create_element("svg");
        let child = surface.create_element("rect");
        surface.append_child(root, child).unwrap();
        assert_eq!(surface.parent(child), Some(root));
        assert_eq!(surface.to_svg_string(root), "<svg><rect/></svg>");

        surface.remove_child(root, child).unwrap();
        assert_eq!(surface.parent(child), None);
        assert_eq!(surface.to_svg_string(root), "<svg/>");
    }

    #[test]
    fn test_reparenting_detaches_first() {
        let mut surface = MemorySurface::new();
        let a = surface.create_element("g");
        let b = surface.create_element("g");
        let child = surface.create_element("path");
        surface.append_child(a, child).unwrap();
        surface.append_child(b, child).unwrap();
        assert!(surface.children(a).is_empty());
        assert_eq!(surface.children(b), &[child]);
    }

    #[test]
    fn test_remove_child_not_a_child() {
        let mut surface = MemorySurface::new();
        let root = surface.create_element("svg");
        let stray = surface.create_element("path");
        assert_eq!(
            surface.remove_child(root, stray),
            Err(SurfaceError::NotAChild {
                parent: root,
                child: stray,
            })
        );
    }

    #[test]
    fn test_unknown_node() {
        let mut surface = MemorySurface::new();
        let ghost = NodeId(42);
        assert_eq!(
            surface.set_attribute(ghost, "d", ""),
            Err(SurfaceError::UnknownNode(ghost))
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let mut surface = MemorySurface::new();
        let node = surface.create_element("image");
        surface
            .set_attribute(node, "href", "a.png?x=\"1\"&y=<2>")
            .unwrap();
        assert_eq!(
            surface.to_svg_string(node),
            "<image href=\"a.png?x=&quot;1&quot;&amp;y=&lt;2>\"/>"
        );
    }
}
