/// Scene container: owns the surface, the root svg element and the
/// projection context
use isoscene_core::Projection;
use log::warn;

use crate::shapes::Figure;
use crate::surface::{NodeId, Surface, SurfaceError};

/// Initial scene dimensions and appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneProps {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub background_color: String,
}

impl Default for SceneProps {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            scale: 1.0,
            background_color: "white".to_string(),
        }
    }
}

struct AttachedChild {
    element: NodeId,
    pattern: Option<NodeId>,
}

/// A scene renders figures into an svg element on the surface it owns.
///
/// The projection center is always the midpoint of the viewport. The
/// scene does not own its figures, so the width, height and scale
/// setters take the figures to re-render under the changed projection
/// along with the attribute updates.
pub struct Scene<S: Surface> {
    surface: S,
    root: NodeId,
    background: NodeId,
    props: SceneProps,
    children: Vec<AttachedChild>,
    next_pattern: usize,
}

impl<S: Surface> Scene<S> {
    pub fn new(surface: S) -> Result<Self, SurfaceError> {
        Self::with_props(surface, SceneProps::default())
    }

    pub fn with_props(mut surface: S, props: SceneProps) -> Result<Self, SurfaceError> {
        let root = surface.create_element("svg");
        surface.set_attribute(root, "xmlns", "http://www.w3.org/2000/svg")?;
        let background = surface.create_element("rect");
        surface.set_attribute(background, "x", "0")?;
        surface.set_attribute(background, "y", "0")?;
        surface.append_child(root, background)?;
        let mut scene = Self {
            surface,
            root,
            background,
            props,
            children: Vec::new(),
            next_pattern: 0,
        };
        scene.apply_dimensions()?;
        scene.apply_background()?;
        Ok(scene)
    }

    fn apply_dimensions(&mut self) -> Result<(), SurfaceError> {
        let width = self.props.width;
        let height = self.props.height;
        self.surface
            .set_attribute(self.root, "width", &format!("{width}px"))?;
        self.surface
            .set_attribute(self.root, "height", &format!("{height}px"))?;
        self.surface
            .set_attribute(self.root, "viewBox", &format!("0 0 {width} {height}"))?;
        self.surface
            .set_attribute(self.background, "width", &format!("{width}px"))?;
        self.surface
            .set_attribute(self.background, "height", &format!("{height}px"))
    }

    fn apply_background(&mut self) -> Result<(), SurfaceError> {
        self.surface
            .set_attribute(self.background, "fill", &self.props.background_color)
    }

    /// The projection context derived from the current viewport.
    pub fn projection(&self) -> Projection {
        Projection::new(
            self.props.scale,
            self.props.width / 2.0,
            self.props.height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.props.width
    }

    pub fn height(&self) -> f64 {
        self.props.height
    }

    pub fn scale(&self) -> f64 {
        self.props.scale
    }

    pub fn background_color(&self) -> &str {
        &self.props.background_color
    }

    /// Resize the viewport and re-render the given figures under the
    /// moved projection center.
    pub fn set_width(
        &mut self,
        width: f64,
        figures: &mut [&mut dyn Figure],
    ) -> Result<(), SurfaceError> {
        self.props.width = width;
        self.apply_dimensions()?;
        self.render_children(figures)
    }

    pub fn set_height(
        &mut self,
        height: f64,
        figures: &mut [&mut dyn Figure],
    ) -> Result<(), SurfaceError> {
        self.props.height = height;
        self.apply_dimensions()?;
        self.render_children(figures)
    }

    /// Change the pixel scale and re-render the given figures. The svg
    /// element itself carries no scale attribute.
    pub fn set_scale(
        &mut self,
        scale: f64,
        figures: &mut [&mut dyn Figure],
    ) -> Result<(), SurfaceError> {
        self.props.scale = scale;
        self.render_children(figures)
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) -> Result<(), SurfaceError> {
        self.props.background_color = color.into();
        self.apply_background()
    }

    /// Re-render figures under the current projection context. Figures
    /// that are not attached to this scene are skipped with a warning.
    pub fn render_children(&mut self, figures: &mut [&mut dyn Figure]) -> Result<(), SurfaceError> {
        let projection = self.projection();
        for figure in figures.iter_mut() {
            if !self.is_attached(figure.element()) {
                warn!("render_children: figure is not attached to this scene");
                continue;
            }
            figure.update(&mut self.surface, &projection)?;
        }
        Ok(())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn allocate_pattern_id(&mut self) -> String {
        let id = format!("isoscene-pattern-{}", self.next_pattern);
        self.next_pattern += 1;
        id
    }

    pub(crate) fn is_attached(&self, element: NodeId) -> bool {
        self.children.iter().any(|child| child.element == element)
    }

    /// Attach a pattern created after its figure was already added.
    pub(crate) fn attach_pattern(
        &mut self,
        element: NodeId,
        pattern: NodeId,
    ) -> Result<(), SurfaceError> {
        self.surface.append_child(self.root, pattern)?;
        if let Some(child) = self
            .children
            .iter_mut()
            .find(|child| child.element == element)
        {
            child.pattern = Some(pattern);
        }
        Ok(())
    }

    /// Attach a figure to the scene and render it under the current
    /// projection context.
    pub fn add_child(&mut self, figure: &mut dyn Figure) -> Result<(), SurfaceError> {
        if let Some(pattern) = figure.pattern() {
            self.surface.append_child(self.root, pattern)?;
        }
        self.surface.append_child(self.root, figure.element())?;
        self.children.push(AttachedChild {
            element: figure.element(),
            pattern: figure.pattern(),
        });
        let projection = self.projection();
        figure.update(&mut self.surface, &projection)
    }

    pub fn add_children(&mut self, figures: &mut [&mut dyn Figure]) -> Result<(), SurfaceError> {
        for figure in figures.iter_mut() {
            self.add_child(&mut **figure)?;
        }
        Ok(())
    }

    /// Detach a figure. Removing a figure that is not attached is a
    /// logged no-op.
    pub fn remove_child(&mut self, figure: &dyn Figure) {
        let element = figure.element();
        match self.children.iter().position(|child| child.element == element) {
            Some(index) => self.detach_at(index),
            None => warn!("remove_child: figure is not attached to this scene"),
        }
    }

    /// Detach several figures at once. Each detach follows the
    /// `remove_child` tolerance rules.
    pub fn remove_children(&mut self, figures: &[&dyn Figure]) {
        for figure in figures {
            self.remove_child(*figure);
        }
    }

    /// Detach the figure at `index` in attachment order. Out-of-range
    /// indices are a logged no-op.
    pub fn remove_child_by_index(&mut self, index: usize) {
        if index < self.children.len() {
            self.detach_at(index);
        } else {
            warn!(
                "remove_child_by_index: index {} out of range ({} children)",
                index,
                self.children.len()
            );
        }
    }

    /// Detach every figure, leaving the background in place.
    pub fn clear(&mut self) {
        while !self.children.is_empty() {
            self.detach_at(0);
        }
    }

    fn detach_at(&mut self, index: usize) {
        let child = self.children.remove(index);
        if let Err(error) = self.surface.remove_child(self.root, child.element) {
            warn!("detach: element was already removed: {error}");
        }
        if let Some(pattern) = child.pattern {
            if let Err(error) = self.surface.remove_child(self.root, pattern) {
                warn!("detach: pattern was already removed: {error}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySurface;
    use crate::shapes::{PathShape, RectangleShape};
    use isoscene_core::{PlaneView, Texture};

    fn canvas() -> Scene<MemorySurface> {
        Scene::with_props(
            MemorySurface::new(),
            SceneProps {
                width: 500.0,
                height: 320.0,
                scale: 120.0,
                background_color: "#CCC".to_string(),
            },
        )
        .unwrap()
    }

    fn attr(scene: &Scene<MemorySurface>, node: NodeId, name: &str) -> String {
        scene.surface().attribute(node, name).unwrap_or("").to_string()
    }

    #[test]
    fn test_default_scene_attributes() {
        let scene = Scene::new(MemorySurface::new()).unwrap();
        let root = scene.root();
        assert_eq!(scene.surface().tag(root), Some("svg"));
        assert_eq!(attr(&scene, root, "width"), "640px");
        assert_eq!(attr(&scene, root, "height"), "480px");
        assert_eq!(attr(&scene, root, "viewBox"), "0 0 640 480");

        let background = scene.surface().children(root)[0];
        assert_eq!(scene.surface().tag(background), Some("rect"));
        assert_eq!(attr(&scene, background, "fill"), "white");
        assert_eq!(attr(&scene, background, "width"), "640px");

        let projection = scene.projection();
        assert_eq!(projection.center_x, 320.0);
        assert_eq!(projection.center_y, 240.0);
        assert_eq!(projection.scale, 1.0);
    }

    #[test]
    fn test_custom_props() {
        let scene = canvas();
        assert_eq!(attr(&scene, scene.root(), "width"), "500px");
        assert_eq!(attr(&scene, scene.root(), "height"), "320px");
        assert_eq!(attr(&scene, scene.root(), "viewBox"), "0 0 500 320");
        let projection = scene.projection();
        assert_eq!(projection.center_x, 250.0);
        assert_eq!(projection.center_y, 160.0);
        assert_eq!(projection.scale, 120.0);
    }

    #[test]
    fn test_setters_rerender_attached_children() {
        let mut scene = canvas();
        let mut rectangle =
            RectangleShape::new(scene.surface_mut(), PlaneView::Top, 1.0, 1.0).unwrap();
        scene.add_child(&mut rectangle).unwrap();

        scene.set_scale(60.0, &mut [&mut rectangle]).unwrap();
        assert_eq!(
            attr(&scene, rectangle.element(), "d"),
            "M250 160 L301.9615 190 L250 220 L198.0385 190z"
        );

        // Widening the viewport moves the projection center
        scene.set_width(600.0, &mut [&mut rectangle]).unwrap();
        assert_eq!(attr(&scene, scene.root(), "width"), "600px");
        assert_eq!(attr(&scene, scene.root(), "viewBox"), "0 0 600 320");
        assert_eq!(
            attr(&scene, rectangle.element(), "d"),
            "M300 160 L351.9615 190 L300 220 L248.0385 190z"
        );

        // The background setter repaints the rect and nothing else
        let before = attr(&scene, rectangle.element(), "d");
        scene.set_background_color("#123456").unwrap();
        let background = scene.surface().children(scene.root())[0];
        assert_eq!(attr(&scene, background, "fill"), "#123456");
        assert_eq!(attr(&scene, rectangle.element(), "d"), before);
    }

    #[test]
    fn test_render_children_skips_detached_figures() {
        let mut scene = canvas();
        let mut attached = PathShape::new(scene.surface_mut()).unwrap();
        let mut loose = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut attached).unwrap();
        scene
            .render_children(&mut [&mut attached, &mut loose])
            .unwrap();
        assert_eq!(scene.child_count(), 1);
    }

    #[test]
    fn test_add_child_attaches_and_renders() {
        let mut scene = canvas();
        let mut path = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut path).unwrap();
        path.draw(&mut scene, "M0 0 0 L1 0 0 L1 1 0 L0 1 0").unwrap();
        assert_eq!(scene.surface().parent(path.element()), Some(scene.root()));
        assert_eq!(scene.child_count(), 1);
        let rendered = scene.surface().to_svg_string(scene.root());
        assert!(rendered.contains("M250 160 L353.923 220 L250 280 L146.077 220z"));
    }

    #[test]
    fn test_add_children() {
        let mut scene = canvas();
        let mut top = RectangleShape::new(scene.surface_mut(), PlaneView::Top, 1.0, 1.0).unwrap();
        let mut front =
            RectangleShape::new(scene.surface_mut(), PlaneView::Front, 1.0, 1.0).unwrap();
        scene.add_children(&mut [&mut top, &mut front]).unwrap();
        assert_eq!(scene.child_count(), 2);
    }

    #[test]
    fn test_remove_child_detaches_element_and_pattern() {
        let mut scene = canvas();
        let mut rectangle =
            RectangleShape::new(scene.surface_mut(), PlaneView::Top, 1.0, 1.0).unwrap();
        scene.add_child(&mut rectangle).unwrap();
        rectangle
            .set_texture(&mut scene, Texture::from_url("/images/top.png"))
            .unwrap();
        let pattern = rectangle.pattern().unwrap();

        scene.remove_child(&rectangle);
        assert_eq!(scene.child_count(), 0);
        assert_eq!(scene.surface().parent(rectangle.element()), None);
        assert_eq!(scene.surface().parent(pattern), None);
    }

    #[test]
    fn test_remove_children_batch() {
        let mut scene = canvas();
        let mut top = RectangleShape::new(scene.surface_mut(), PlaneView::Top, 1.0, 1.0).unwrap();
        let mut front =
            RectangleShape::new(scene.surface_mut(), PlaneView::Front, 1.0, 1.0).unwrap();
        let mut side = RectangleShape::new(scene.surface_mut(), PlaneView::Side, 1.0, 1.0).unwrap();
        scene
            .add_children(&mut [&mut top, &mut front, &mut side])
            .unwrap();

        scene.remove_children(&[&top, &front]);
        assert_eq!(scene.child_count(), 1);
        assert_eq!(scene.surface().parent(top.element()), None);
        assert_eq!(scene.surface().parent(front.element()), None);
        assert_eq!(scene.surface().parent(side.element()), Some(scene.root()));

        // A batch containing an already detached figure still removes the rest
        scene.remove_children(&[&top, &side]);
        assert_eq!(scene.child_count(), 0);
    }

    #[test]
    fn test_removing_a_detached_figure_is_tolerated() {
        let mut scene = canvas();
        let mut path = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut path).unwrap();
        scene.remove_child(&path);
        // Same figure again, and an index past the end
        scene.remove_child(&path);
        scene.remove_child_by_index(5);
        assert_eq!(scene.child_count(), 0);
    }

    #[test]
    fn test_remove_child_by_index_follows_attachment_order() {
        let mut scene = canvas();
        let mut first = PathShape::new(scene.surface_mut()).unwrap();
        let mut second = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut first).unwrap();
        scene.add_child(&mut second).unwrap();
        scene.remove_child_by_index(0);
        assert_eq!(scene.child_count(), 1);
        assert_eq!(scene.surface().parent(first.element()), None);
        assert_eq!(scene.surface().parent(second.element()), Some(scene.root()));
    }

    #[test]
    fn test_clear_keeps_background() {
        let mut scene = canvas();
        let mut first = PathShape::new(scene.surface_mut()).unwrap();
        let mut second = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut first).unwrap();
        scene.add_child(&mut second).unwrap();
        scene.clear();
        assert_eq!(scene.child_count(), 0);
        // Background rect stays as the only child of the svg element
        assert_eq!(scene.surface().children(scene.root()).len(), 1);
    }

    #[test]
    fn test_pattern_ids_are_sequential() {
        let mut scene = canvas();
        let mut first = PathShape::new(scene.surface_mut()).unwrap();
        let mut second = PathShape::new(scene.surface_mut()).unwrap();
        scene.add_child(&mut first).unwrap();
        scene.add_child(&mut second).unwrap();
        first
            .set_texture(&mut scene, Texture::from_url("/images/a.png"))
            .unwrap();
        second
            .set_texture(&mut scene, Texture::from_url("/images/b.png"))
            .unwrap();
        assert_eq!(first.graphic().pattern_id(), Some("isoscene-pattern-0"));
        assert_eq!(second.graphic().pattern_id(), Some("isoscene-pattern-1"));
    }
}
