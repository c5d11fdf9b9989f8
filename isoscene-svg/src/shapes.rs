/// Figures: path, rectangle and circle shapes drawn onto a surface
use isoscene_core::{
    build_path, circle_path, parse_commands, pattern_transform, rectangle_commands,
    texture_corner, IsoPoint, PathCommand, PlaneView, Projection, Texture, TexturePatch,
};
use log::debug;
use nalgebra::Point2;

use crate::scene::Scene;
use crate::style::{LineCap, LineJoin, Style};
use crate::surface::{NodeId, Surface, SurfaceError};

#[derive(Debug)]
struct PatternNodes {
    pattern: NodeId,
    image: NodeId,
    id: String,
}

/// Styling and pattern state composed into every figure kind.
///
/// Holds the figure's path element, its style values, and the optional
/// texture with its pattern/image elements. Each style setter is an
/// explicit command: it updates the stored value and writes the matching
/// attribute in the same call.
#[derive(Debug)]
pub struct Graphic {
    element: NodeId,
    style: Style,
    texture: Option<Texture>,
    pattern: Option<PatternNodes>,
}

impl Graphic {
    pub fn new(surface: &mut dyn Surface) -> Result<Self, SurfaceError> {
        let element = surface.create_element("path");
        let graphic = Self {
            element,
            style: Style::default(),
            texture: None,
            pattern: None,
        };
        graphic.apply_style(surface)?;
        Ok(graphic)
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn pattern_node(&self) -> Option<NodeId> {
        self.pattern.as_ref().map(|nodes| nodes.pattern)
    }

    pub fn pattern_id(&self) -> Option<&str> {
        self.pattern.as_ref().map(|nodes| nodes.id.as_str())
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    fn fill_value(&self) -> String {
        match &self.pattern {
            Some(nodes) => format!("url(#{}) {}", nodes.id, self.style.fill_color),
            None => self.style.fill_color.clone(),
        }
    }

    fn apply_style(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        surface.set_attribute(self.element, "fill", &self.fill_value())?;
        surface.set_attribute(self.element, "fill-opacity", &self.style.fill_opacity.to_string())?;
        surface.set_attribute(self.element, "stroke", &self.style.stroke_color)?;
        surface.set_attribute(self.element, "stroke-dasharray", &self.style.dash_array_string())?;
        surface.set_attribute(self.element, "stroke-linecap", self.style.stroke_linecap.as_str())?;
        surface.set_attribute(self.element, "stroke-linejoin", self.style.stroke_linejoin.as_str())?;
        surface.set_attribute(self.element, "stroke-opacity", &self.style.stroke_opacity.to_string())?;
        surface.set_attribute(self.element, "stroke-width", &self.style.stroke_width.to_string())
    }

    pub fn set_fill_color(
        &mut self,
        surface: &mut dyn Surface,
        value: impl Into<String>,
    ) -> Result<(), SurfaceError> {
        self.style.fill_color = value.into();
        surface.set_attribute(self.element, "fill", &self.fill_value())
    }

    pub fn set_fill_opacity(
        &mut self,
        surface: &mut dyn Surface,
        value: f64,
    ) -> Result<(), SurfaceError> {
        self.style.fill_opacity = value;
        surface.set_attribute(self.element, "fill-opacity", &value.to_string())
    }

    pub fn set_stroke_color(
        &mut self,
        surface: &mut dyn Surface,
        value: impl Into<String>,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_color = value.into();
        surface.set_attribute(self.element, "stroke", &self.style.stroke_color)
    }

    pub fn set_stroke_dash_array(
        &mut self,
        surface: &mut dyn Surface,
        value: Vec<f64>,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_dash_array = value;
        surface.set_attribute(self.element, "stroke-dasharray", &self.style.dash_array_string())
    }

    pub fn set_stroke_linecap(
        &mut self,
        surface: &mut dyn Surface,
        value: LineCap,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_linecap = value;
        surface.set_attribute(self.element, "stroke-linecap", value.as_str())
    }

    pub fn set_stroke_linejoin(
        &mut self,
        surface: &mut dyn Surface,
        value: LineJoin,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_linejoin = value;
        surface.set_attribute(self.element, "stroke-linejoin", value.as_str())
    }

    pub fn set_stroke_opacity(
        &mut self,
        surface: &mut dyn Surface,
        value: f64,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_opacity = value;
        surface.set_attribute(self.element, "stroke-opacity", &value.to_string())
    }

    pub fn set_stroke_width(
        &mut self,
        surface: &mut dyn Surface,
        value: f64,
    ) -> Result<(), SurfaceError> {
        self.style.stroke_width = value;
        surface.set_attribute(self.element, "stroke-width", &value.to_string())
    }

    /// Create the pattern and image elements for a fresh texture.
    fn install_texture(
        &mut self,
        surface: &mut dyn Surface,
        texture: Texture,
        id: String,
    ) -> Result<(), SurfaceError> {
        let pattern = surface.create_element("pattern");
        surface.set_attribute(pattern, "id", &id)?;
        surface.set_attribute(pattern, "preserveAspectRatio", "none")?;
        surface.set_attribute(pattern, "patternUnits", "userSpaceOnUse")?;

        let image = surface.create_element("image");
        surface.set_attribute(image, "href", &texture.url)?;
        surface.set_attribute(image, "x", "0")?;
        surface.set_attribute(image, "y", "0")?;
        surface.set_attribute(image, "preserveAspectRatio", "none")?;
        if texture.pixelated {
            surface.set_attribute(image, "style", "image-rendering: pixelated")?;
        }
        surface.append_child(pattern, image)?;

        debug!("installed pattern {}", id);
        self.texture = Some(texture);
        self.pattern = Some(PatternNodes { pattern, image, id });
        surface.set_attribute(self.element, "fill", &self.fill_value())
    }

    /// Replace the texture wholesale and refresh the image element.
    fn replace_texture(
        &mut self,
        surface: &mut dyn Surface,
        texture: Texture,
    ) -> Result<(), SurfaceError> {
        self.texture = Some(texture);
        self.refresh_image(surface)
    }

    /// Merge a patch into the current texture and refresh the image
    /// element.
    fn merge_texture(
        &mut self,
        surface: &mut dyn Surface,
        patch: TexturePatch,
    ) -> Result<(), SurfaceError> {
        if let Some(texture) = &mut self.texture {
            texture.merge(patch);
        }
        self.refresh_image(surface)
    }

    fn refresh_image(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        let (Some(texture), Some(nodes)) = (&self.texture, &self.pattern) else {
            return Ok(());
        };
        surface.set_attribute(nodes.image, "href", &texture.url)?;
        if texture.pixelated {
            surface.set_attribute(nodes.image, "style", "image-rendering: pixelated")
        } else {
            surface.remove_attribute(nodes.image, "style")
        }
    }

    /// Recompute the pattern placement for the given anchor corner.
    fn update_pattern(
        &self,
        surface: &mut dyn Surface,
        corner: Point2<f64>,
        fallback_plane: Option<PlaneView>,
        projection: &Projection,
    ) -> Result<(), SurfaceError> {
        let (Some(texture), Some(nodes)) = (&self.texture, &self.pattern) else {
            return Ok(());
        };
        let transform = pattern_transform(corner, texture, fallback_plane, projection);
        let height = texture
            .height
            .map(|value| (value * projection.scale).to_string())
            .unwrap_or_else(|| "100%".to_string());
        let width = texture
            .width
            .map(|value| (value * projection.scale).to_string())
            .unwrap_or_else(|| "100%".to_string());
        surface.set_attribute(nodes.pattern, "patternTransform", &transform)?;
        surface.set_attribute(nodes.pattern, "height", &height)?;
        surface.set_attribute(nodes.pattern, "width", &width)?;
        surface.set_attribute(nodes.image, "height", &height)?;
        surface.set_attribute(nodes.image, "width", &width)
    }
}

/// Behavior shared by every figure kind: recompute geometry against a
/// surface and projection, or drop it. Dispatch is by variant, not by
/// inheritance; shared state lives in the composed [`Graphic`].
pub trait Figure {
    fn graphic(&self) -> &Graphic;
    fn graphic_mut(&mut self) -> &mut Graphic;

    /// Recompute and write this figure's geometry and pattern placement.
    fn update(
        &mut self,
        surface: &mut dyn Surface,
        projection: &Projection,
    ) -> Result<(), SurfaceError>;

    /// Drop the figure's geometry, leaving the element attached.
    fn clear(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError>;

    fn element(&self) -> NodeId {
        self.graphic().element()
    }

    fn pattern(&self) -> Option<NodeId> {
        self.graphic().pattern_node()
    }

    /// Attach a texture, creating its pattern elements on first use.
    fn set_texture<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        texture: Texture,
    ) -> Result<(), SurfaceError>
    where
        Self: Sized,
    {
        if self.graphic().has_texture() {
            self.graphic_mut().replace_texture(scene.surface_mut(), texture)?;
        } else {
            let id = scene.allocate_pattern_id();
            self.graphic_mut()
                .install_texture(scene.surface_mut(), texture, id)?;
            if let Some(pattern) = self.pattern() {
                if scene.is_attached(self.element()) {
                    scene.attach_pattern(self.element(), pattern)?;
                }
            }
        }
        let projection = scene.projection();
        self.update(scene.surface_mut(), &projection)
    }

    /// Merge-patch the texture. Without an existing texture the patch
    /// must carry a url to have any effect.
    fn update_texture<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        patch: TexturePatch,
    ) -> Result<(), SurfaceError>
    where
        Self: Sized,
    {
        if self.graphic().has_texture() {
            self.graphic_mut().merge_texture(scene.surface_mut(), patch)?;
            let projection = scene.projection();
            self.update(scene.surface_mut(), &projection)
        } else if let Some(url) = patch.url {
            let texture = Texture {
                url,
                height: patch.height,
                width: patch.width,
                scale: patch.scale,
                pixelated: patch.pixelated.unwrap_or(false),
                plane_view: patch.plane_view,
                shift: patch.shift,
                rotation: patch.rotation,
            };
            self.set_texture(scene, texture)
        } else {
            Ok(())
        }
    }
}

fn refresh<S: Surface, F: Figure>(
    figure: &mut F,
    scene: &mut Scene<S>,
) -> Result<(), SurfaceError> {
    let projection = scene.projection();
    figure.update(scene.surface_mut(), &projection)
}

/// A free-form path shape built from drawing commands.
#[derive(Debug)]
pub struct PathShape {
    graphic: Graphic,
    commands: Vec<PathCommand>,
    autoclose: bool,
}

impl PathShape {
    pub fn new(surface: &mut dyn Surface) -> Result<Self, SurfaceError> {
        Ok(Self {
            graphic: Graphic::new(surface)?,
            commands: Vec::new(),
            autoclose: true,
        })
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn autoclose(&self) -> bool {
        self.autoclose
    }

    /// Replace the stored operations with a parsed command string.
    pub fn draw<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        commands: &str,
    ) -> Result<&mut Self, SurfaceError> {
        self.commands = parse_commands(commands);
        refresh(self, scene)?;
        Ok(self)
    }

    pub fn move_to<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        right: f64,
        left: f64,
        top: f64,
    ) -> Result<&mut Self, SurfaceError> {
        self.commands
            .push(PathCommand::Move(IsoPoint::new(right, left, top)));
        refresh(self, scene)?;
        Ok(self)
    }

    pub fn line_to<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        right: f64,
        left: f64,
        top: f64,
    ) -> Result<&mut Self, SurfaceError> {
        self.commands
            .push(PathCommand::Line(IsoPoint::new(right, left, top)));
        refresh(self, scene)?;
        Ok(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn curve_to<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        control_right: f64,
        control_left: f64,
        control_top: f64,
        right: f64,
        left: f64,
        top: f64,
    ) -> Result<&mut Self, SurfaceError> {
        self.commands.push(PathCommand::Curve {
            control: IsoPoint::new(control_right, control_left, control_top),
            end: IsoPoint::new(right, left, top),
        });
        refresh(self, scene)?;
        Ok(self)
    }

    pub fn set_autoclose<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        autoclose: bool,
    ) -> Result<(), SurfaceError> {
        self.autoclose = autoclose;
        refresh(self, scene)
    }

    /// Convert a raw command string to a path string under the given
    /// context, without touching this shape's stored operations. Timed
    /// animation values are built from this.
    pub fn path_from_commands(&self, commands: &str, projection: &Projection) -> String {
        build_path(&parse_commands(commands), projection, self.autoclose)
    }
}

impl Figure for PathShape {
    fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    fn update(
        &mut self,
        surface: &mut dyn Surface,
        projection: &Projection,
    ) -> Result<(), SurfaceError> {
        let d = build_path(&self.commands, projection, self.autoclose);
        surface.set_attribute(self.graphic.element(), "d", &d)?;
        let corner = texture_corner(&self.commands, projection);
        self.graphic.update_pattern(surface, corner, None, projection)
    }

    fn clear(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        self.commands.clear();
        surface.set_attribute(self.graphic.element(), "d", "")
    }
}

/// A rectangle lying on one of the three planes.
#[derive(Debug)]
pub struct RectangleShape {
    graphic: Graphic,
    plane: PlaneView,
    width: f64,
    height: f64,
    position: IsoPoint,
}

impl RectangleShape {
    pub fn new(
        surface: &mut dyn Surface,
        plane: PlaneView,
        width: f64,
        height: f64,
    ) -> Result<Self, SurfaceError> {
        Ok(Self {
            graphic: Graphic::new(surface)?,
            plane,
            width,
            height,
            position: IsoPoint::origin(),
        })
    }

    pub fn plane(&self) -> PlaneView {
        self.plane
    }

    pub fn position(&self) -> IsoPoint {
        self.position
    }

    pub fn set_plane_view<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        plane: PlaneView,
    ) -> Result<(), SurfaceError> {
        self.plane = plane;
        refresh(self, scene)
    }

    pub fn set_width<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        width: f64,
    ) -> Result<(), SurfaceError> {
        self.width = width;
        refresh(self, scene)
    }

    pub fn set_height<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        height: f64,
    ) -> Result<(), SurfaceError> {
        self.height = height;
        refresh(self, scene)
    }

    pub fn set_right<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        right: f64,
    ) -> Result<(), SurfaceError> {
        self.position.right = right;
        refresh(self, scene)
    }

    pub fn set_left<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        left: f64,
    ) -> Result<(), SurfaceError> {
        self.position.left = left;
        refresh(self, scene)
    }

    pub fn set_top<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        top: f64,
    ) -> Result<(), SurfaceError> {
        self.position.top = top;
        refresh(self, scene)
    }
}

impl Figure for RectangleShape {
    fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    fn update(
        &mut self,
        surface: &mut dyn Surface,
        projection: &Projection,
    ) -> Result<(), SurfaceError> {
        let commands = rectangle_commands(self.plane, self.width, self.height, self.position);
        let d = build_path(&commands, projection, true);
        surface.set_attribute(self.graphic.element(), "d", &d)?;
        let corner = texture_corner(&commands, projection);
        self.graphic
            .update_pattern(surface, corner, Some(self.plane), projection)
    }

    fn clear(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        surface.set_attribute(self.graphic.element(), "d", "")
    }
}

/// A circle lying on one of the three planes, rendered as an ellipse.
#[derive(Debug)]
pub struct CircleShape {
    graphic: Graphic,
    plane: PlaneView,
    radius: f64,
    position: IsoPoint,
}

impl CircleShape {
    pub fn new(
        surface: &mut dyn Surface,
        plane: PlaneView,
        radius: f64,
    ) -> Result<Self, SurfaceError> {
        Ok(Self {
            graphic: Graphic::new(surface)?,
            plane,
            radius,
            position: IsoPoint::origin(),
        })
    }

    pub fn plane(&self) -> PlaneView {
        self.plane
    }

    pub fn set_plane_view<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        plane: PlaneView,
    ) -> Result<(), SurfaceError> {
        self.plane = plane;
        refresh(self, scene)
    }

    pub fn set_radius<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        radius: f64,
    ) -> Result<(), SurfaceError> {
        self.radius = radius;
        refresh(self, scene)
    }

    pub fn set_right<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        right: f64,
    ) -> Result<(), SurfaceError> {
        self.position.right = right;
        refresh(self, scene)
    }

    pub fn set_left<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        left: f64,
    ) -> Result<(), SurfaceError> {
        self.position.left = left;
        refresh(self, scene)
    }

    pub fn set_top<S: Surface>(
        &mut self,
        scene: &mut Scene<S>,
        top: f64,
    ) -> Result<(), SurfaceError> {
        self.position.top = top;
        refresh(self, scene)
    }

    /// Arc endpoints of the outline, used as the pattern anchor
    /// candidates.
    fn endpoints(&self) -> [IsoPoint; 2] {
        match self.plane {
            PlaneView::Top | PlaneView::Front => [
                self.position.translate(0.0, self.radius, 0.0),
                self.position.translate(0.0, -self.radius, 0.0),
            ],
            PlaneView::Side => [
                self.position.translate(-self.radius, 0.0, 0.0),
                self.position.translate(self.radius, 0.0, 0.0),
            ],
        }
    }
}

impl Figure for CircleShape {
    fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    fn update(
        &mut self,
        surface: &mut dyn Surface,
        projection: &Projection,
    ) -> Result<(), SurfaceError> {
        let d = circle_path(self.plane, self.radius, self.position, projection);
        surface.set_attribute(self.graphic.element(), "d", &d)?;
        let commands: Vec<PathCommand> = self
            .endpoints()
            .iter()
            .map(|&point| PathCommand::Move(point))
            .collect();
        let corner = texture_corner(&commands, projection);
        self.graphic
            .update_pattern(surface, corner, Some(self.plane), projection)
    }

    fn clear(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        surface.set_attribute(self.graphic.element(), "d", "")
    }
}
