/// Example: Render an isometric cube and print the svg markup
///
/// Usage: cargo run --example cube

use isoscene_core::PlaneView;
use isoscene_svg::{Figure, MemorySurface, RectangleShape, Scene, SceneProps};

fn main() -> Result<(), isoscene_svg::SurfaceError> {
    let props = SceneProps {
        width: 500.0,
        height: 320.0,
        scale: 120.0,
        background_color: "#CCC".to_string(),
    };
    let mut scene = Scene::with_props(MemorySurface::new(), props)?;

    let mut top = RectangleShape::new(scene.surface_mut(), PlaneView::Top, 1.0, 1.0)?;
    let mut right = RectangleShape::new(scene.surface_mut(), PlaneView::Front, 1.0, 1.0)?;
    let mut left = RectangleShape::new(scene.surface_mut(), PlaneView::Side, 1.0, 1.0)?;

    scene.add_children(&mut [&mut top, &mut right, &mut left])?;

    // Lift the top face onto the cube and tint each face
    top.set_top(&mut scene, 1.0)?;
    right.set_right(&mut scene, 1.0)?;
    left.set_left(&mut scene, 1.0)?;
    top.graphic_mut().set_fill_color(scene.surface_mut(), "#EEE")?;
    right.graphic_mut().set_fill_color(scene.surface_mut(), "#999")?;
    left.graphic_mut().set_fill_color(scene.surface_mut(), "#CCC")?;

    println!("{}", scene.surface().to_svg_string(scene.root()));
    Ok(())
}
