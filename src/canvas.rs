//! Raster preview of the drawn scene.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::color_utils::Color;
use crate::constants::style::{FILL_ALPHA, STROKE_WIDTH};
use crate::coords::CoordinateMapper;
use crate::drawing::StyledPolygon;

/// Render styled polygons onto a transparent pixmap the size of the display frame.
///
/// Returns `None` if the pixmap cannot be allocated.
pub fn render_scene(polygons: &[StyledPolygon], mapper: &CoordinateMapper) -> Option<Pixmap> {
    let frame = mapper.display_frame();
    let width = frame.width().ceil() as u32;
    let height = frame.height().ceil() as u32;

    let Some(mut pixmap) = Pixmap::new(width, height) else {
        log::error!("Failed to create pixmap {}x{}", width, height);
        return None;
    };

    let stroke = Stroke {
        width: STROKE_WIDTH,
        ..Default::default()
    };

    for (index, polygon) in polygons.iter().enumerate() {
        let mut pb = PathBuilder::new();
        for (i, point) in polygon.points.iter().enumerate() {
            let p = mapper.drawing_to_display(*point);
            if i == 0 {
                pb.move_to(p.x as f32, p.y as f32);
            } else {
                pb.line_to(p.x as f32, p.y as f32);
            }
        }
        pb.close();
        let Some(path) = pb.finish() else {
            log::warn!("Skipping polygon {} with an empty path", index);
            continue;
        };

        let fill = paint(polygon.style.fill, FILL_ALPHA);
        pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        let outline = paint(polygon.style.stroke, u8::MAX);
        pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
    }

    Some(pixmap)
}

fn paint(color: Color, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}
