//! Paints a laid-out box tree onto a tiny-skia pixmap.
//!
//! Coordinates in the layout are CSS pixels; the base transform scales them by
//! the capture quality. Element transforms (`scale`, `translate`) are applied
//! around their `transform-origin`, so an unstripped scale shows up in the
//! output exactly as it would on screen.

use std::collections::HashMap;

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, Path, PathBuilder,
    Pixmap, PixmapPaint, Point, Rect as SkRect, Shader, SpreadMode, Stroke, Transform,
};
use tracing::warn;
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::dom::style::{Background, BorderSide, GradientDirection, Rgba, TransformFn};
use crate::layout::{BoxContent, LayoutBox, Rect, TextLine, TextStyle};
use crate::raster::fonts::FontBook;
use crate::raster::shaping::shape_run;
use crate::raster::resources::ImageBytes;

/// Cubic Bézier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

pub fn paint_tree(
    pixmap: &mut Pixmap,
    root: &LayoutBox,
    scale: f32,
    fonts: &FontBook,
    images: &HashMap<String, Pixmap>,
) {
    let painter = Painter { fonts, images };
    painter.paint_box(pixmap, root, Transform::from_scale(scale, scale));
}

struct Painter<'a> {
    fonts: &'a FontBook,
    images: &'a HashMap<String, Pixmap>,
}

impl<'a> Painter<'a> {
    fn paint_box(&self, pixmap: &mut Pixmap, layout: &LayoutBox, parent: Transform) {
        let ts = box_transform(layout, parent);

        if let Some(background) = &layout.decoration.background {
            paint_background(pixmap, layout.rect, layout.decoration.radius, background, ts);
        }
        let decoration = &layout.decoration;
        paint_borders(pixmap, layout.rect, decoration.radius, &decoration.borders, ts);

        match &layout.content {
            BoxContent::Block => {}
            BoxContent::Image { src } => self.paint_image(pixmap, layout.rect, src, ts),
            BoxContent::Text { lines, style } => self.paint_text(pixmap, lines, style, ts),
        }

        for child in &layout.children {
            self.paint_box(pixmap, child, ts);
        }
    }

    fn paint_image(&self, pixmap: &mut Pixmap, rect: Rect, src: &str, ts: Transform) {
        let Some(image) = self.images.get(src) else {
            return;
        };
        if image.width() == 0 || image.height() == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let sx = rect.width / image.width() as f32;
        let sy = rect.height / image.height() as f32;
        let image_ts = ts.pre_translate(rect.x, rect.y).pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, image_ts, None);
    }

    fn paint_text(
        &self,
        pixmap: &mut Pixmap,
        lines: &[TextLine],
        style: &TextStyle,
        ts: Transform,
    ) {
        if lines.is_empty() || style.color.a == 0 {
            return;
        }
        let Some(bytes) = self.fonts.face_bytes(style.family, style.bold, style.italic) else {
            return;
        };
        let Ok(face) = ttf_parser::Face::parse(&bytes, 0) else {
            return;
        };
        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = style.size / units_per_em;
        let ascent = face.ascender() as f32 * scale;
        let descent = face.descender() as f32 * scale;
        let paint = solid_paint(style.color);

        for line in lines {
            // Same shaping layout measured the line with.
            let Some(run) = shape_run(&bytes, &line.text, style.size) else {
                continue;
            };
            let baseline = line.y + (line.height - (ascent - descent)) / 2.0 + ascent;
            let mut builder = GlyphPathBuilder::new(scale);
            for glyph in &run.glyphs {
                builder.set_origin(line.x + glyph.x, baseline + glyph.y);
                face.outline_glyph(GlyphId(glyph.glyph_id), &mut builder);
            }
            if let Some(path) = builder.finish() {
                pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
            }
        }
    }
}

fn box_transform(layout: &LayoutBox, parent: Transform) -> Transform {
    if layout.transforms.is_empty() {
        return parent;
    }
    let rect = layout.rect;
    let (origin_x, origin_y) = layout.transform_origin;
    let ox = rect.x + origin_x.resolve(rect.width).unwrap_or(0.0);
    let oy = rect.y + origin_y.resolve(rect.height).unwrap_or(0.0);

    let mut ts = parent.pre_translate(ox, oy);
    for function in &layout.transforms {
        ts = match function {
            TransformFn::Scale(sx, sy) => ts.pre_scale(*sx, *sy),
            TransformFn::Translate(tx, ty) => ts.pre_translate(
                tx.resolve(rect.width).unwrap_or(0.0),
                ty.resolve(rect.height).unwrap_or(0.0),
            ),
            TransformFn::Other(_) => ts,
        };
    }
    ts.pre_translate(-ox, -oy)
}

fn paint_background(
    pixmap: &mut Pixmap,
    rect: Rect,
    radius: f32,
    background: &Background,
    ts: Transform,
) {
    let Some(path) = box_path(rect, radius) else {
        return;
    };
    let paint = match background {
        Background::Solid(color) if color.a == 0 => return,
        Background::Solid(color) => solid_paint(*color),
        Background::LinearGradient { direction, stops } => {
            let Some(shader) = gradient_shader(rect, *direction, stops) else {
                return;
            };
            Paint {
                shader,
                anti_alias: true,
                ..Paint::default()
            }
        }
    };
    pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
}

fn paint_borders(
    pixmap: &mut Pixmap,
    rect: Rect,
    radius: f32,
    borders: &[Option<BorderSide>; 4],
    ts: Transform,
) {
    if borders.iter().all(Option::is_none) {
        return;
    }

    // Uniform borders on rounded boxes are stroked along the rounded outline.
    if radius > 0.0 {
        if let [Some(first), rest @ ..] = borders {
            if rest.iter().all(|b| b.as_ref() == Some(first)) {
                let half = first.width / 2.0;
                let inset = Rect {
                    x: rect.x + half,
                    y: rect.y + half,
                    width: rect.width - first.width,
                    height: rect.height - first.width,
                };
                if let Some(path) = box_path(inset, (radius - half).max(0.0)) {
                    let stroke = Stroke {
                        width: first.width,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(&path, &solid_paint(first.color), &stroke, ts, None);
                }
                return;
            }
        }
    }

    let [top, right, bottom, left] = borders;
    let strips = [
        top.map(|b| (b, rect.x, rect.y, rect.width, b.width)),
        right.map(|b| (b, rect.right() - b.width, rect.y, b.width, rect.height)),
        bottom.map(|b| (b, rect.x, rect.bottom() - b.width, rect.width, b.width)),
        left.map(|b| (b, rect.x, rect.y, b.width, rect.height)),
    ];
    for (border, x, y, w, h) in strips.into_iter().flatten() {
        if let Some(strip) = SkRect::from_xywh(x, y, w, h) {
            pixmap.fill_rect(strip, &solid_paint(border.color), ts, None);
        }
    }
}

fn gradient_shader(
    rect: Rect,
    direction: GradientDirection,
    stops: &[Rgba],
) -> Option<Shader<'static>> {
    let (start, end) = match direction {
        GradientDirection::ToRight => ((rect.x, rect.y), (rect.right(), rect.y)),
        GradientDirection::ToLeft => ((rect.right(), rect.y), (rect.x, rect.y)),
        GradientDirection::ToBottom => ((rect.x, rect.y), (rect.x, rect.bottom())),
        GradientDirection::ToTop => ((rect.x, rect.bottom()), (rect.x, rect.y)),
    };
    let last = stops.len().saturating_sub(1).max(1) as f32;
    let stops = stops
        .iter()
        .enumerate()
        .map(|(i, c)| GradientStop::new(i as f32 / last, to_color(*c)))
        .collect();
    LinearGradient::new(
        Point::from_xy(start.0, start.1),
        Point::from_xy(end.0, end.1),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}

/// Rectangle path, with circular corners when `radius > 0`.
fn box_path(rect: Rect, radius: f32) -> Option<Path> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    if r <= 0.0 {
        return SkRect::from_xywh(rect.x, rect.y, rect.width, rect.height)
            .map(PathBuilder::from_rect);
    }

    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    pb.close();
    pb.finish()
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn solid_paint(c: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;
    paint
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph outlines
// ────────────────────────────────────────────────────────────────────────────

/// Collects glyph outlines for one line into a single path. Font units are y-up,
/// so y is flipped around the baseline.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x: 0.0,
            origin_y: 0.0,
            scale,
        }
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Image decoding
// ────────────────────────────────────────────────────────────────────────────

/// Decodes fetched images into premultiplied pixmaps. Undecodable entries are dropped.
pub fn decode_images(images: &ImageBytes) -> HashMap<String, Pixmap> {
    images
        .iter()
        .filter_map(|(src, bytes)| match decode_pixmap(bytes) {
            Some(pixmap) => Some((src.clone(), pixmap)),
            None => {
                warn!(bytes = bytes.len(), "Excluding undecodable image from capture");
                None
            }
        })
        .collect()
}

fn decode_pixmap(data: &[u8]) -> Option<Pixmap> {
    let rgba = image::load_from_memory(data).ok()?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)?;
    for (src, dst) in rgba
        .as_raw()
        .chunks_exact(4)
        .zip(pixmap.data_mut().chunks_exact_mut(4))
    {
        let a = src[3];
        dst[0] = premultiply(src[0], a);
        dst[1] = premultiply(src[1], a);
        dst[2] = premultiply(src[2], a);
        dst[3] = a;
    }
    Some(pixmap)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, InlineStyle, NodeId};
    use crate::layout::{layout_subtree, layout_subtree_with, FontFamily};

    fn make_element(doc: &mut Document, parent: NodeId, tag: &str, css: &str) -> NodeId {
        let id = doc.create_element(tag);
        if let Some(style) = doc.style_mut(id) {
            *style = InlineStyle::parse(css);
        }
        doc.append_child(parent, id);
        id
    }

    fn render(doc: &Document, root: NodeId, width: u32, height: u32, scale: f32) -> Pixmap {
        render_with_images(doc, root, width, height, scale, &HashMap::new())
    }

    fn render_with_images(
        doc: &Document,
        root: NodeId,
        width: u32,
        height: u32,
        scale: f32,
        images: &HashMap<String, Pixmap>,
    ) -> Pixmap {
        let layout = layout_subtree(doc, root, width as f32 / scale).unwrap();
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(Color::WHITE);
        paint_tree(&mut pixmap, &layout, scale, &FontBook::with_dirs(Vec::new()), images);
        pixmap
    }

    fn rgb(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let px = pixmap.pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue())
    }

    #[test]
    fn test_solid_background_is_scaled_by_quality() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(
            &mut doc,
            body,
            "div",
            "width: 50px; height: 20px; background: #ff0000",
        );

        let pixmap = render(&doc, root, 200, 80, 2.0);
        assert_eq!(rgb(&pixmap, 10, 10), (255, 0, 0));
        assert_eq!(rgb(&pixmap, 98, 38), (255, 0, 0));
        assert_eq!(rgb(&pixmap, 102, 10), (255, 255, 255));
    }

    #[test]
    fn test_gradient_runs_left_to_right() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(
            &mut doc,
            body,
            "div",
            "height: 10px; background: linear-gradient(to right, #000000, #ffffff)",
        );
        let pixmap = render(&doc, root, 100, 10, 1.0);
        let (left, _, _) = rgb(&pixmap, 2, 5);
        let (right, _, _) = rgb(&pixmap, 97, 5);
        assert!(left < 30, "left edge should be dark, got {left}");
        assert!(right > 225, "right edge should be light, got {right}");
    }

    #[test]
    fn test_scale_transform_shrinks_painted_area() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(
            &mut doc,
            body,
            "div",
            "width: 100px; height: 100px; background: #0000ff; \
             transform: scale(0.5); transform-origin: top left",
        );
        let pixmap = render(&doc, root, 100, 100, 1.0);
        assert_eq!(rgb(&pixmap, 25, 25), (0, 0, 255));
        assert_eq!(rgb(&pixmap, 75, 75), (255, 255, 255));
    }

    #[test]
    fn test_border_strips_are_drawn() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(
            &mut doc,
            body,
            "div",
            "height: 40px; border-bottom: 4px solid #00ff00",
        );
        let pixmap = render(&doc, root, 40, 40, 1.0);
        assert_eq!(rgb(&pixmap, 20, 38), (0, 255, 0));
        assert_eq!(rgb(&pixmap, 20, 10), (255, 255, 255));
    }

    #[test]
    fn test_decoded_image_is_drawn_into_its_box() {
        let mut png = Vec::new();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let mut bytes = ImageBytes::new();
        bytes.insert("logo.png".to_string(), png);
        bytes.insert("broken.png".to_string(), b"garbage".to_vec());
        let images = decode_images(&bytes);
        assert_eq!(images.len(), 1);

        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(&mut doc, body, "div", "");
        let img = make_element(&mut doc, root, "img", "width: 20px; height: 20px");
        if let Some(el) = doc.element_mut(img) {
            el.src = Some("logo.png".to_string());
        }
        let pixmap = render_with_images(&doc, root, 40, 40, 1.0, &images);
        assert_eq!(rgb(&pixmap, 10, 10), (0, 0, 255));
        assert_eq!(rgb(&pixmap, 30, 10), (255, 255, 255));
    }

    #[test]
    fn test_rounded_path_stays_inside_rect() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 40.0,
            height: 20.0,
        };
        let path = box_path(rect, 50.0).unwrap();
        let bounds = path.bounds();
        assert!(bounds.right() <= 40.0 + 1e-3);
        assert!(bounds.bottom() <= 20.0 + 1e-3);
        assert!(box_path(Rect::default(), 4.0).is_none());
    }

    // ── text ──

    #[test]
    fn test_painted_glyphs_end_where_layout_measured_the_line() {
        let fonts = FontBook::new(Vec::new());
        if fonts.face_bytes(FontFamily::Inter, false, false).is_none() {
            // No installed face on this machine.
            return;
        }
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(
            &mut doc,
            body,
            "div",
            "width: 400px; font-size: 24px; line-height: 1; color: #000000",
        );
        let text = doc.create_text("Wide MMW lines WWM");
        doc.append_child(root, text);

        let layout = layout_subtree_with(&doc, root, 400.0, &fonts).unwrap();
        let BoxContent::Text { lines, .. } = &layout.find(text).unwrap().content else {
            panic!("expected text content");
        };
        assert_eq!(lines.len(), 1);
        let line_end = lines[0].x + lines[0].width;

        let mut pixmap = Pixmap::new(400, 24).unwrap();
        pixmap.fill(Color::WHITE);
        paint_tree(&mut pixmap, &layout, 1.0, &fonts, &HashMap::new());

        let ink_right = (0..400u32)
            .rev()
            .find(|&x| (0..24u32).any(|y| rgb(&pixmap, x, y).0 < 128))
            .expect("text should be painted") as f32;
        assert!(ink_right <= line_end + 1.0, "ink at {ink_right}, line ends at {line_end}");
        assert!(ink_right >= line_end - 4.0, "ink at {ink_right}, line ends at {line_end}");
    }
}
