//! Text shaping with rustybuzz.
//!
//! Layout measures lines and the painter places glyphs from the same shaped
//! output, so painted text covers exactly the width layout reserved for it.

use rustybuzz::{Face as HbFace, UnicodeBuffer};

/// A glyph positioned relative to the start of its run, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph_id: u16,
    pub x: f32,
    /// Offset from the baseline, positive downwards.
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<PlacedGlyph>,
    /// Sum of the advances.
    pub width: f32,
}

/// Shapes `text` with the face in `font_data` at `font_size` pixels.
///
/// `None` when the data does not parse as a face. Glyphs missing from the face
/// (`.notdef`) are not emitted but still advance the pen.
pub fn shape_run(font_data: &[u8], text: &str, font_size: f32) -> Option<ShapedRun> {
    let face = HbFace::from_slice(font_data, 0)?;
    let scale = font_size / face.units_per_em().max(1) as f32;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);

    let mut glyphs = Vec::with_capacity(output.len());
    let mut pen = 0.0_f32;
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        let glyph_id = info.glyph_id as u16;
        if glyph_id != 0 {
            glyphs.push(PlacedGlyph {
                glyph_id,
                x: pen + pos.x_offset as f32 * scale,
                y: -(pos.y_offset as f32) * scale,
            });
        }
        pen += pos.x_advance as f32 * scale;
    }
    Some(ShapedRun { glyphs, width: pen })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontFamily;
    use crate::raster::fonts::FontBook;

    #[test]
    fn test_garbage_is_not_a_face() {
        assert_eq!(shape_run(b"not a font", "Hello", 12.0), None);
    }

    #[test]
    fn test_width_scales_with_size_and_sums_advances() {
        let fonts = FontBook::new(Vec::new());
        let Some(bytes) = fonts.face_bytes(FontFamily::Inter, false, false) else {
            // No installed face on this machine.
            return;
        };
        let small = shape_run(&bytes, "Experience", 10.0).unwrap();
        let large = shape_run(&bytes, "Experience", 20.0).unwrap();
        assert!(small.width > 0.0);
        assert!((large.width - 2.0 * small.width).abs() < 1e-3);

        let word = shape_run(&bytes, "Senior", 12.0).unwrap();
        assert_eq!(word.glyphs.len(), 6);
        assert_eq!(word.glyphs[0].x, 0.0);
        assert!(word.glyphs.windows(2).all(|w| w[0].x < w[1].x));
        assert!(word.glyphs[5].x < word.width);
    }
}
