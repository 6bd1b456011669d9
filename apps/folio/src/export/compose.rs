//! Page composition: inscribes a bitmap in the page without distortion.

use serde::Serialize;

use crate::errors::ExportError;
use crate::export::page::PageFormat;

/// Where the bitmap is drawn on the page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRect {
    pub offset_x_mm: f64,
    pub offset_y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Fits a `bitmap_width × bitmap_height` bitmap inside `page`.
///
/// A bitmap relatively wider than the page (`arB > arP`) spans the full width
/// and is centred vertically; anything else, including an exact match, spans
/// the full height and is centred horizontally.
pub fn compose(
    bitmap_width: u32,
    bitmap_height: u32,
    page: &PageFormat,
) -> Result<PlacementRect, ExportError> {
    if bitmap_width == 0 || bitmap_height == 0 {
        return Err(ExportError::Capture(format!(
            "cannot place an empty {bitmap_width}x{bitmap_height} bitmap"
        )));
    }
    let ar_bitmap = bitmap_width as f64 / bitmap_height as f64;
    let ar_page = page.aspect_ratio();

    let placement = if ar_bitmap > ar_page {
        let height_mm = page.width_mm / ar_bitmap;
        PlacementRect {
            offset_x_mm: 0.0,
            offset_y_mm: (page.height_mm - height_mm) / 2.0,
            width_mm: page.width_mm,
            height_mm,
        }
    } else {
        let width_mm = page.height_mm * ar_bitmap;
        PlacementRect {
            offset_x_mm: (page.width_mm - width_mm) / 2.0,
            offset_y_mm: 0.0,
            width_mm,
            height_mm: page.height_mm,
        }
    };
    Ok(placement)
}
