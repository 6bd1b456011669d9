// Raster capture: turns an isolated clone into a white-backed bitmap at a
// quality multiplier. Layout and painting are CPU-bound and run on an owned
// snapshot inside `spawn_blocking`; only settling and image fetching are async.

pub mod fonts;
pub mod paint;
pub mod resources;
pub mod shaping;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tiny_skia::{Color, Pixmap};
use tracing::{debug, info};

use crate::config::Config;
use crate::dom::{Document, NodeData, NodeId, SharedDocument};
use crate::errors::ExportError;
use crate::layout::layout_subtree_with;

use self::fonts::FontBook;
use self::paint::{decode_images, paint_tree};
use self::resources::{ImageBytes, ResourceLoader};

/// Pixel buffer captured from a clone plus the multiplier it was taken at.
pub struct RasterBitmap {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pixmap: Pixmap,
}

impl RasterBitmap {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Opaque RGB copy, composited over white.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let mut out = image::RgbImage::new(self.width, self.height);
        for (dst, px) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = px.demultiply();
            let a = c.alpha() as u32;
            let over_white = |v: u8| ((v as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
            *dst = image::Rgb([over_white(c.red()), over_white(c.green()), over_white(c.blue())]);
        }
        out
    }
}

impl fmt::Debug for RasterBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Pixel density multiplier.
    pub quality: f32,
    pub reference_width: f32,
    /// Minimum captured height in CSS pixels.
    pub reference_height: f32,
    pub settle_delay: Duration,
}

pub struct Capturer {
    fonts: Arc<FontBook>,
    loader: ResourceLoader,
    timeout: Option<Duration>,
}

impl Capturer {
    pub fn new(fonts: Arc<FontBook>, loader: ResourceLoader, timeout: Option<Duration>) -> Self {
        Capturer {
            fonts,
            loader,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Capturer::new(
            Arc::new(FontBook::new(config.font_dirs.clone())),
            ResourceLoader::new(config.allowed_image_origins.clone(), config.image_timeout()),
            config.capture_timeout(),
        )
    }

    /// Captures `clone_root` from the live document.
    ///
    /// Waits `settle_delay` first, then snapshots the document, so anything
    /// mutated while settling is part of the capture. With a capture timeout
    /// configured, expiry is a `Capture` error.
    pub async fn capture(
        &self,
        live: &SharedDocument,
        clone_root: NodeId,
        options: CaptureOptions,
    ) -> Result<RasterBitmap, ExportError> {
        match self.timeout {
            Some(limit) => {
                tokio::time::timeout(limit, self.capture_inner(live, clone_root, options))
                    .await
                    .map_err(|_| {
                        ExportError::Capture(format!(
                            "capture timed out after {}ms",
                            limit.as_millis()
                        ))
                    })?
            }
            None => self.capture_inner(live, clone_root, options).await,
        }
    }

    async fn capture_inner(
        &self,
        live: &SharedDocument,
        clone_root: NodeId,
        options: CaptureOptions,
    ) -> Result<RasterBitmap, ExportError> {
        let started = Instant::now();
        if !options.settle_delay.is_zero() {
            tokio::time::sleep(options.settle_delay).await;
        }

        let snapshot = {
            let doc = live
                .lock()
                .map_err(|_| ExportError::Capture("document lock poisoned".to_string()))?;
            if !doc.is_attached(clone_root) {
                return Err(ExportError::Capture("clone is no longer mounted".to_string()));
            }
            doc.clone()
        };

        let sources = image_sources(&snapshot, clone_root);
        let images = self.loader.prefetch(&sources).await;

        let fonts = Arc::clone(&self.fonts);
        let bitmap = tokio::task::spawn_blocking(move || {
            rasterize(&snapshot, clone_root, &options, &fonts, &images)
        })
        .await
        .map_err(|e| ExportError::Capture(format!("raster task failed: {e}")))??;

        info!(
            width = bitmap.width,
            height = bitmap.height,
            quality = options.quality,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Captured clone"
        );
        Ok(bitmap)
    }
}

/// Lays out and paints `root` into a new bitmap. Blocking.
///
/// The captured height is the larger of the reference height and the content's
/// full scroll height, so overflowing content is never clipped.
pub fn rasterize(
    doc: &Document,
    root: NodeId,
    options: &CaptureOptions,
    fonts: &FontBook,
    images: &ImageBytes,
) -> Result<RasterBitmap, ExportError> {
    if !(options.quality.is_finite() && options.quality > 0.0) {
        return Err(ExportError::Capture(format!("invalid quality {}", options.quality)));
    }
    let layout = layout_subtree_with(doc, root, options.reference_width, fonts)
        .ok_or_else(|| ExportError::Capture("clone is not rendered".to_string()))?;

    let css_width = layout.rect.width;
    let css_height = options.reference_height.max(layout.scroll_height());
    let width = (css_width * options.quality).ceil() as u32;
    let height = (css_height * options.quality).ceil() as u32;
    debug!(css_width, css_height, width, height, "Rasterizing clone");

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        ExportError::Capture(format!("cannot allocate a {width}x{height} bitmap"))
    })?;
    pixmap.fill(Color::WHITE);

    let decoded = decode_images(images);
    paint_tree(&mut pixmap, &layout, options.quality, fonts, &decoded);

    Ok(RasterBitmap {
        width,
        height,
        scale: options.quality,
        pixmap,
    })
}

fn image_sources(doc: &Document, root: NodeId) -> Vec<String> {
    std::iter::once(root)
        .chain(doc.descendants(root))
        .filter_map(|id| match doc.data(id) {
            Some(NodeData::Element(el)) => el.src.clone(),
            _ => None,
        })
        .collect()
}
