//! Output stage: JPEG encoding, single-page PDF assembly, and the two
//! delivery forms (a file in the download directory, or a `data:` URI).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::errors::ExportError;
use crate::export::compose::PlacementRect;
use crate::export::page::{PageFormat, MM_PER_PT};
use crate::raster::RasterBitmap;

pub const EXPORT_JPEG_QUALITY: u8 = 98;
pub const PREVIEW_JPEG_QUALITY: u8 = 95;

pub const DATA_URI_PREFIX: &str = "data:application/pdf;filename=generated.pdf;base64,";

/// Encodes the bitmap, composited over white, as a baseline JPEG.
pub fn encode_jpeg(bitmap: &RasterBitmap, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb = bitmap.to_rgb_image();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ExportError::Encode(format!("jpeg: {e}")))?;
    Ok(out)
}

/// Builds a one-page PDF of `page` size with the JPEG drawn at `placement`.
///
/// `compress` flate-compresses the page content stream; the image stream is
/// already DCT-encoded and is stored as is.
pub fn build_pdf(
    jpeg: Vec<u8>,
    pixel_width: u32,
    pixel_height: u32,
    placement: &PlacementRect,
    page: &PageFormat,
    compress: bool,
) -> Result<Vec<u8>, ExportError> {
    let page_w = page.width_pt() as f32;
    let page_h = page.height_pt() as f32;
    let img_w = (placement.width_mm / MM_PER_PT) as f32;
    let img_h = (placement.height_mm / MM_PER_PT) as f32;
    let img_x = (placement.offset_x_mm / MM_PER_PT) as f32;
    // PDF space grows upwards from the bottom-left corner.
    let img_y = page_h - (placement.offset_y_mm / MM_PER_PT) as f32 - img_h;

    let mut doc = PdfDocument::with_version("1.4");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false),
    );

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(img_w),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(img_h),
                    Object::Real(img_x),
                    Object::Real(img_y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| ExportError::Encode(format!("pdf content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(page_w),
            Object::Real(page_h),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });
    doc.set_object(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        },
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let stamp = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal(concat!("folio ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(stamp),
    });
    doc.trailer.set("Info", info_id);

    if compress {
        doc.compress();
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ExportError::Encode(format!("pdf: {e}")))?;
    debug!(bytes = out.len(), page = %page.kind, "Assembled PDF");
    Ok(out)
}

/// Writes `bytes` into `dir` under the sanitized `filename`.
///
/// An existing file is never overwritten; like a browser download, the name
/// gets a ` (n)` suffix instead.
pub async fn save_download(
    dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let name = sanitize_filename(filename);
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
        None => (name.clone(), String::new()),
    };

    let mut path = dir.join(&name);
    let mut n = 1;
    let mut file = loop {
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => break file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                path = dir.join(format!("{stem} ({n}){ext}"));
                n += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };
    file.write_all(bytes).await?;
    file.flush().await?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved PDF");
    Ok(path)
}

/// Self-contained inline form of a PDF, for embedding in a viewer.
pub fn to_data_uri(pdf: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{}", STANDARD.encode(pdf))
}

/// `<fullName-or-"resume">_<template>.pdf`, sanitized.
pub fn default_filename(full_name: &str, template: &str) -> String {
    let name = full_name.trim();
    let name = if name.is_empty() { "resume" } else { name };
    sanitize_filename(&format!("{name}_{template}.pdf"))
}

/// Makes `name` safe as a single file name ending in `.pdf`.
///
/// Path separators, reserved characters and control characters become `_`;
/// leading dots and surrounding whitespace are dropped.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();
    let stem = if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        &cleaned[..cleaned.len() - 4]
    } else {
        cleaned
    };
    let stem = stem.trim().trim_start_matches('.').trim_start();
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
