//! Physical page formats and per-call generation options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Millimetres per PDF point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

pub const EXPORT_QUALITY: f32 = 3.0;
pub const PREVIEW_QUALITY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageKind {
    #[default]
    A4,
    Letter,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::A4 => "a4",
            PageKind::Letter => "letter",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageKind::A4),
            "letter" => Ok(PageKind::Letter),
            other => Err(format!("unknown page format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation '{other}'")),
        }
    }
}

/// A physical page size plus the CSS pixel box the clone is laid out in.
///
/// The reference size is the page at 96 DPI, rounded. It anchors the clone's
/// width regardless of how the live view is zoomed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub kind: PageKind,
    pub width_mm: f64,
    pub height_mm: f64,
    pub reference_width_px: u32,
    pub reference_height_px: u32,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat {
        kind: PageKind::A4,
        width_mm: 210.0,
        height_mm: 297.0,
        reference_width_px: 794,
        reference_height_px: 1123,
    };

    pub const LETTER: PageFormat = PageFormat {
        kind: PageKind::Letter,
        width_mm: 215.9,
        height_mm: 279.4,
        reference_width_px: 816,
        reference_height_px: 1056,
    };

    pub fn portrait(kind: PageKind) -> PageFormat {
        match kind {
            PageKind::A4 => PageFormat::A4,
            PageKind::Letter => PageFormat::LETTER,
        }
    }

    /// Landscape swaps the physical and the reference dimensions together.
    pub fn new(kind: PageKind, orientation: Orientation) -> PageFormat {
        let page = PageFormat::portrait(kind);
        match orientation {
            Orientation::Portrait => page,
            Orientation::Landscape => PageFormat {
                kind,
                width_mm: page.height_mm,
                height_mm: page.width_mm,
                reference_width_px: page.reference_height_px,
                reference_height_px: page.reference_width_px,
            },
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_mm / self.height_mm
    }

    pub fn width_pt(&self) -> f64 {
        self.width_mm / MM_PER_PT
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm / MM_PER_PT
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Download name; the caller's default is used when `None`.
    pub filename: Option<String>,
    /// Capture pixel density multiplier.
    pub quality: f32,
    pub format: PageKind,
    pub orientation: Orientation,
}

impl GenerationOptions {
    pub fn export() -> Self {
        GenerationOptions {
            filename: None,
            quality: EXPORT_QUALITY,
            format: PageKind::A4,
            orientation: Orientation::Portrait,
        }
    }

    pub fn preview() -> Self {
        GenerationOptions {
            quality: PREVIEW_QUALITY,
            ..GenerationOptions::export()
        }
    }

    pub fn page(&self) -> PageFormat {
        PageFormat::new(self.format, self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sizes_match_96_dpi() {
        for page in [PageFormat::A4, PageFormat::LETTER] {
            let w = page.width_mm / 25.4 * 96.0;
            let h = page.height_mm / 25.4 * 96.0;
            assert!((w - page.reference_width_px as f64).abs() <= 1.0);
            assert!((h - page.reference_height_px as f64).abs() <= 1.0);
        }
    }

    #[test]
    fn test_landscape_swaps_both_boxes() {
        let page = PageFormat::new(PageKind::Letter, Orientation::Landscape);
        assert_eq!(page.width_mm, 279.4);
        assert_eq!(page.height_mm, 215.9);
        assert_eq!((page.reference_width_px, page.reference_height_px), (1056, 816));
        assert!(page.aspect_ratio() > 1.0);
    }

    #[test]
    fn test_a4_in_points() {
        assert!((PageFormat::A4.width_pt() - 595.28).abs() < 0.01);
        assert!((PageFormat::A4.height_pt() - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_option_defaults() {
        assert_eq!(GenerationOptions::export().quality, 3.0);
        assert_eq!(GenerationOptions::preview().quality, 2.0);
        assert_eq!(GenerationOptions::preview().page(), PageFormat::A4);
        assert_eq!("Letter".parse::<PageKind>(), Ok(PageKind::Letter));
        assert_eq!("landscape".parse::<Orientation>(), Ok(Orientation::Landscape));
    }
}
