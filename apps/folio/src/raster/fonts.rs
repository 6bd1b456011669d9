//! Font file discovery for text measurement and glyph painting.
//!
//! Faces are looked up by file name in the configured directories first and the
//! platform font directories after. A family with no installed file falls back to
//! a generic sans or serif face; when nothing parses, text is laid out with the
//! static width tables but not painted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, warn};

use crate::layout::{FontFamily, StaticMetrics, TextMeasure};
use crate::raster::shaping::shape_run;

/// Directory levels searched below each font directory.
const MAX_SCAN_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FaceKey {
    family: FontFamily,
    bold: bool,
    italic: bool,
}

pub struct FontBook {
    dirs: Vec<PathBuf>,
    /// Lower-cased file name → first path seen, built on first lookup.
    index: OnceLock<HashMap<String, PathBuf>>,
    cache: Mutex<HashMap<FaceKey, Option<Arc<Vec<u8>>>>>,
}

impl FontBook {
    /// Searches `extra_dirs` and then the platform font directories.
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        let mut dirs = extra_dirs;
        dirs.extend(system_font_dirs());
        Self::with_dirs(dirs)
    }

    /// Searches only `dirs`. An empty list paints no glyphs.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        FontBook {
            dirs,
            index: OnceLock::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Bytes of the best installed face for the request, cached per request.
    pub fn face_bytes(
        &self,
        family: FontFamily,
        bold: bool,
        italic: bool,
    ) -> Option<Arc<Vec<u8>>> {
        let key = FaceKey {
            family,
            bold,
            italic,
        };
        if let Ok(cache) = self.cache.lock() {
            if let Some(entry) = cache.get(&key) {
                return entry.clone();
            }
        }

        let loaded = self.load(key);
        if loaded.is_none() {
            debug!(family = family.display_name(), bold, italic, "No font file found");
        }
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, loaded.clone());
        }
        loaded
    }

    fn load(&self, key: FaceKey) -> Option<Arc<Vec<u8>>> {
        let index = self.index.get_or_init(|| index_font_files(&self.dirs));
        for name in file_candidates(key.family, key.bold, key.italic) {
            let Some(path) = index.get(&name.to_ascii_lowercase()) else {
                continue;
            };
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            if ttf_parser::Face::parse(&bytes, 0).is_ok() {
                return Some(Arc::new(bytes));
            }
            warn!(path = %path.display(), "Ignoring unparseable font file");
        }
        None
    }
}

impl TextMeasure for FontBook {
    /// Shaped width with the face the painter draws with; the static tables
    /// when no face is installed for the request.
    fn measure_px(
        &self,
        text: &str,
        family: FontFamily,
        size: f32,
        bold: bool,
        italic: bool,
    ) -> f32 {
        self.face_bytes(family, bold, italic)
            .and_then(|bytes| shape_run(&bytes, text, size))
            .map(|run| run.width)
            .unwrap_or_else(|| StaticMetrics.measure_px(text, family, size, bold, italic))
    }
}

/// File names to try for a face, most specific first.
fn file_candidates(family: FontFamily, bold: bool, italic: bool) -> Vec<String> {
    let stem = family.display_name().replace(' ', "");
    let style = match (bold, italic) {
        (false, false) => "Regular",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (true, true) => "BoldItalic",
    };

    let mut out = vec![
        format!("{stem}-{style}.ttf"),
        format!("{stem}-{style}.otf"),
        format!("{stem}{style}.ttf"),
    ];
    if !bold && !italic {
        out.push(format!("{stem}.ttf"));
    }

    let generic: &[&str] = match (family.is_serif(), bold) {
        (true, false) => &[
            "LiberationSerif-Regular.ttf",
            "DejaVuSerif.ttf",
            "NotoSerif-Regular.ttf",
            "times.ttf",
        ],
        (true, true) => &[
            "LiberationSerif-Bold.ttf",
            "DejaVuSerif-Bold.ttf",
            "NotoSerif-Bold.ttf",
            "timesbd.ttf",
        ],
        (false, false) => &[
            "LiberationSans-Regular.ttf",
            "DejaVuSans.ttf",
            "NotoSans-Regular.ttf",
            "arial.ttf",
        ],
        (false, true) => &[
            "LiberationSans-Bold.ttf",
            "DejaVuSans-Bold.ttf",
            "NotoSans-Bold.ttf",
            "arialbd.ttf",
        ],
    };
    out.extend(generic.iter().map(|s| s.to_string()));

    // Regular weight as the last resort for bold and italic requests.
    if bold || italic {
        out.extend(file_candidates(family, false, false));
    }
    out
}

fn index_font_files(dirs: &[PathBuf]) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    for dir in dirs {
        scan_dir(dir, 0, &mut index);
    }
    debug!(files = index.len(), "Indexed font files");
    index
}

fn scan_dir(dir: &Path, depth: usize, index: &mut HashMap<String, PathBuf>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, depth + 1, index);
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".ttf") || lower.ends_with(".otf") {
            index.entry(lower).or_insert(path);
        }
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        dirs.push(PathBuf::from(r"C:\Windows\Fonts"));
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join(".fonts"));
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_prefer_family_then_generic() {
        let names = file_candidates(FontFamily::Lato, true, false);
        assert_eq!(names[0], "Lato-Bold.ttf");
        let generic = names
            .iter()
            .position(|n| n == "LiberationSans-Bold.ttf")
            .unwrap();
        let regular = names.iter().position(|n| n == "Lato-Regular.ttf").unwrap();
        assert!(generic < regular);
    }

    #[test]
    fn test_serif_families_fall_back_to_serif_faces() {
        let names = file_candidates(FontFamily::EbGaramond, false, false);
        assert_eq!(names[0], "EBGaramond-Regular.ttf");
        assert!(names.iter().any(|n| n == "LiberationSerif-Regular.ttf"));
        assert!(!names.iter().any(|n| n == "LiberationSans-Regular.ttf"));
    }

    #[test]
    fn test_unparseable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype/inter");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Inter-Regular.ttf"), b"not a font").unwrap();

        let book = FontBook::with_dirs(vec![dir.path().to_path_buf()]);
        assert!(book.face_bytes(FontFamily::Inter, false, false).is_none());
    }

    #[test]
    fn test_empty_book_has_no_faces() {
        let book = FontBook::with_dirs(Vec::new());
        assert!(book.face_bytes(FontFamily::Oswald, true, true).is_none());
    }

    #[test]
    fn test_measure_without_faces_uses_static_tables() {
        let book = FontBook::with_dirs(Vec::new());
        let text = "Senior Software Engineer";
        assert_eq!(
            book.measure_px(text, FontFamily::Lato, 12.0, true, false),
            StaticMetrics.measure_px(text, FontFamily::Lato, 12.0, true, false)
        );
    }

    #[test]
    fn test_measure_with_a_face_matches_its_shaped_width() {
        let book = FontBook::new(Vec::new());
        let Some(bytes) = book.face_bytes(FontFamily::Inter, false, false) else {
            // No installed face on this machine.
            return;
        };
        let text = "Senior Software Engineer";
        let shaped = shape_run(&bytes, text, 12.0).unwrap();
        assert_eq!(
            book.measure_px(text, FontFamily::Inter, 12.0, false, false),
            shaped.width
        );
    }
}
