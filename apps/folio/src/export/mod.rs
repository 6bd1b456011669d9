// Export call sites: gate → isolate → capture → compose → output.
//
// `generate_file` and `generate_preview` share one path (`render_artifact`) and
// differ only in settle delay, JPEG quality, compression and delivery. The
// entitlement gate finishes before anything touches the live document, and
// the off-screen mount is released before the output stage runs.

pub mod compose;
pub mod control;
pub mod isolate;
pub mod output;
pub mod page;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::dom::SharedDocument;
use crate::entitlement::EntitlementGate;
use crate::errors::{ExportError, FILE_FAILURE_MESSAGE, PREVIEW_FAILURE_MESSAGE};
use crate::raster::{CaptureOptions, Capturer};

pub use compose::{compose, PlacementRect};
pub use control::{GenerationControl, GenerationTicket};
pub use isolate::{isolate, OffscreenMount};
pub use output::{default_filename, sanitize_filename};
pub use page::{GenerationOptions, Orientation, PageFormat, PageKind};

/// Download name used when the caller supplies none.
pub const FALLBACK_FILENAME: &str = "resume.pdf";

/// A finished PDF plus what went into it.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
    pub placement: PlacementRect,
    pub page: PageFormat,
}

/// Per-variant output settings.
#[derive(Debug, Clone, Copy)]
struct OutputProfile {
    settle_delay: Duration,
    jpeg_quality: u8,
    compress: bool,
}

pub struct Exporter {
    gate: Arc<EntitlementGate>,
    capturer: Capturer,
    download_dir: PathBuf,
    file_profile: OutputProfile,
    preview_profile: OutputProfile,
}

impl Exporter {
    pub fn new(gate: Arc<EntitlementGate>, capturer: Capturer, download_dir: PathBuf) -> Self {
        Exporter {
            gate,
            capturer,
            download_dir,
            file_profile: OutputProfile {
                settle_delay: Duration::from_millis(500),
                jpeg_quality: output::EXPORT_JPEG_QUALITY,
                compress: true,
            },
            preview_profile: OutputProfile {
                settle_delay: Duration::from_millis(300),
                jpeg_quality: output::PREVIEW_JPEG_QUALITY,
                compress: false,
            },
        }
    }

    pub fn from_config(config: &Config, gate: Arc<EntitlementGate>) -> Self {
        Exporter::new(gate, Capturer::from_config(config), config.download_dir.clone())
            .with_settle_delays(config.settle_delay(), config.preview_settle_delay())
    }

    pub fn with_settle_delays(mut self, file: Duration, preview: Duration) -> Self {
        self.file_profile.settle_delay = file;
        self.preview_profile.settle_delay = preview;
        self
    }

    /// Renders `element_id` and saves the PDF into the download directory.
    ///
    /// Gate refusals come back unchanged; every other failure is the generic
    /// file-export failure.
    pub async fn generate_file(
        &self,
        live: &SharedDocument,
        element_id: &str,
        options: &GenerationOptions,
    ) -> Result<PathBuf, ExportError> {
        let result = async {
            let artifact = self
                .render_artifact(live, element_id, options, self.file_profile)
                .await?;
            let filename = options.filename.as_deref().unwrap_or(FALLBACK_FILENAME);
            output::save_download(&self.download_dir, filename, &artifact.bytes).await
        }
        .await;
        result.map_err(|e| e.normalize(FILE_FAILURE_MESSAGE))
    }

    /// Renders `element_id` and returns the PDF as a `data:` URI.
    pub async fn generate_preview(
        &self,
        live: &SharedDocument,
        element_id: &str,
        options: &GenerationOptions,
    ) -> Result<String, ExportError> {
        self.render_artifact(live, element_id, options, self.preview_profile)
            .await
            .map(|artifact| output::to_data_uri(&artifact.bytes))
            .map_err(|e| e.normalize(PREVIEW_FAILURE_MESSAGE))
    }

    /// The PDF bytes for `element_id` with the file-export settings, without
    /// saving or normalizing errors.
    pub async fn export_artifact(
        &self,
        live: &SharedDocument,
        element_id: &str,
        options: &GenerationOptions,
    ) -> Result<PdfArtifact, ExportError> {
        self.render_artifact(live, element_id, options, self.file_profile)
            .await
    }

    async fn render_artifact(
        &self,
        live: &SharedDocument,
        element_id: &str,
        options: &GenerationOptions,
        profile: OutputProfile,
    ) -> Result<PdfArtifact, ExportError> {
        self.gate.check_and_provision().await?;

        let handle = live
            .lock()
            .map_err(|_| ExportError::Capture("document lock poisoned".to_string()))?
            .get_element_by_id(element_id)
            .ok_or_else(|| ExportError::ElementNotFound(element_id.to_string()))?;

        let page = options.page();
        let mount = isolate(live, handle, &page)?;
        let capture_options = CaptureOptions {
            quality: options.quality,
            reference_width: page.reference_width_px as f32,
            reference_height: page.reference_height_px as f32,
            settle_delay: profile.settle_delay,
        };
        // An error here drops the mount, which removes the container.
        let bitmap = self
            .capturer
            .capture(live, mount.clone_root(), capture_options)
            .await?;
        mount.release();

        let placement = compose(bitmap.width, bitmap.height, &page)?;
        let (bitmap_width, bitmap_height) = (bitmap.width, bitmap.height);
        let bytes = tokio::task::spawn_blocking(move || {
            let jpeg = output::encode_jpeg(&bitmap, profile.jpeg_quality)?;
            output::build_pdf(
                jpeg,
                bitmap_width,
                bitmap_height,
                &placement,
                &page,
                profile.compress,
            )
        })
        .await
        .map_err(|e| ExportError::Encode(format!("encode task failed: {e}")))??;

        info!(
            element_id,
            page = %page.kind,
            bitmap_width,
            bitmap_height,
            offset_x_mm = placement.offset_x_mm,
            offset_y_mm = placement.offset_y_mm,
            bytes = bytes.len(),
            "Generated PDF"
        );
        Ok(PdfArtifact {
            bytes,
            bitmap_width,
            bitmap_height,
            placement,
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, InlineStyle};
    use crate::entitlement::FREE_PLAN_LIMIT_MESSAGE;
    use crate::models::{Account, PlanTier, ResumeData, TemplateKind};
    use crate::raster::fonts::FontBook;
    use crate::raster::resources::ResourceLoader;
    use crate::store::InMemoryStore;
    use crate::templates;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use uuid::Uuid;

    const ELEMENT_ID: &str = "resume-preview";

    fn make_store(tier: PlanTier) -> (Arc<InMemoryStore>, Uuid) {
        let account = Account::new(Uuid::new_v4());
        let id = account.id;
        (Arc::new(InMemoryStore::with_account(account, tier)), id)
    }

    fn make_exporter(
        store: Arc<InMemoryStore>,
        dir: PathBuf,
        timeout: Option<Duration>,
    ) -> Exporter {
        let gate = Arc::new(EntitlementGate::new(store.clone(), store.clone(), store));
        let capturer = Capturer::new(
            Arc::new(FontBook::with_dirs(Vec::new())),
            ResourceLoader::new(Vec::new(), Duration::from_millis(100)),
            timeout,
        );
        Exporter::new(gate, capturer, dir).with_settle_delays(Duration::ZERO, Duration::ZERO)
    }

    fn make_options(quality: f32) -> GenerationOptions {
        GenerationOptions {
            quality,
            ..GenerationOptions::preview()
        }
    }

    /// A thumbnail-scaled resume mounted like the live editor view.
    fn make_live_resume() -> SharedDocument {
        let mut doc = Document::new();
        templates::mount_preview(
            &mut doc,
            TemplateKind::Modern,
            &ResumeData::sample(),
            ELEMENT_ID,
            0.35,
        );
        doc.into_shared()
    }

    /// A tagged element holding one block `height_px` tall.
    fn make_live_block(height_px: u32) -> SharedDocument {
        let mut doc = Document::new();
        let body = doc.body();
        let el = doc.create_element("div");
        doc.element_mut(el).unwrap().id = Some(ELEMENT_ID.to_string());
        doc.append_child(body, el);
        let block = doc.create_element("div");
        *doc.style_mut(block).unwrap() =
            InlineStyle::parse(&format!("height: {height_px}px; background: #dbeafe"));
        doc.append_child(el, block);
        doc.into_shared()
    }

    fn node_count(live: &SharedDocument) -> usize {
        live.lock().unwrap().live_node_count()
    }

    // ── happy paths ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preview_is_a_pdf_data_uri_at_reference_size() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_resume();
        let before = node_count(&live);

        let artifact = exporter
            .render_artifact(&live, ELEMENT_ID, &make_options(1.0), exporter.preview_profile)
            .await
            .unwrap();
        // The thumbnail scale does not reach the capture.
        assert_eq!(artifact.bitmap_width, 794);
        assert!(artifact.bitmap_height >= 1123);
        assert_eq!(node_count(&live), before);

        let uri = exporter
            .generate_preview(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap();
        let payload = uri.strip_prefix(output::DATA_URI_PREFIX).unwrap();
        assert!(STANDARD.decode(payload).unwrap().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_file_export_writes_named_pdf() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_block(200);

        let options = GenerationOptions {
            filename: Some(default_filename("Jane Doe", "modern")),
            quality: 1.0,
            ..GenerationOptions::export()
        };
        let path = exporter.generate_file(&live, ELEMENT_ID, &options).await.unwrap();
        assert_eq!(path, dir.path().join("Jane Doe_modern.pdf"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_tall_document_is_letterboxed_horizontally() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_block(2000);

        let artifact = exporter
            .export_artifact(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap();
        assert_eq!(artifact.bitmap_width, 794);
        assert_eq!(artifact.bitmap_height, 2000);
        assert_eq!(artifact.placement.offset_y_mm, 0.0);
        assert!(artifact.placement.offset_x_mm > 0.0);
    }

    #[tokio::test]
    async fn test_repeated_previews_have_identical_dimensions() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_resume();

        let first = exporter
            .render_artifact(&live, ELEMENT_ID, &make_options(1.0), exporter.preview_profile)
            .await
            .unwrap();
        let second = exporter
            .render_artifact(&live, ELEMENT_ID, &make_options(1.0), exporter.preview_profile)
            .await
            .unwrap();
        assert_eq!(
            (first.bitmap_width, first.bitmap_height),
            (second.bitmap_width, second.bitmap_height)
        );
    }

    // ── gate ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_free_tier_second_export_requires_upgrade() {
        let (store, account_id) = make_store(PlanTier::Free);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store.clone(), dir.path().to_path_buf(), None);
        let live = make_live_block(100);

        exporter
            .generate_preview(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap();
        assert_eq!(store.document_count(account_id), 1);

        let before = node_count(&live);
        let err = exporter
            .generate_file(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ExportError::UpgradeRequired(ref m) if m == FREE_PLAN_LIMIT_MESSAGE)
        );
        // The gate runs before isolation, so nothing was mounted.
        assert_eq!(node_count(&live), before);
    }

    #[tokio::test]
    async fn test_signed_out_is_auth_required() {
        let store = Arc::new(InMemoryStore::new());
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_block(100);

        let err = exporter
            .generate_preview(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AUTH_REQUIRED");
    }

    // ── failures ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_missing_element_is_a_generic_failure() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None);
        let live = make_live_block(100);

        let err = exporter
            .generate_file(&live, "nope", &make_options(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Failed(ref m) if m == FILE_FAILURE_MESSAGE));

        let err = exporter
            .generate_preview(&live, "nope", &make_options(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Failed(ref m) if m == PREVIEW_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_capture_timeout_still_removes_the_container() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let timeout = Some(Duration::from_millis(1));
        let exporter = make_exporter(store, dir.path().to_path_buf(), timeout)
            .with_settle_delays(Duration::from_millis(50), Duration::from_millis(50));
        let live = make_live_block(100);
        let before = node_count(&live);

        let err = exporter
            .generate_preview(&live, ELEMENT_ID, &make_options(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Failed(_)));
        assert_eq!(node_count(&live), before);
    }

    #[tokio::test]
    async fn test_cancelled_generation_removes_the_container() {
        let (store, _) = make_store(PlanTier::Pro);
        let dir = tempfile::tempdir().unwrap();
        let exporter = make_exporter(store, dir.path().to_path_buf(), None)
            .with_settle_delays(Duration::from_secs(5), Duration::from_secs(5));
        let live = make_live_block(100);
        let before = node_count(&live);

        let options = make_options(1.0);
        let attempt = exporter.generate_preview(&live, ELEMENT_ID, &options);
        let outcome = tokio::time::timeout(Duration::from_millis(50), attempt).await;
        assert!(outcome.is_err(), "generation should still be settling");
        assert_eq!(node_count(&live), before);
    }
}
