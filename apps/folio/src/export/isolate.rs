//! Render isolation: an off-screen, fixed-width copy of a live element.
//!
//! The clone never carries the live view's thumbnail scaling. Every `scale`
//! component is stripped from every inline transform in the copied subtree and
//! the root is pinned to the page's reference width, so the capture always
//! happens at true size.

use std::sync::{Arc, MutexGuard};

use tracing::debug;

use crate::dom::style::strip_scale;
use crate::dom::{Document, NodeId, SharedDocument};
use crate::errors::ExportError;
use crate::export::page::PageFormat;

/// Off-screen container mounted under `body`. Removed on drop.
///
/// Holding the mount keeps the clone in the live document; dropping it (on
/// success, on an error path, or when the owning future is cancelled) removes
/// the container and frees the clone.
#[derive(Debug)]
pub struct OffscreenMount {
    doc: SharedDocument,
    container: NodeId,
    clone_root: NodeId,
    released: bool,
}

impl OffscreenMount {
    pub fn clone_root(&self) -> NodeId {
        self.clone_root
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Removes the container now instead of at drop.
    pub fn release(mut self) {
        self.unmount();
    }

    fn unmount(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut doc = lock(&self.doc);
        if doc.remove(self.container) {
            debug!(container = ?self.container, "Removed off-screen container");
        }
    }
}

impl Drop for OffscreenMount {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Clones `handle` into a new off-screen container appended to `body`.
pub fn isolate(
    live: &SharedDocument,
    handle: NodeId,
    page: &PageFormat,
) -> Result<OffscreenMount, ExportError> {
    let width = page.reference_width_px;
    let height = page.reference_height_px;

    let mut doc = lock(live);
    if doc.element(handle).is_none() {
        return Err(ExportError::Capture(format!(
            "{handle:?} is not an element"
        )));
    }
    let clone_root = doc
        .deep_clone(handle)
        .ok_or_else(|| ExportError::Capture("failed to clone element".to_string()))?;

    let stripped = strip_scale_transforms(&mut doc, clone_root);

    if let Some(style) = doc.style_mut(clone_root) {
        style.set("transform", "none");
        style.set("width", &format!("{width}px"));
        style.set("height", "auto");
        style.set("min-height", &format!("{height}px"));
        style.set("margin", "0");
        style.set("padding", "0");
    }

    let container = doc.create_element("div");
    if let Some(style) = doc.style_mut(container) {
        for (prop, value) in [
            ("position", "absolute".to_string()),
            ("left", "-9999px".to_string()),
            ("top", "0".to_string()),
            ("width", format!("{width}px")),
            ("height", format!("{height}px")),
            ("overflow", "visible".to_string()),
            ("background-color", "#ffffff".to_string()),
            ("font-family", "Inter, system-ui, sans-serif".to_string()),
            ("font-size", "11px".to_string()),
            ("line-height", "1.4".to_string()),
        ] {
            style.set(prop, &value);
        }
    }
    doc.append_child(container, clone_root);
    let body = doc.body();
    doc.append_child(body, container);

    debug!(
        width,
        height,
        stripped,
        slots = doc.slot_count(),
        page = %page.kind,
        "Mounted off-screen clone"
    );

    Ok(OffscreenMount {
        doc: Arc::clone(live),
        container,
        clone_root,
        released: false,
    })
}

/// Strips scale components from every inline transform under `root`, dropping
/// the property when nothing else remains. Returns the number of nodes changed.
fn strip_scale_transforms(doc: &mut Document, root: NodeId) -> usize {
    let mut changed = 0;
    for node in std::iter::once(root).chain(doc.descendants(root)) {
        let Some(style) = doc.style_mut(node) else {
            continue;
        };
        let Some(raw) = style.get("transform").map(str::to_string) else {
            continue;
        };
        if !raw.to_ascii_lowercase().contains("scale") {
            continue;
        }
        match strip_scale(&raw) {
            Some(rest) => style.set("transform", &rest),
            None => style.remove("transform"),
        }
        changed += 1;
    }
    changed
}

fn lock(doc: &SharedDocument) -> MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
