// Resume templates: pure renderers from `ResumeData` to a detached element
// subtree. Every template shares the same page substrate (white, 210mm wide,
// at least 297mm tall, 11px text at line-height 1.4) so the export pipeline
// can treat them interchangeably.

pub mod corporate;
pub mod creative;
pub mod modern;

use crate::dom::{Document, InlineStyle, NodeId};
use crate::models::{ResumeData, TemplateKind};

/// Inline style of every template root.
pub const PAGE_STYLE: &str = "background: #ffffff; color: #000000; width: 210mm; \
     min-height: 297mm; margin: 0 auto; font-family: Inter, sans-serif; \
     font-size: 11px; line-height: 1.4";

/// Shown in place of an empty name.
pub const NAME_PLACEHOLDER: &str = "Your Name";

/// Id of the editor's live preview element.
pub const PREVIEW_ELEMENT_ID: &str = "resume-preview";
/// Scale of the editor's thumbnail view.
pub const THUMBNAIL_SCALE: f32 = 0.35;

/// Builds the subtree for `kind` and returns its detached root.
pub fn render(kind: TemplateKind, data: &ResumeData, doc: &mut Document) -> NodeId {
    match kind {
        TemplateKind::Corporate => corporate::render(data, doc),
        TemplateKind::Modern => modern::render(data, doc),
        TemplateKind::Creative => creative::render(data, doc),
    }
}

/// Mounts the on-screen thumbnail: a wrapper shrunk with `scale(thumbnail_scale)`
/// from its top-left corner, holding the rendered template tagged `element_id`.
///
/// Returns the tagged template root, i.e. the handle the exporter looks up.
pub fn mount_preview(
    doc: &mut Document,
    kind: TemplateKind,
    data: &ResumeData,
    element_id: &str,
    thumbnail_scale: f32,
) -> NodeId {
    let body = doc.body();
    let wrapper = element(
        doc,
        body,
        "div",
        &format!("transform: scale({thumbnail_scale}); transform-origin: top left"),
    );
    let root = render(kind, data, doc);
    if let Some(el) = doc.element_mut(root) {
        el.id = Some(element_id.to_string());
    }
    doc.append_child(wrapper, root);
    root
}

// ────────────────────────────────────────────────────────────────────────────
// Markup helpers shared by the templates
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn page_root(doc: &mut Document, extra_css: &str) -> NodeId {
    let root = doc.create_element("div");
    set_style(doc, root, &format!("{PAGE_STYLE}; {extra_css}"));
    root
}

/// Appends a styled element to `parent`.
pub(crate) fn element(doc: &mut Document, parent: NodeId, tag: &str, css: &str) -> NodeId {
    let id = doc.create_element(tag);
    set_style(doc, id, css);
    doc.append_child(parent, id);
    id
}

/// Appends a styled element holding a single text run.
pub(crate) fn text(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    css: &str,
    content: &str,
) -> NodeId {
    let id = element(doc, parent, tag, css);
    let run = doc.create_text(content);
    doc.append_child(id, run);
    id
}

/// One "• item" line per entry, indented like a disc list.
pub(crate) fn bullets(doc: &mut Document, parent: NodeId, items: &[String], css: &str) {
    if items.is_empty() {
        return;
    }
    let list = element(doc, parent, "ul", &format!("margin-left: 16px; {css}"));
    for item in items {
        text(doc, list, "li", "margin-bottom: 4px", &format!("• {item}"));
    }
}

pub(crate) fn display_name(data: &ResumeData) -> &str {
    let name = data.contact.full_name.trim();
    if name.is_empty() {
        NAME_PLACEHOLDER
    } else {
        name
    }
}

/// Contact fields in display order, skipping blanks.
pub(crate) fn contact_items(data: &ResumeData) -> Vec<&str> {
    let c = &data.contact;
    [
        Some(c.email.as_str()),
        Some(c.phone.as_str()),
        Some(c.location.as_str()),
        c.website.as_deref(),
        c.linkedin.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect()
}

pub(crate) fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => s.to_string(),
        ("", e) => e.to_string(),
        (s, e) => format!("{s} - {e}"),
    }
}

fn set_style(doc: &mut Document, id: NodeId, css: &str) {
    if let Some(style) = doc.style_mut(id) {
        *style = InlineStyle::parse(css);
    }
}
