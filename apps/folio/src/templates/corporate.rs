//! Corporate: a dark header band over a single column of ruled sections.

use crate::dom::{Document, NodeId};
use crate::models::ResumeData;
use crate::templates::{bullets, contact_items, date_range, display_name, element, page_root, text};

const INK: &str = "#1e293b";
const BODY: &str = "#334155";
const MUTED: &str = "#475569";
const SPLIT_ROW: &str = "display: flex; justify-content: space-between; margin-bottom: 4px";

pub fn render(data: &ResumeData, doc: &mut Document) -> NodeId {
    let root = page_root(doc, "");

    let header_css = format!("background: {INK}; color: #ffffff; padding: 24px");
    let header = element(doc, root, "div", &header_css);
    text(
        doc,
        header,
        "h1",
        "font-size: 24px; font-weight: bold; margin-bottom: 8px",
        display_name(data),
    );
    let contacts = element(
        doc,
        header,
        "div",
        "display: flex; flex-wrap: wrap; gap: 16px; font-size: 14px",
    );
    for item in contact_items(data) {
        text(doc, contacts, "span", "", item);
    }

    let main = element(doc, root, "div", "padding: 24px");

    if !data.contact.summary.trim().is_empty() {
        let section = ruled_section(doc, main, "PROFESSIONAL SUMMARY");
        text(doc, section, "p", &format!("color: {BODY}"), &data.contact.summary);
    }

    if !data.experience.is_empty() {
        let section = ruled_section(doc, main, "PROFESSIONAL EXPERIENCE");
        for exp in &data.experience {
            let entry = element(doc, section, "div", "margin-bottom: 16px");
            let row = element(doc, entry, "div", SPLIT_ROW);
            let left = element(doc, row, "div", "");
            text(doc, left, "h3", &format!("font-weight: bold; color: {INK}"), &exp.position);
            let company_css = format!("color: {MUTED}; font-weight: 500");
            text(doc, left, "p", &company_css, &exp.company);
            let right_css = format!("text-align: right; font-size: 14px; color: {MUTED}");
            let right = element(doc, row, "div", &right_css);
            text(doc, right, "p", "", &date_range(&exp.start_date, &exp.end_date));
            text(doc, right, "p", "", &exp.location);
            bullets(doc, entry, &exp.achievements, &format!("color: {BODY}"));
        }
    }

    if !data.education.is_empty() {
        let section = ruled_section(doc, main, "EDUCATION");
        for edu in &data.education {
            let entry = element(doc, section, "div", "margin-bottom: 12px");
            let row = element(doc, entry, "div", "display: flex; justify-content: space-between");
            let left = element(doc, row, "div", "");
            text(
                doc,
                left,
                "h3",
                &format!("font-weight: bold; color: {INK}"),
                &format!("{} in {}", edu.degree, edu.field),
            );
            text(doc, left, "p", &format!("color: {MUTED}"), &edu.school);
            if let Some(gpa) = &edu.gpa {
                let gpa_css = format!("color: {MUTED}; font-size: 14px");
                text(doc, left, "p", &gpa_css, &format!("GPA: {gpa}"));
            }
            let right_css = format!("text-align: right; font-size: 14px; color: {MUTED}");
            let right = element(doc, row, "div", &right_css);
            text(doc, right, "p", "", &date_range(&edu.start_date, &edu.end_date));
            bullets(doc, entry, &edu.highlights, &format!("color: {BODY}; margin-top: 4px"));
        }
    }

    if !data.projects.is_empty() {
        let section = ruled_section(doc, main, "KEY PROJECTS");
        for project in &data.projects {
            let entry = element(doc, section, "div", "margin-bottom: 16px");
            let row = element(doc, entry, "div", SPLIT_ROW);
            text(doc, row, "h3", &format!("font-weight: bold; color: {INK}"), &project.name);
            if let Some(link) = &project.link {
                text(doc, row, "span", &format!("font-size: 14px; color: {MUTED}"), link);
            }
            let description_css = format!("color: {BODY}; margin-bottom: 8px");
            text(doc, entry, "p", &description_css, &project.description);
            if !project.technologies.is_empty() {
                text(
                    doc,
                    entry,
                    "p",
                    &format!("font-size: 14px; color: {MUTED}; margin-bottom: 8px"),
                    &format!("Technologies: {}", project.technologies.join(", ")),
                );
            }
            bullets(doc, entry, &project.highlights, &format!("color: {BODY}"));
        }
    }

    if !data.skills.is_empty() {
        let section = ruled_section(doc, main, "TECHNICAL SKILLS");
        for group in &data.skills {
            text(
                doc,
                section,
                "div",
                &format!("margin-bottom: 8px; color: {BODY}"),
                &format!("{}: {}", group.category, group.items.join(", ")),
            );
        }
    }

    root
}

/// A section with a heading ruled by a 2px underline.
fn ruled_section(doc: &mut Document, parent: NodeId, title: &str) -> NodeId {
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    text(
        doc,
        section,
        "h2",
        &format!(
            "font-size: 18px; font-weight: bold; color: {INK}; \
             border-bottom: 2px solid {INK}; padding-bottom: 4px; margin-bottom: 12px"
        ),
        title,
    );
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_follow_data() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let text = doc.text_content(root);
        for heading in [
            "PROFESSIONAL SUMMARY",
            "PROFESSIONAL EXPERIENCE",
            "EDUCATION",
            "KEY PROJECTS",
            "TECHNICAL SKILLS",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("Languages: TypeScript, Python, Go"));
        assert!(text.contains("Jan 2023 - Present"));
    }

    #[test]
    fn test_header_band_is_dark() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let header = doc.children(root)[0];
        assert_eq!(doc.style(header).unwrap().get("background"), Some(INK));
    }
}
