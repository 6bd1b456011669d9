//! Creative: gradient header, an "about me" card, then experience and projects
//! beside a narrow skills and education column.

use crate::dom::{Document, NodeId};
use crate::models::ResumeData;
use crate::templates::{contact_items, date_range, display_name, element, page_root, text};

const BODY: &str = "#374151";
const SMALL: &str = "color: #4b5563; font-size: 12px";
const CARD: &str = "padding: 16px; border-radius: 8px; margin-bottom: 16px";

pub fn render(data: &ResumeData, doc: &mut Document) -> NodeId {
    let root = page_root(doc, "color: #1f2937");
    header(doc, root, data);

    let main = element(doc, root, "div", "padding: 24px");

    if !data.contact.summary.trim().is_empty() {
        let section = element(doc, main, "section", "margin-bottom: 24px");
        dotted_heading(doc, section, "#a855f7, #ec4899", "#7e22ce", 18.0, "ABOUT ME");
        let card = element(
            doc,
            section,
            "div",
            "background: linear-gradient(to right, #faf5ff, #fdf2f8); padding: 16px; \
             border-radius: 8px",
        );
        let summary_css = format!("color: {BODY}; font-style: italic");
        text(doc, card, "p", &summary_css, &data.contact.summary);
    }

    let columns = element(doc, main, "div", "display: flex; gap: 24px");
    let wide = element(doc, columns, "div", "flex: 2");
    let narrow = element(doc, columns, "div", "flex: 1");

    experience(doc, wide, data);
    projects(doc, wide, data);
    skills(doc, narrow, data);
    education(doc, narrow, data);

    root
}

fn header(doc: &mut Document, root: NodeId, data: &ResumeData) {
    let band = element(
        doc,
        root,
        "div",
        "background: linear-gradient(to right, #9333ea, #ec4899, #fb923c); color: #ffffff; \
         padding: 24px",
    );
    text(
        doc,
        band,
        "h1",
        "font-size: 30px; font-weight: bold; margin-bottom: 12px",
        display_name(data),
    );

    // Email, phone and location on the left; links on the right.
    let items = contact_items(data);
    let link_count = [&data.contact.website, &data.contact.linkedin]
        .into_iter()
        .filter(|l| l.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .count();
    let (left_items, right_items) = items.split_at(items.len() - link_count);

    let grid = element(doc, band, "div", "display: flex; gap: 16px; font-size: 14px");
    for group in [left_items, right_items] {
        let column = element(
            doc,
            grid,
            "div",
            "flex: 1; display: flex; flex-direction: column; gap: 4px",
        );
        for item in group {
            text(doc, column, "span", "", item);
        }
    }
}

fn experience(doc: &mut Document, parent: NodeId, data: &ResumeData) {
    if data.experience.is_empty() {
        return;
    }
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    dotted_heading(doc, section, "#ec4899, #fb923c", "#be185d", 18.0, "EXPERIENCE");
    for exp in &data.experience {
        let card = element(
            doc,
            section,
            "div",
            &format!("background: linear-gradient(to right, #fdf2f8, #fff7ed); {CARD}"),
        );
        let row = element(
            doc,
            card,
            "div",
            "display: flex; justify-content: space-between; margin-bottom: 8px",
        );
        let left = element(doc, row, "div", "");
        text(doc, left, "h3", "font-weight: bold; color: #9d174d", &exp.position);
        text(doc, left, "p", "color: #c2410c; font-weight: 500", &exp.company);
        let right = element(doc, row, "div", "text-align: right; font-size: 14px; color: #4b5563");
        text(doc, right, "p", "", &date_range(&exp.start_date, &exp.end_date));
        text(doc, right, "p", "", &exp.location);
        arrows(doc, card, &exp.achievements);
    }
}

fn projects(doc: &mut Document, parent: NodeId, data: &ResumeData) {
    if data.projects.is_empty() {
        return;
    }
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    dotted_heading(doc, section, "#fb923c, #facc15", "#c2410c", 18.0, "PROJECTS");
    for project in &data.projects {
        let card = element(
            doc,
            section,
            "div",
            &format!("background: linear-gradient(to right, #fff7ed, #fefce8); {CARD}"),
        );
        let row = element(
            doc,
            card,
            "div",
            "display: flex; justify-content: space-between; margin-bottom: 8px",
        );
        text(doc, row, "h3", "font-weight: bold; color: #9a3412", &project.name);
        if let Some(link) = &project.link {
            text(doc, row, "span", "font-size: 14px; color: #ea580c", link);
        }
        let description_css = format!("color: {BODY}; margin-bottom: 12px");
        text(doc, card, "p", &description_css, &project.description);
        if !project.technologies.is_empty() {
            let chips = element(
                doc,
                card,
                "div",
                "display: flex; flex-wrap: wrap; gap: 4px; margin-bottom: 12px",
            );
            for tech in &project.technologies {
                text(
                    doc,
                    chips,
                    "span",
                    "background: linear-gradient(to right, #fed7aa, #fef08a); color: #9a3412; \
                     padding: 4px 8px; border-radius: 9999px; font-size: 12px; font-weight: 500",
                    tech,
                );
            }
        }
        arrows(doc, card, &project.highlights);
    }
}

fn skills(doc: &mut Document, parent: NodeId, data: &ResumeData) {
    if data.skills.is_empty() {
        return;
    }
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    dotted_heading(doc, section, "#4ade80, #60a5fa", "#15803d", 16.0, "SKILLS");
    for group in &data.skills {
        let entry = element(doc, section, "div", "margin-bottom: 16px");
        text(
            doc,
            entry,
            "h3",
            "font-weight: 600; color: #1d4ed8; font-size: 14px; margin-bottom: 8px",
            &group.category,
        );
        let pills = element(doc, entry, "div", "display: flex; flex-direction: column; gap: 4px");
        for skill in &group.items {
            text(
                doc,
                pills,
                "div",
                "background: linear-gradient(to right, #dcfce7, #dbeafe); color: #166534; \
                 padding: 4px 12px; border-radius: 9999px; font-size: 12px; text-align: center",
                skill,
            );
        }
    }
}

fn education(doc: &mut Document, parent: NodeId, data: &ResumeData) {
    if data.education.is_empty() {
        return;
    }
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    dotted_heading(doc, section, "#60a5fa, #c084fc", "#1d4ed8", 16.0, "EDUCATION");
    for edu in &data.education {
        let card = element(
            doc,
            section,
            "div",
            "background: linear-gradient(to right, #eff6ff, #faf5ff); padding: 12px; \
             border-radius: 8px; margin-bottom: 16px",
        );
        text(doc, card, "h3", "font-weight: bold; color: #1e40af; font-size: 14px", &edu.degree);
        text(doc, card, "p", "color: #7e22ce; font-size: 14px", &edu.field);
        text(doc, card, "p", SMALL, &edu.school);
        text(doc, card, "p", SMALL, &date_range(&edu.start_date, &edu.end_date));
        if let Some(gpa) = &edu.gpa {
            text(doc, card, "p", SMALL, &format!("GPA: {gpa}"));
        }
        if !edu.highlights.is_empty() {
            let list = element(
                doc,
                card,
                "ul",
                &format!("color: {BODY}; font-size: 12px; margin-top: 8px"),
            );
            for highlight in &edu.highlights {
                text(doc, list, "li", "margin-bottom: 4px", &format!("• {highlight}"));
            }
        }
    }
}

/// "▸ item" lines used by the experience and project cards.
fn arrows(doc: &mut Document, parent: NodeId, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let list = element(doc, parent, "ul", &format!("color: {BODY}"));
    for item in items {
        text(doc, list, "li", "margin-bottom: 4px", &format!("▸ {item}"));
    }
}

/// Section title preceded by a small gradient dot.
fn dotted_heading(
    doc: &mut Document,
    parent: NodeId,
    stops: &str,
    color: &str,
    size: f32,
    title: &str,
) {
    let row = element(
        doc,
        parent,
        "div",
        "display: flex; align-items: center; margin-bottom: 16px",
    );
    element(
        doc,
        row,
        "div",
        &format!(
            "width: 16px; height: 16px; border-radius: 9999px; margin-right: 12px; \
             background: linear-gradient(to right, {stops})"
        ),
    );
    text(
        doc,
        row,
        "h2",
        &format!("font-size: {size}px; font-weight: bold; color: {color}"),
        title,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_subtree;

    #[test]
    fn test_header_uses_three_stop_gradient() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let band = doc.children(root)[0];
        let background = doc.style(band).unwrap().background();
        match background {
            Some(crate::dom::style::Background::LinearGradient { stops, .. }) => {
                assert_eq!(stops.len(), 3)
            }
            other => panic!("expected a gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_links_sit_in_the_right_header_column() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let band = doc.children(root)[0];
        let grid = doc.children(band)[1];
        let right = doc.children(grid)[1];
        let text = doc.text_content(right);
        assert!(text.contains("sarahchen.dev"));
        assert!(!text.contains("@"));
    }

    #[test]
    fn test_main_column_is_twice_the_side_column() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let main = doc.children(root)[1];
        let columns = *doc.children(main).last().unwrap();
        let wide = doc.children(columns)[0];
        let narrow = doc.children(columns)[1];

        let layout = layout_subtree(&doc, root, 794.0).unwrap();
        let wide_w = layout.find(wide).unwrap().rect.width;
        let narrow_w = layout.find(narrow).unwrap().rect.width;
        assert!((wide_w - 2.0 * narrow_w).abs() < 1.0, "{wide_w} vs {narrow_w}");
    }
}
