//! Modern: a tinted one-third sidebar (contact, skills, education) beside a
//! two-thirds main column (summary, experience, projects).

use crate::dom::{Document, NodeId};
use crate::models::ResumeData;
use crate::templates::{bullets, contact_items, date_range, display_name, element, page_root, text};

const HEADING: &str = "#1e3a8a";
const ACCENT: &str = "#1e40af";
const BODY: &str = "#374151";
const MUTED: &str = "#6b7280";
const CHIP: &str = "background: #dbeafe; color: #1d4ed8; padding: 2px 8px; \
                    border-radius: 4px; font-size: 12px";

pub fn render(data: &ResumeData, doc: &mut Document) -> NodeId {
    let root = page_root(doc, "color: #1f2937");
    let columns = element(doc, root, "div", "display: flex");
    let sidebar = element(
        doc,
        columns,
        "div",
        "width: 33.333%; background: #eff6ff; padding: 24px",
    );
    let main = element(doc, columns, "div", "width: 66.667%; padding: 24px");

    sidebar_contact(doc, sidebar, data);
    sidebar_skills(doc, sidebar, data);
    sidebar_education(doc, sidebar, data);

    if !data.contact.summary.trim().is_empty() {
        let section = main_section(doc, main, "PROFESSIONAL SUMMARY");
        text(doc, section, "p", &format!("color: {BODY}"), &data.contact.summary);
    }

    if !data.experience.is_empty() {
        let section = main_section(doc, main, "EXPERIENCE");
        for exp in &data.experience {
            let entry = element(doc, section, "div", "margin-bottom: 20px");
            let position_css = format!("font-weight: bold; color: {ACCENT}; font-size: 16px");
            text(doc, entry, "h3", &position_css, &exp.position);
            let row = element(
                doc,
                entry,
                "div",
                "display: flex; justify-content: space-between; align-items: center",
            );
            text(doc, row, "p", "color: #4b5563; font-weight: 500", &exp.company);
            let dates_css = format!("font-size: 14px; color: {MUTED}");
            text(doc, row, "p", &dates_css, &date_range(&exp.start_date, &exp.end_date));
            if !exp.location.trim().is_empty() {
                text(doc, entry, "p", &dates_css, &exp.location);
            }
            let list_css = format!("color: {BODY}; margin-top: 8px");
            bullets(doc, entry, &exp.achievements, &list_css);
        }
    }

    if !data.projects.is_empty() {
        let section = main_section(doc, main, "PROJECTS");
        for project in &data.projects {
            let entry = element(doc, section, "div", "margin-bottom: 16px");
            let row = element(
                doc,
                entry,
                "div",
                "display: flex; justify-content: space-between; margin-bottom: 8px",
            );
            text(doc, row, "h3", &format!("font-weight: bold; color: {ACCENT}"), &project.name);
            if let Some(link) = &project.link {
                text(doc, row, "span", "font-size: 14px; color: #2563eb", link);
            }
            let description_css = format!("color: {BODY}; margin-bottom: 8px");
            text(doc, entry, "p", &description_css, &project.description);
            if !project.technologies.is_empty() {
                let stack = element(doc, entry, "div", "margin-bottom: 8px");
                text(
                    doc,
                    stack,
                    "span",
                    "font-size: 14px; font-weight: 600; color: #4b5563",
                    "Tech Stack:",
                );
                let chips = element(
                    doc,
                    stack,
                    "div",
                    "display: flex; flex-wrap: wrap; gap: 4px; margin-top: 4px",
                );
                for tech in &project.technologies {
                    text(
                        doc,
                        chips,
                        "span",
                        "background: #f3f4f6; color: #374151; padding: 2px 8px; \
                         border-radius: 4px; font-size: 12px",
                        tech,
                    );
                }
            }
            bullets(doc, entry, &project.highlights, &format!("color: {BODY}"));
        }
    }

    root
}

fn sidebar_contact(doc: &mut Document, sidebar: NodeId, data: &ResumeData) {
    let block = element(doc, sidebar, "div", "margin-bottom: 24px");
    let name_css =
        format!("font-size: 20px; font-weight: bold; color: {HEADING}; margin-bottom: 16px");
    text(doc, block, "h1", &name_css, display_name(data));
    let list = element(
        doc,
        block,
        "div",
        "display: flex; flex-direction: column; gap: 8px; font-size: 14px",
    );
    for item in contact_items(data) {
        text(doc, list, "span", "color: #374151", item);
    }
}

fn sidebar_skills(doc: &mut Document, sidebar: NodeId, data: &ResumeData) {
    if data.skills.is_empty() {
        return;
    }
    let block = sidebar_section(doc, sidebar, "SKILLS");
    for group in &data.skills {
        let entry = element(doc, block, "div", "margin-bottom: 12px");
        let category_css =
            format!("font-weight: 600; color: {ACCENT}; font-size: 14px; margin-bottom: 4px");
        text(doc, entry, "h3", &category_css, &group.category);
        let chips = element(doc, entry, "div", "display: flex; flex-wrap: wrap; gap: 4px");
        for skill in &group.items {
            text(doc, chips, "span", CHIP, skill);
        }
    }
}

fn sidebar_education(doc: &mut Document, sidebar: NodeId, data: &ResumeData) {
    if data.education.is_empty() {
        return;
    }
    let block = sidebar_section(doc, sidebar, "EDUCATION");
    for edu in &data.education {
        let entry = element(doc, block, "div", "margin-bottom: 16px");
        let degree_css = format!("font-weight: 600; color: {ACCENT}; font-size: 14px");
        text(doc, entry, "h3", &degree_css, &edu.degree);
        text(doc, entry, "p", &format!("color: {BODY}; font-size: 14px"), &edu.field);
        let small = "color: #4b5563; font-size: 12px";
        text(doc, entry, "p", small, &edu.school);
        text(doc, entry, "p", small, &date_range(&edu.start_date, &edu.end_date));
        if let Some(gpa) = &edu.gpa {
            text(doc, entry, "p", small, &format!("GPA: {gpa}"));
        }
        let list_css = format!("color: {BODY}; font-size: 12px; margin-top: 4px");
        bullets(doc, entry, &edu.highlights, &list_css);
    }
}

fn sidebar_section(doc: &mut Document, parent: NodeId, title: &str) -> NodeId {
    let block = element(doc, parent, "div", "margin-bottom: 24px");
    text(
        doc,
        block,
        "h2",
        &format!(
            "font-size: 16px; font-weight: bold; color: {HEADING}; margin-bottom: 12px; \
             padding-bottom: 4px; border-bottom: 1px solid #bfdbfe"
        ),
        title,
    );
    block
}

fn main_section(doc: &mut Document, parent: NodeId, title: &str) -> NodeId {
    let section = element(doc, parent, "section", "margin-bottom: 24px");
    text(
        doc,
        section,
        "h2",
        &format!(
            "font-size: 18px; font-weight: bold; color: {HEADING}; margin-bottom: 12px; \
             padding-bottom: 4px; border-bottom: 2px solid #2563eb"
        ),
        title,
    );
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_subtree;

    #[test]
    fn test_sidebar_is_one_third_of_the_page() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let columns = doc.children(root)[0];
        let sidebar = doc.children(columns)[0];

        let layout = layout_subtree(&doc, root, 794.0).unwrap();
        let sidebar_box = layout.find(sidebar).unwrap();
        assert!((sidebar_box.rect.width - 793.7 / 3.0).abs() < 1.0);
    }

    #[test]
    fn test_skills_render_as_chips() {
        let mut doc = Document::new();
        let root = render(&ResumeData::sample(), &mut doc);
        let chip = doc
            .descendants(root)
            .into_iter()
            .find(|&n| doc.text_content(n) == "Kubernetes" && doc.element(n).is_some())
            .unwrap();
        assert_eq!(doc.style(chip).unwrap().get("border-radius"), Some("4px"));
    }
}
