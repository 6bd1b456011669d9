use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structured resume content as edited in the builder form.
///
/// Every field defaults so partially filled drafts (and validation inputs such as
/// `{ "contact": { "fullName": "" } }`) deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub contact: ContactInfo,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub category: String,
    pub items: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Template identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The three visual templates a resume can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Dark header band, single column.
    Corporate,
    /// Tinted sidebar with skills and education, main column on the right.
    #[default]
    Modern,
    /// Gradient header, two-thirds / one-third grid.
    Creative,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Corporate,
        TemplateKind::Modern,
        TemplateKind::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Corporate => "corporate",
            TemplateKind::Modern => "modern",
            TemplateKind::Creative => "creative",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corporate" => Ok(TemplateKind::Corporate),
            "modern" => Ok(TemplateKind::Modern),
            "creative" => Ok(TemplateKind::Creative),
            other => Err(format!("unknown template '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sample content
// ────────────────────────────────────────────────────────────────────────────

impl ResumeData {
    /// A complete example resume used by `--sample` and by tests.
    pub fn sample() -> Self {
        ResumeData {
            contact: ContactInfo {
                full_name: "Sarah Chen".to_string(),
                email: "sarah.chen@email.com".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
                location: "San Francisco, CA".to_string(),
                website: Some("https://sarahchen.dev".to_string()),
                linkedin: Some("linkedin.com/in/sarahchen".to_string()),
                summary: "Software engineer with 5+ years of experience building scalable web \
                          applications. Led development teams and delivered projects that \
                          improved user engagement by 40%."
                    .to_string(),
            },
            education: vec![Education {
                id: "1".to_string(),
                school: "University of California, Berkeley".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                start_date: "2018".to_string(),
                end_date: "2022".to_string(),
                gpa: Some("3.8".to_string()),
                highlights: vec![
                    "Magna Cum Laude".to_string(),
                    "Dean's List for 6 semesters".to_string(),
                ],
            }],
            experience: vec![
                Experience {
                    id: "1".to_string(),
                    company: "TechCorp Inc.".to_string(),
                    position: "Senior Software Engineer".to_string(),
                    start_date: "Jan 2023".to_string(),
                    end_date: "Present".to_string(),
                    location: "San Francisco, CA".to_string(),
                    achievements: vec![
                        "Led development of a microservices architecture serving 1M+ daily users"
                            .to_string(),
                        "Improved application performance by 35% through caching strategies"
                            .to_string(),
                        "Mentored 3 junior developers and established code review practices"
                            .to_string(),
                    ],
                },
                Experience {
                    id: "2".to_string(),
                    company: "StartupXYZ".to_string(),
                    position: "Software Engineer".to_string(),
                    start_date: "Jun 2022".to_string(),
                    end_date: "Dec 2022".to_string(),
                    location: "Palo Alto, CA".to_string(),
                    achievements: vec![
                        "Built responsive web applications using React, TypeScript, and Node.js"
                            .to_string(),
                        "Implemented an automated testing suite that reduced bugs by 25%"
                            .to_string(),
                    ],
                },
            ],
            projects: vec![Project {
                id: "1".to_string(),
                name: "TaskFlow".to_string(),
                description: "Real-time collaborative task manager with offline sync.".to_string(),
                technologies: vec![
                    "React".to_string(),
                    "Node.js".to_string(),
                    "PostgreSQL".to_string(),
                ],
                link: Some("github.com/sarahchen/taskflow".to_string()),
                highlights: vec!["Adopted by 2,000+ teams within six months".to_string()],
            }],
            skills: vec![
                Skill {
                    category: "Languages".to_string(),
                    items: vec![
                        "TypeScript".to_string(),
                        "Python".to_string(),
                        "Go".to_string(),
                    ],
                },
                Skill {
                    category: "Cloud".to_string(),
                    items: vec!["AWS".to_string(), "Docker".to_string(), "Kubernetes".to_string()],
                },
            ],
        }
    }
}
