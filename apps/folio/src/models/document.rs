use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resume::TemplateKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Draft,
    Published,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Draft",
            DocumentStatus::Published => "Published",
        }
    }

    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("published") {
            DocumentStatus::Published
        } else {
            DocumentStatus::Draft
        }
    }
}

/// Metadata for one resume owned by an account. Counted by the entitlement gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub name: String,
    pub template: TemplateKind,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a document; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub id: Uuid,
    pub name: String,
    pub template: TemplateKind,
    pub status: DocumentStatus,
}

impl NewDocument {
    /// The placeholder created on an account's first generation attempt.
    pub fn placeholder() -> Self {
        NewDocument {
            id: Uuid::new_v4(),
            name: "My Resume".to_string(),
            template: TemplateKind::Modern,
            status: DocumentStatus::Draft,
        }
    }

    pub fn into_record(self, now: DateTime<Utc>) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            name: self.name,
            template: self.template,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row shape of the `resumes` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub name: String,
    pub template: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for DocumentRecord {
    fn from(row: DocumentRow) -> Self {
        DocumentRecord {
            id: row.id,
            name: row.name,
            // Rows written by older clients may carry unknown template ids.
            template: row.template.parse().unwrap_or_default(),
            status: DocumentStatus::parse(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One line of the per-account activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: String,
    pub details: Option<String>,
    pub time: DateTime<Utc>,
}
