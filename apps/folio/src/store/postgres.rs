use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::document::DocumentRow;
use crate::models::{DocumentRecord, NewDocument};
use crate::store::{log_activity_outcome, DocumentStore, StoreError};

/// Remote document store over the `resumes` and `activity_logs` tables.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        PgDocumentStore { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_documents(&self, account_id: Uuid) -> Result<Vec<DocumentRecord>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, name, template, status, created_at, updated_at \
             FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DocumentRecord::from).collect())
    }

    async fn create_document(
        &self,
        account_id: Uuid,
        draft: NewDocument,
    ) -> Result<DocumentRecord, StoreError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            INSERT INTO resumes (id, user_id, name, template, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, template, status, created_at, updated_at
            "#,
        )
        .bind(draft.id)
        .bind(account_id)
        .bind(&draft.name)
        .bind(draft.template.as_str())
        .bind(draft.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        let record = DocumentRecord::from(row);
        info!("Inserted resume {} for user {account_id}", record.id);

        let logged = sqlx::query(
            "INSERT INTO activity_logs (user_id, action, details) VALUES ($1, $2, $3)",
        )
        .bind(account_id)
        .bind("Resume created")
        .bind(&record.name)
        .execute(&self.pool)
        .await
        .map(|_| ());
        log_activity_outcome(logged, account_id, &record);

        Ok(record)
    }
}
