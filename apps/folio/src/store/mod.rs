//! Collaborator seams consumed by the entitlement gate.
//!
//! The gate never reads plan or document state ambiently; it is handed these
//! trait objects at construction (`Arc<dyn ...>`), so tests swap in `InMemoryStore`.

pub mod fallback;
pub mod local;
pub mod memory;
pub mod postgres;

use std::fmt::Display;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Account, DocumentRecord, NewDocument, PlanTier};

pub use fallback::FallbackDocumentStore;
pub use local::LocalStore;
pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// `getCurrentAccount()`: the signed-in account, if any.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_account(&self) -> Result<Option<Account>, StoreError>;
}

/// `getPlanTier(accountId)`.
#[async_trait]
pub trait PlanLookup: Send + Sync {
    async fn plan_tier(&self, account_id: Uuid) -> Result<PlanTier, StoreError>;
}

/// `listDocuments(accountId)` / `createDocument(accountId, draft)`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(&self, account_id: Uuid) -> Result<Vec<DocumentRecord>, StoreError>;

    async fn create_document(
        &self,
        account_id: Uuid,
        draft: NewDocument,
    ) -> Result<DocumentRecord, StoreError>;
}

/// Activity logging after a document insert is best-effort. The document row
/// already exists, so a failed log write is warned about and the create still
/// succeeds; otherwise a fallback store would provision a second document.
pub(crate) fn log_activity_outcome<E: Display>(
    outcome: Result<(), E>,
    account_id: Uuid,
    record: &DocumentRecord,
) {
    if let Err(e) = outcome {
        warn!(%account_id, document_id = %record.id, "Failed to log document creation: {e}");
    }
}

/// Session fixed at startup (the CLI reads it from config).
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    account: Option<Account>,
}

impl StaticSession {
    pub fn signed_in(account: Account) -> Self {
        StaticSession {
            account: Some(account),
        }
    }

    pub fn signed_out() -> Self {
        StaticSession { account: None }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_account(&self) -> Result<Option<Account>, StoreError> {
        Ok(self.account.clone())
    }
}
