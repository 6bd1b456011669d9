use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::models::{DocumentRecord, NewDocument};
use crate::store::{DocumentStore, StoreError};

/// Remote store with a local fallback: any remote failure is logged and the same
/// call is answered by the local store instead.
pub struct FallbackDocumentStore {
    remote: Arc<dyn DocumentStore>,
    local: Arc<dyn DocumentStore>,
}

impl FallbackDocumentStore {
    pub fn new(remote: Arc<dyn DocumentStore>, local: Arc<dyn DocumentStore>) -> Self {
        FallbackDocumentStore { remote, local }
    }
}

#[async_trait]
impl DocumentStore for FallbackDocumentStore {
    async fn list_documents(&self, account_id: Uuid) -> Result<Vec<DocumentRecord>, StoreError> {
        match self.remote.list_documents(account_id).await {
            Ok(docs) => Ok(docs),
            Err(e) => {
                warn!(%account_id, "Remote document listing failed, using local store: {e}");
                self.local.list_documents(account_id).await
            }
        }
    }

    async fn create_document(
        &self,
        account_id: Uuid,
        draft: NewDocument,
    ) -> Result<DocumentRecord, StoreError> {
        match self.remote.create_document(account_id, draft.clone()).await {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(%account_id, "Remote document insert failed, using local store: {e}");
                self.local.create_document(account_id, draft).await
            }
        }
    }
}
