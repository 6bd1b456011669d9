use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Account, DocumentRecord, NewDocument, PlanTier};
use crate::store::{DocumentStore, PlanLookup, SessionProvider, StoreError};

/// Session, plans and documents held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    session: Mutex<Option<Account>>,
    plans: Mutex<HashMap<Uuid, PlanTier>>,
    documents: Mutex<HashMap<Uuid, Vec<DocumentRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `account` signed in on the given tier.
    pub fn with_account(account: Account, tier: PlanTier) -> Self {
        let store = Self::new();
        store.set_plan(account.id, tier);
        store.sign_in(account);
        store
    }

    pub fn sign_in(&self, account: Account) {
        if let Ok(mut session) = self.session.lock() {
            *session = Some(account);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut session) = self.session.lock() {
            *session = None;
        }
    }

    pub fn set_plan(&self, account_id: Uuid, tier: PlanTier) {
        if let Ok(mut plans) = self.plans.lock() {
            plans.insert(account_id, tier);
        }
    }

    pub fn document_count(&self, account_id: Uuid) -> usize {
        self.documents
            .lock()
            .map(|docs| docs.get(&account_id).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable(format!("in-memory {what} lock poisoned"))
}

#[async_trait]
impl SessionProvider for InMemoryStore {
    async fn current_account(&self) -> Result<Option<Account>, StoreError> {
        let session = self.session.lock().map_err(|_| poisoned("session"))?;
        Ok(session.clone())
    }
}

#[async_trait]
impl PlanLookup for InMemoryStore {
    async fn plan_tier(&self, account_id: Uuid) -> Result<PlanTier, StoreError> {
        let plans = self.plans.lock().map_err(|_| poisoned("plan"))?;
        Ok(plans.get(&account_id).copied().unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_documents(&self, account_id: Uuid) -> Result<Vec<DocumentRecord>, StoreError> {
        let docs = self.documents.lock().map_err(|_| poisoned("document"))?;
        Ok(docs.get(&account_id).cloned().unwrap_or_default())
    }

    async fn create_document(
        &self,
        account_id: Uuid,
        draft: NewDocument,
    ) -> Result<DocumentRecord, StoreError> {
        let record = draft.into_record(Utc::now());
        let mut docs = self.documents.lock().map_err(|_| poisoned("document"))?;
        docs.entry(account_id).or_default().insert(0, record.clone());
        Ok(record)
    }
}
