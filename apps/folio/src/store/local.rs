//! Local JSON-file store: the offline fallback for plan, documents and activity.
//!
//! One file per (account, key), named `rpg_<account>_<key>.json`. Reads never fail:
//! a missing or corrupt file yields the default value, like the browser's local
//! storage it stands in for. Writes go through a single async lock so concurrent
//! read-modify-write cycles do not interleave.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{ActivityEntry, DocumentRecord, NewDocument, PlanTier};
use crate::store::{log_activity_outcome, DocumentStore, PlanLookup, StoreError};

/// Newest activity entries kept per account.
pub const ACTIVITY_LIMIT: usize = 20;

pub struct LocalStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, account_id: Uuid, key: &str) -> PathBuf {
        self.root.join(format!("rpg_{account_id}_{key}.json"))
    }

    pub async fn set_plan(&self, account_id: Uuid, tier: PlanTier) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        write_json(&self.key_path(account_id, "plan"), &tier).await
    }

    pub async fn activity(&self, account_id: Uuid) -> Vec<ActivityEntry> {
        read_json(&self.key_path(account_id, "activity")).await
    }

    // Caller holds `write_lock`.
    async fn push_activity(
        &self,
        account_id: Uuid,
        action: &str,
        details: Option<&str>,
    ) -> Result<(), StoreError> {
        let path = self.key_path(account_id, "activity");
        let mut entries: Vec<ActivityEntry> = read_json(&path).await;
        entries.insert(
            0,
            ActivityEntry {
                action: action.to_string(),
                details: details.map(str::to_string),
                time: Utc::now(),
            },
        );
        entries.truncate(ACTIVITY_LIMIT);
        write_json(&path, &entries).await
    }
}

#[async_trait]
impl PlanLookup for LocalStore {
    async fn plan_tier(&self, account_id: Uuid) -> Result<PlanTier, StoreError> {
        Ok(read_json(&self.key_path(account_id, "plan")).await)
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn list_documents(&self, account_id: Uuid) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(read_json(&self.key_path(account_id, "resumes")).await)
    }

    async fn create_document(
        &self,
        account_id: Uuid,
        draft: NewDocument,
    ) -> Result<DocumentRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.key_path(account_id, "resumes");
        let mut documents: Vec<DocumentRecord> = read_json(&path).await;

        let record = draft.into_record(Utc::now());
        documents.insert(0, record.clone());
        write_json(&path, &documents).await?;

        let logged = self
            .push_activity(account_id, "Resume created", Some(&record.name))
            .await;
        log_activity_outcome(logged, account_id, &record);
        debug!(%account_id, document_id = %record.id, "Created document in local store");
        Ok(record)
    }
}

async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(_) => return T::default(),
    };
    match serde_json::from_slice(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring unreadable local store file {}: {e}", path.display());
            T::default()
        }
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TemplateKind;

    fn make_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    /// Puts a directory where the activity file goes, so writing it fails.
    fn block_activity_log(root: &Path, account: Uuid) {
        std::fs::create_dir_all(root.join(format!("rpg_{account}_activity.json"))).unwrap();
    }

    #[tokio::test]
    async fn test_missing_files_read_as_defaults() {
        let (_dir, store) = make_store();
        let account = Uuid::new_v4();
        assert_eq!(store.plan_tier(account).await.unwrap(), PlanTier::Free);
        assert!(store.list_documents(account).await.unwrap().is_empty());
        assert!(store.activity(account).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_document_prepends_and_logs_activity() {
        let (_dir, store) = make_store();
        let account = Uuid::new_v4();

        store
            .create_document(account, NewDocument::placeholder())
            .await
            .unwrap();
        let mut second = NewDocument::placeholder();
        second.name = "Backend Resume".to_string();
        second.template = TemplateKind::Corporate;
        store.create_document(account, second).await.unwrap();

        let docs = store.list_documents(account).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "Backend Resume");
        assert_eq!(docs[1].name, "My Resume");

        let activity = store.activity(account).await;
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].action, "Resume created");
        assert_eq!(activity[0].details.as_deref(), Some("Backend Resume"));
    }

    #[tokio::test]
    async fn test_activity_is_capped() {
        let (_dir, store) = make_store();
        let account = Uuid::new_v4();
        for i in 0..(ACTIVITY_LIMIT + 5) {
            let _guard = store.write_lock.lock().await;
            store
                .push_activity(account, "Resume created", Some(&format!("run {i}")))
                .await
                .unwrap();
        }
        let activity = store.activity(account).await;
        assert_eq!(activity.len(), ACTIVITY_LIMIT);
        assert_eq!(activity[0].details.as_deref(), Some("run 24"));
    }

    #[tokio::test]
    async fn test_failed_activity_write_keeps_the_document() {
        let (dir, store) = make_store();
        let account = Uuid::new_v4();
        block_activity_log(dir.path(), account);

        let created = store
            .create_document(account, NewDocument::placeholder())
            .await
            .unwrap();
        assert_eq!(store.list_documents(account).await.unwrap(), vec![created]);
        assert!(store.activity(account).await.is_empty());
    }

    #[tokio::test]
    async fn test_plan_is_persisted() {
        let (_dir, store) = make_store();
        let account = Uuid::new_v4();
        store.set_plan(account, PlanTier::Pro).await.unwrap();
        assert_eq!(store.plan_tier(account).await.unwrap(), PlanTier::Pro);
        assert_eq!(
            store.plan_tier(Uuid::new_v4()).await.unwrap(),
            PlanTier::Free
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_default() {
        let (dir, store) = make_store();
        let account = Uuid::new_v4();
        let path = dir.path().join(format!("rpg_{account}_plan.json"));
        std::fs::write(&path, b"{not json").unwrap();
        assert_eq!(store.plan_tier(account).await.unwrap(), PlanTier::Free);

        store.set_plan(account, PlanTier::Pro).await.unwrap();
        assert_eq!(store.plan_tier(account).await.unwrap(), PlanTier::Pro);
    }
}
