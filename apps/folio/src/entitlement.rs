//! Entitlement gate. Decides whether a generation attempt may proceed.
//!
//! The gate is a two-step protocol kept visible in the API:
//! 1. `ensure_baseline_record`: if the account owns zero documents, create one
//!    placeholder draft so later attempts are counted.
//! 2. `authorize`: Free tier with one or more documents is refused, except on the
//!    attempt that just provisioned the first document.
//!
//! Step 1 always runs before step 2, so a brand-new account's first generation is
//! never blocked even though it moves the document count from 0 to 1.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::ExportError;
use crate::models::{Account, DocumentRecord, NewDocument, PlanTier};
use crate::store::{DocumentStore, PlanLookup, SessionProvider};

pub const FREE_PLAN_LIMIT_MESSAGE: &str = "Free plan allows 1 resume";

/// Why a generation attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    AuthRequired,
    UpgradeRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

impl EntitlementDecision {
    pub fn allow() -> Self {
        EntitlementDecision {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: DenialReason) -> Self {
        EntitlementDecision {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Outcome of step 1.
#[derive(Debug, Clone, PartialEq)]
pub enum Provisioning {
    /// The account already owned `count` documents; nothing was written.
    Existing { count: usize },
    /// The account owned none; this placeholder was created.
    Provisioned(DocumentRecord),
}

pub struct EntitlementGate {
    session: Arc<dyn SessionProvider>,
    plans: Arc<dyn PlanLookup>,
    documents: Arc<dyn DocumentStore>,
    // Serializes step 1 so two concurrent attempts cannot both see zero documents.
    provisioning: Mutex<()>,
}

impl EntitlementGate {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        plans: Arc<dyn PlanLookup>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        EntitlementGate {
            session,
            plans,
            documents,
            provisioning: Mutex::new(()),
        }
    }

    /// The signed-in account, or `AuthRequired`.
    ///
    /// A failing session provider counts as signed out.
    pub async fn require_account(&self) -> Result<Account, ExportError> {
        match self.session.current_account().await {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(ExportError::AuthRequired),
            Err(e) => {
                warn!("Session lookup failed, treating as signed out: {e}");
                Err(ExportError::AuthRequired)
            }
        }
    }

    /// Step 1: create the first placeholder document when the account has none.
    pub async fn ensure_baseline_record(
        &self,
        account: &Account,
    ) -> Result<Provisioning, ExportError> {
        let _guard = self.provisioning.lock().await;

        let existing = self.documents.list_documents(account.id).await?;
        if !existing.is_empty() {
            return Ok(Provisioning::Existing {
                count: existing.len(),
            });
        }

        let record = self
            .documents
            .create_document(account.id, NewDocument::placeholder())
            .await?;
        info!(account_id = %account.id, document_id = %record.id, "Provisioned first document");
        Ok(Provisioning::Provisioned(record))
    }

    /// Step 2: the tier check.
    pub async fn authorize(
        &self,
        account: &Account,
        provisioning: &Provisioning,
    ) -> Result<EntitlementDecision, ExportError> {
        let count = match provisioning {
            Provisioning::Provisioned(_) => return Ok(EntitlementDecision::allow()),
            Provisioning::Existing { count } => *count,
        };

        let tier = self.plans.plan_tier(account.id).await?;
        if tier == PlanTier::Free && count >= 1 {
            info!(account_id = %account.id, documents = count, "Free plan limit reached");
            return Ok(EntitlementDecision::deny(DenialReason::UpgradeRequired));
        }
        Ok(EntitlementDecision::allow())
    }

    /// Full gate returning the decision value instead of an error.
    pub async fn decide(&self) -> Result<EntitlementDecision, ExportError> {
        let account = match self.require_account().await {
            Ok(account) => account,
            Err(ExportError::AuthRequired) => {
                return Ok(EntitlementDecision::deny(DenialReason::AuthRequired))
            }
            Err(e) => return Err(e),
        };
        let provisioning = self.ensure_baseline_record(&account).await?;
        self.authorize(&account, &provisioning).await
    }

    /// Full gate as used by the export call sites: `AuthRequired` / `UpgradeRequired`
    /// on refusal, the provisioning outcome on success.
    pub async fn check_and_provision(&self) -> Result<Provisioning, ExportError> {
        let account = self.require_account().await?;
        let provisioning = self.ensure_baseline_record(&account).await?;
        let decision = self.authorize(&account, &provisioning).await?;

        match decision.reason {
            None => Ok(provisioning),
            Some(DenialReason::AuthRequired) => Err(ExportError::AuthRequired),
            Some(DenialReason::UpgradeRequired) => Err(ExportError::UpgradeRequired(
                FREE_PLAN_LIMIT_MESSAGE.to_string(),
            )),
        }
    }
}
