use thiserror::Error;

use crate::store::StoreError;

/// Message surfaced for any non-gate failure of a file export.
pub const FILE_FAILURE_MESSAGE: &str = "Failed to generate PDF. Please try again.";
/// Message surfaced for any non-gate failure of a preview.
pub const PREVIEW_FAILURE_MESSAGE: &str = "Failed to generate PDF preview.";

/// Pipeline-level error type.
///
/// `AuthRequired` and `UpgradeRequired` are the typed gate errors; callers branch on
/// `code()` to redirect to sign-in or show an upgrade prompt. Every other variant is
/// internal and gets collapsed into `Failed` by `normalize` before it reaches a caller.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("{0}")]
    UpgradeRequired(String),

    #[error("Element with id \"{0}\" not found")]
    ElementNotFound(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

impl ExportError {
    /// Stable string discriminator, mirrored in CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::AuthRequired => "AUTH_REQUIRED",
            ExportError::UpgradeRequired(_) => "UPGRADE_REQUIRED",
            ExportError::ElementNotFound(_) => "ELEMENT_NOT_FOUND",
            ExportError::Capture(_) => "CAPTURE_FAILED",
            ExportError::Encode(_) => "ENCODE_FAILED",
            ExportError::Store(_) => "STORE_ERROR",
            ExportError::Io(_) => "IO_ERROR",
            ExportError::Failed(_) => "GENERATION_FAILED",
        }
    }

    /// True for the typed gate errors that pass through `normalize` unchanged.
    pub fn is_entitlement(&self) -> bool {
        matches!(
            self,
            ExportError::AuthRequired | ExportError::UpgradeRequired(_)
        )
    }

    /// Collapses internal failures into one opaque `Failed(message)`.
    ///
    /// The internal cause is logged here so the user-facing message stays generic.
    pub fn normalize(self, message: &str) -> Self {
        match self {
            ExportError::AuthRequired | ExportError::UpgradeRequired(_) => self,
            ExportError::Failed(_) => self,
            other => {
                tracing::error!(code = other.code(), "PDF generation failed: {other}");
                ExportError::Failed(message.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_errors_survive_normalize() {
        let auth = ExportError::AuthRequired.normalize(FILE_FAILURE_MESSAGE);
        assert_eq!(auth.code(), "AUTH_REQUIRED");

        let upgrade = ExportError::UpgradeRequired("Free plan allows 1 resume".to_string())
            .normalize(FILE_FAILURE_MESSAGE);
        assert_eq!(upgrade.code(), "UPGRADE_REQUIRED");
        assert_eq!(upgrade.to_string(), "Free plan allows 1 resume");
    }

    #[test]
    fn test_internal_errors_become_opaque() {
        let err = ExportError::ElementNotFound("resume-preview".to_string())
            .normalize(PREVIEW_FAILURE_MESSAGE);
        assert_eq!(err.code(), "GENERATION_FAILED");
        assert_eq!(err.to_string(), PREVIEW_FAILURE_MESSAGE);

        let err = ExportError::Capture("canvas security error".to_string())
            .normalize(FILE_FAILURE_MESSAGE);
        assert_eq!(err.to_string(), FILE_FAILURE_MESSAGE);
        assert!(!err.is_entitlement());
    }
}
