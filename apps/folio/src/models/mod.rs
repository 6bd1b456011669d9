pub mod account;
pub mod document;
pub mod resume;

pub use account::{Account, PlanTier};
pub use document::{ActivityEntry, DocumentRecord, DocumentStatus, NewDocument};
pub use resume::{ResumeData, TemplateKind};
