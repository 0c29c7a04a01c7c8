//! Job posting credits, moderation, and report handling.
//!
//! A company spends posting points to submit a listing, the quota gate checks
//! the balance and the active-job cap in one isolated company mutation, every
//! new listing waits in the moderation queue, and published listings can be
//! reported and acted on by admins. Storage and notification transport are
//! trait boundaries; the service never talks to a database directly.

pub mod catalog;
pub mod domain;
pub(crate) mod gate;
pub(crate) mod ledger;
pub mod moderation;
pub mod reports;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{PointPackage, PointPackageCatalog, SubscriptionPlan, SubscriptionPlanCatalog};
pub use domain::{
    Company, CompanyId, EmploymentType, ExperienceLevel, JobDraft, JobListing, ListingId,
    ModerationStatus, PublicationStatus, ReportId, SalaryRange, UserId, WorkArrangement,
};
pub use gate::{PostingPolicy, QuotaDenial};
pub use ledger::LedgerError;
pub use moderation::{
    BulkModerationOutcome, ModerationDecision, ModerationError, SkippedListing,
};
pub use reports::{
    JobReport, ListingAction, ReportError, ReportReason, ReportStatus, ResolutionDecision,
};
pub use repository::{
    CompanyRepository, ListingRepository, NotificationError, NotificationQueue,
    OutboundNotification, Recipient, ReportRepository, RepositoryError,
};
pub use router::board_router;
pub use service::{JobBoardError, JobBoardService};
