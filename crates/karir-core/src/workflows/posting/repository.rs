use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Company, CompanyId, JobListing, ListingId, ReportId};
use super::reports::JobReport;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for company accounts.
///
/// The company counters are the one contended resource in this workflow, so
/// the trait exposes a single read-modify-write primitive instead of separate
/// fetch/update calls.
pub trait CompanyRepository: Send + Sync {
    fn insert(&self, company: Company) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;

    /// Run `apply` against the stored company as one atomically-isolated
    /// mutation. Implementations must hold their write lock (or database row
    /// lock) across the whole closure, and must persist nothing when the
    /// closure returns `Err`. The inner result is handed back unchanged so
    /// domain rejections stay distinct from storage failures.
    fn mutate<T, E, F>(&self, id: &CompanyId, apply: F) -> Result<Result<T, E>, RepositoryError>
    where
        F: FnOnce(&mut Company) -> Result<T, E>;
}

/// Storage abstraction for job listings.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: JobListing) -> Result<JobListing, RepositoryError>;
    fn update(&self, listing: JobListing) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<JobListing>, RepositoryError>;
    /// Listings awaiting an admin verdict, oldest first.
    fn pending_moderation(&self, limit: usize) -> Result<Vec<JobListing>, RepositoryError>;
    /// Open listings whose application deadline fell strictly before `on`.
    fn due_for_expiry(&self, on: NaiveDate) -> Result<Vec<JobListing>, RepositoryError>;
}

/// Storage abstraction for abuse reports.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: JobReport) -> Result<JobReport, RepositoryError>;
    fn update(&self, report: JobReport) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<JobReport>, RepositoryError>;
    /// Reports not yet in a terminal state, oldest first.
    fn open(&self, limit: usize) -> Result<Vec<JobReport>, RepositoryError>;
}

/// Delivery address for a transactional message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "address")]
pub enum Recipient {
    #[serde(rename = "email")]
    Email(String),
    #[serde(rename = "whatsapp")]
    WhatsApp(String),
}

/// Rendered transactional message handed to the delivery queue. The variable
/// map is carried alongside the rendered text so downstream transports can
/// re-render with channel-specific framing if they need to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNotification {
    pub template: String,
    pub recipient: Recipient,
    pub subject: Option<String>,
    pub body: String,
    pub variables: BTreeMap<String, String>,
}

/// Trait describing the outbound notification hook (e-mail or WhatsApp
/// transport adapters). Dispatch is fire-and-forget from the workflow's
/// perspective: enqueue failures never roll back the transition that
/// triggered them.
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, notification: OutboundNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
