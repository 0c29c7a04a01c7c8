use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for companies that post jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for job listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier wrapper for abuse reports filed against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Identifier for platform users (recruiters, admins, job seekers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Company account holding the posting-credit balance and activity counters.
///
/// `job_posting_points` can never go negative: debits are checked against the
/// balance inside a single repository mutation. `active_job_posts` stays at or
/// below `max_active_jobs` whenever the latter is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub contact_email: String,
    pub whatsapp_number: Option<String>,
    pub plan_code: String,
    pub job_posting_points: u32,
    pub total_job_posts: u32,
    pub active_job_posts: u32,
    pub max_active_jobs: Option<u32>,
    pub points_last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Freelance => "Freelance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkArrangement {
    OnSite,
    Remote,
    Hybrid,
}

impl WorkArrangement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnSite => "On Site",
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Junior => "Junior",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior",
            Self::Executive => "Executive",
        }
    }
}

/// Publication state, independent of the moderation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Draft,
    Published,
    Closed,
}

impl PublicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Admin review verdict for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advertised pay band. Amounts are monthly, in the listed currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
    pub currency: String,
    pub negotiable: bool,
}

/// Content of a listing as submitted by the recruiter, before any
/// status or moderation metadata is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub category: String,
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub employment_type: EmploymentType,
    pub work_arrangement: WorkArrangement,
    pub experience_level: ExperienceLevel,
    pub salary: Option<SalaryRange>,
    pub location: String,
    pub positions_available: u32,
    pub application_deadline: NaiveDate,
}

/// A job listing as stored, carrying both publication and moderation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: ListingId,
    pub company_id: CompanyId,
    pub category: String,
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub employment_type: EmploymentType,
    pub work_arrangement: WorkArrangement,
    pub experience_level: ExperienceLevel,
    pub salary: Option<SalaryRange>,
    pub location: String,
    pub positions_available: u32,
    pub application_deadline: NaiveDate,
    pub status: PublicationStatus,
    pub moderation_status: ModerationStatus,
    pub moderation_notes: Option<String>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub moderator: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl JobListing {
    /// Materialize a freshly submitted draft. New listings always enter the
    /// moderation queue as drafts; publication happens on approval.
    pub fn from_draft(
        id: ListingId,
        company_id: CompanyId,
        draft: JobDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let JobDraft {
            category,
            created_by,
            title,
            description,
            requirements,
            benefits,
            employment_type,
            work_arrangement,
            experience_level,
            salary,
            location,
            positions_available,
            application_deadline,
        } = draft;

        Self {
            id,
            company_id,
            category,
            created_by,
            title,
            description,
            requirements,
            benefits,
            employment_type,
            work_arrangement,
            experience_level,
            salary,
            location,
            positions_available,
            application_deadline,
            status: PublicationStatus::Draft,
            moderation_status: ModerationStatus::Pending,
            moderation_notes: None,
            moderated_at: None,
            moderator: None,
            created_at,
        }
    }

    /// Job seekers only ever see listings that are published AND approved.
    pub fn is_publicly_visible(&self) -> bool {
        self.status == PublicationStatus::Published
            && self.moderation_status == ModerationStatus::Approved
    }
}
