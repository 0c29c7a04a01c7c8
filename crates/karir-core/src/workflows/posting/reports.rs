use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ListingId, ReportId, UserId};
use super::repository::Recipient;

/// Policy violation alleged by the reporting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Inappropriate,
    Fake,
    Misleading,
    Other,
}

impl ReportReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Inappropriate => "inappropriate",
            Self::Fake => "fake",
            Self::Misleading => "misleading",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Resolved and dismissed reports are immutable.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal outcome an admin picks when closing a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionDecision {
    Resolved,
    Dismissed,
}

/// Side-effect action on the reported listing, applied only when the report
/// is resolved (never on dismissal). `Approve` is an explicit keep-as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingAction {
    Reject,
    Suspend,
    Approve,
}

/// User-submitted flag against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub id: ReportId,
    pub listing_id: ListingId,
    pub reporter: UserId,
    pub reporter_contact: Option<Recipient>,
    pub reason: ReportReason,
    pub description: String,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewer: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl JobReport {
    pub fn new(
        id: ReportId,
        listing_id: ListingId,
        reporter: UserId,
        reporter_contact: Option<Recipient>,
        reason: ReportReason,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            listing_id,
            reporter,
            reporter_contact,
            reason,
            description,
            status: ReportStatus::Pending,
            admin_notes: None,
            reviewed_at: None,
            reviewer: None,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("report {report} is already {status}; terminal reports are immutable")]
    AlreadyResolved {
        report: ReportId,
        status: ReportStatus,
    },
    #[error("job listing {0} does not exist")]
    ListingNotFound(ListingId),
}

/// Mark a pending report as opened by an admin. Calling this again while the
/// report is still under review is a no-op; terminal reports refuse.
pub fn begin_review(
    report: &mut JobReport,
    reviewer: UserId,
    at: DateTime<Utc>,
) -> Result<(), ReportError> {
    match report.status {
        ReportStatus::Pending => {
            report.status = ReportStatus::Reviewed;
            report.reviewer = Some(reviewer);
            report.reviewed_at = Some(at);
            Ok(())
        }
        ReportStatus::Reviewed => Ok(()),
        ReportStatus::Resolved | ReportStatus::Dismissed => Err(ReportError::AlreadyResolved {
            report: report.id.clone(),
            status: report.status,
        }),
    }
}

/// Move a report into its terminal state, recording who decided and when.
/// The listing side effect, if any, is the caller's responsibility so it can
/// share the report's unit of work.
pub fn apply_resolution(
    report: &mut JobReport,
    decision: ResolutionDecision,
    admin_notes: Option<String>,
    reviewer: UserId,
    at: DateTime<Utc>,
) -> Result<(), ReportError> {
    if report.status.is_terminal() {
        return Err(ReportError::AlreadyResolved {
            report: report.id.clone(),
            status: report.status,
        });
    }

    report.status = match decision {
        ResolutionDecision::Resolved => ReportStatus::Resolved,
        ResolutionDecision::Dismissed => ReportStatus::Dismissed,
    };
    report.admin_notes = admin_notes;
    report.reviewer = Some(reviewer);
    report.reviewed_at = Some(at);

    Ok(())
}
