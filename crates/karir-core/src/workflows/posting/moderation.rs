use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{JobListing, ListingId, ModerationStatus, PublicationStatus, UserId};

/// Admin verdict on a pending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationError {
    #[error("listing {listing} is already {status}; only pending listings can be moderated")]
    InvalidTransition {
        listing: ListingId,
        status: ModerationStatus,
    },
}

/// Apply an admin decision to a pending listing.
///
/// Approval publishes the listing in the same step; rejection leaves it
/// unpublished. Neither outcome refunds the point consumed at submission or
/// releases the active-job slot. Any state other than `Pending` is terminal
/// for this listing instance, so the transition fails and the listing is left
/// untouched.
pub fn apply_decision(
    listing: &mut JobListing,
    decision: ModerationDecision,
    notes: Option<String>,
    moderator: UserId,
    at: DateTime<Utc>,
) -> Result<(), ModerationError> {
    if listing.moderation_status != ModerationStatus::Pending {
        return Err(ModerationError::InvalidTransition {
            listing: listing.id.clone(),
            status: listing.moderation_status,
        });
    }

    match decision {
        ModerationDecision::Approved => {
            listing.moderation_status = ModerationStatus::Approved;
            listing.status = PublicationStatus::Published;
        }
        ModerationDecision::Rejected => {
            listing.moderation_status = ModerationStatus::Rejected;
        }
    }

    listing.moderation_notes = notes;
    listing.moderated_at = Some(at);
    listing.moderator = Some(moderator);

    Ok(())
}

/// Listing skipped during a bulk run, with the reason it was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedListing {
    pub listing_id: ListingId,
    pub reason: String,
}

/// Per-item outcome of a bulk moderation run. A failure on one listing never
/// blocks the rest; both sides of the split are reported back to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkModerationOutcome {
    pub applied: Vec<ListingId>,
    pub skipped: Vec<SkippedListing>,
}

impl BulkModerationOutcome {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
