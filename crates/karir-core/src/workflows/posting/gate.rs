use serde::{Deserialize, Serialize};

use super::domain::Company;

/// Posting policy dials applied by the quota gate.
///
/// The seeded packages sell one posting per point, but the conversion is kept
/// configurable so promotional pricing can change it without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingPolicy {
    pub points_per_posting: u32,
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self {
            points_per_posting: 1,
        }
    }
}

/// Reasons the quota gate refuses a new listing. The two denials carry
/// different remedies for the caller: buy a package vs. close a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuotaDenial {
    #[error("no job posting points remaining; purchase a point package to continue")]
    NoPoints,
    #[error("active job limit of {limit} reached; close an existing listing first")]
    ActiveJobLimitReached { limit: u32 },
}

impl QuotaDenial {
    /// Stable machine-readable code for API consumers.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoPoints => "no_points",
            Self::ActiveJobLimitReached { .. } => "active_job_limit_reached",
        }
    }
}

/// Decide whether a company may create a new listing right now.
///
/// Both constraints must hold: enough points for one posting, and a free
/// active-job slot when the plan caps concurrent listings. `None` for
/// `max_active_jobs` means unlimited.
pub fn can_post(company: &Company, policy: &PostingPolicy) -> Result<(), QuotaDenial> {
    if company.job_posting_points < policy.points_per_posting {
        return Err(QuotaDenial::NoPoints);
    }

    if let Some(limit) = company.max_active_jobs {
        if company.active_job_posts >= limit {
            return Err(QuotaDenial::ActiveJobLimitReached { limit });
        }
    }

    Ok(())
}
