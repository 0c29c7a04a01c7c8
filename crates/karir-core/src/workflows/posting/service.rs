use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::notifications::{standard_registry, NotificationChannel, TemplateRegistry};

use super::catalog::PointPackageCatalog;
use super::domain::{
    Company, CompanyId, JobDraft, JobListing, ListingId, ModerationStatus, PublicationStatus,
    ReportId, UserId,
};
use super::gate::{self, PostingPolicy, QuotaDenial};
use super::ledger::{self, LedgerError};
use super::moderation::{
    self, BulkModerationOutcome, ModerationDecision, ModerationError, SkippedListing,
};
use super::reports::{
    self, JobReport, ListingAction, ReportError, ReportReason, ResolutionDecision,
};
use super::repository::{
    CompanyRepository, ListingRepository, NotificationQueue, OutboundNotification, Recipient,
    ReportRepository, RepositoryError,
};

/// Service composing the point ledger, quota gate, moderation queue, and
/// report desk over caller-supplied storage and notification adapters.
pub struct JobBoardService<C, L, R, N> {
    companies: Arc<C>,
    listings: Arc<L>,
    reports: Arc<R>,
    notifications: Arc<N>,
    templates: TemplateRegistry,
    packages: PointPackageCatalog,
    policy: PostingPolicy,
}

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("job-{id:06}"))
}

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<C, L, R, N> JobBoardService<C, L, R, N>
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    pub fn new(
        companies: Arc<C>,
        listings: Arc<L>,
        reports: Arc<R>,
        notifications: Arc<N>,
        policy: PostingPolicy,
    ) -> Self {
        Self::with_templates(
            companies,
            listings,
            reports,
            notifications,
            policy,
            standard_registry(),
        )
    }

    pub fn with_templates(
        companies: Arc<C>,
        listings: Arc<L>,
        reports: Arc<R>,
        notifications: Arc<N>,
        policy: PostingPolicy,
        templates: TemplateRegistry,
    ) -> Self {
        Self {
            companies,
            listings,
            reports,
            notifications,
            templates,
            packages: PointPackageCatalog::standard(),
            policy,
        }
    }

    pub fn policy(&self) -> &PostingPolicy {
        &self.policy
    }

    pub fn packages(&self) -> &PointPackageCatalog {
        &self.packages
    }

    pub fn register_company(&self, company: Company) -> Result<(), JobBoardError> {
        self.companies.insert(company)?;
        Ok(())
    }

    pub fn company(&self, id: &CompanyId) -> Result<Company, JobBoardError> {
        Ok(self
            .companies
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Current point balance, no side effects.
    pub fn point_balance(&self, id: &CompanyId) -> Result<u32, JobBoardError> {
        Ok(ledger::balance(&self.company(id)?))
    }

    /// Credit points directly (admin adjustments; purchases go through
    /// [`Self::purchase_package`]).
    pub fn credit_points(
        &self,
        id: &CompanyId,
        amount: u32,
        bonus: u32,
    ) -> Result<u32, JobBoardError> {
        let now = Utc::now();
        let outcome = self
            .companies
            .mutate(id, |company| ledger::credit(company, amount, bonus, now))?;
        Ok(outcome?)
    }

    /// Debit points as one isolated read-modify-write; concurrent debits
    /// against the same company serialize on the repository.
    pub fn debit_points(&self, id: &CompanyId, amount: u32) -> Result<u32, JobBoardError> {
        let now = Utc::now();
        let outcome = self
            .companies
            .mutate(id, |company| ledger::debit(company, amount, now))?;
        Ok(outcome?)
    }

    /// Record a package purchase: credit base plus bonus points and queue the
    /// payment confirmation.
    pub fn purchase_package(
        &self,
        id: &CompanyId,
        package_code: &str,
    ) -> Result<u32, JobBoardError> {
        let package = self
            .packages
            .find(package_code)
            .ok_or_else(|| JobBoardError::UnknownPackage(package_code.to_string()))?
            .clone();

        let balance = self.credit_points(id, package.points, package.bonus_points)?;
        info!(company = %id, package = package.code, balance, "point package purchased");

        let company = self.company(id)?;
        let mut variables = BTreeMap::new();
        variables.insert("company_name".to_string(), company.name.clone());
        variables.insert("package_name".to_string(), package.name.to_string());
        variables.insert(
            "points_added".to_string(),
            package.total_points().to_string(),
        );
        variables.insert("balance".to_string(), balance.to_string());
        self.queue_notification("payment_completed", variables, &company);

        Ok(balance)
    }

    /// Create a new listing for the company.
    ///
    /// The quota gate, the point debit, and both counter increments run
    /// inside one company mutation, so concurrent submissions cannot
    /// over-spend the balance or the active-job cap. If the listing insert
    /// fails afterwards the debit and counters are rolled back before the
    /// failure is surfaced.
    pub fn post_job(
        &self,
        company_id: &CompanyId,
        draft: JobDraft,
    ) -> Result<JobListing, JobBoardError> {
        let now = Utc::now();
        let policy = self.policy.clone();

        let outcome = self.companies.mutate(company_id, |company| {
            gate::can_post(company, &policy)?;
            ledger::debit(company, policy.points_per_posting, now)?;
            company.total_job_posts += 1;
            company.active_job_posts += 1;
            Ok::<(), JobBoardError>(())
        })?;
        outcome?;

        let listing = JobListing::from_draft(next_listing_id(), company_id.clone(), draft, now);
        match self.listings.insert(listing) {
            Ok(listing) => {
                info!(company = %company_id, listing = %listing.id, "job listing submitted for moderation");
                Ok(listing)
            }
            Err(insert_err) => {
                let rollback = self.companies.mutate(company_id, |company| {
                    company.job_posting_points = company
                        .job_posting_points
                        .saturating_add(policy.points_per_posting);
                    company.total_job_posts = company.total_job_posts.saturating_sub(1);
                    company.active_job_posts = company.active_job_posts.saturating_sub(1);
                    Ok::<(), JobBoardError>(())
                });
                if let Err(err) = rollback {
                    warn!(company = %company_id, error = %err, "failed to roll back debit after listing insert failure");
                }
                Err(insert_err.into())
            }
        }
    }

    pub fn listing(&self, id: &ListingId) -> Result<JobListing, JobBoardError> {
        Ok(self
            .listings
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Listings awaiting an admin verdict.
    pub fn moderation_queue(&self, limit: usize) -> Result<Vec<JobListing>, JobBoardError> {
        Ok(self.listings.pending_moderation(limit)?)
    }

    /// Apply an admin decision to one pending listing and notify the company.
    pub fn moderate(
        &self,
        listing_id: &ListingId,
        decision: ModerationDecision,
        notes: Option<String>,
        moderator: UserId,
    ) -> Result<JobListing, JobBoardError> {
        let mut listing = self.listing(listing_id)?;
        moderation::apply_decision(&mut listing, decision, notes, moderator, Utc::now())?;
        self.listings.update(listing.clone())?;
        info!(listing = %listing.id, status = %listing.moderation_status, "listing moderated");

        self.notify_moderation_outcome(&listing, decision);
        Ok(listing)
    }

    /// Moderate a batch of listings, isolating per-item failures. An already
    /// moderated id lands in `skipped` while the rest proceed.
    pub fn bulk_moderate(
        &self,
        listing_ids: &[ListingId],
        decision: ModerationDecision,
        notes: Option<String>,
        moderator: UserId,
    ) -> BulkModerationOutcome {
        let mut outcome = BulkModerationOutcome::default();
        for listing_id in listing_ids {
            match self.moderate(listing_id, decision, notes.clone(), moderator.clone()) {
                Ok(listing) => outcome.applied.push(listing.id),
                Err(err) => outcome.skipped.push(SkippedListing {
                    listing_id: listing_id.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        info!(
            applied = outcome.applied_count(),
            skipped = outcome.skipped_count(),
            "bulk moderation finished"
        );
        outcome
    }

    /// Close a listing and release its active-job slot. Closing an already
    /// closed listing is a no-op so the slot is only released once.
    pub fn close_listing(&self, listing_id: &ListingId) -> Result<JobListing, JobBoardError> {
        let mut listing = self.listing(listing_id)?;
        if listing.status == PublicationStatus::Closed {
            return Ok(listing);
        }

        listing.status = PublicationStatus::Closed;
        self.listings.update(listing.clone())?;

        let released = self.companies.mutate(&listing.company_id, |company| {
            company.active_job_posts = company.active_job_posts.saturating_sub(1);
            Ok::<(), JobBoardError>(())
        })?;
        released?;

        info!(listing = %listing.id, "listing closed");
        Ok(listing)
    }

    /// Close every open listing whose application deadline has passed.
    /// Returns how many listings were closed.
    pub fn expire_due_listings(&self, today: NaiveDate) -> Result<usize, JobBoardError> {
        let due = self.listings.due_for_expiry(today)?;
        let mut closed = 0usize;
        for listing in due {
            if listing.status == PublicationStatus::Closed {
                continue;
            }
            self.close_listing(&listing.id)?;
            closed += 1;
        }
        if closed > 0 {
            info!(closed, "listings expired past their application deadline");
        }
        Ok(closed)
    }

    /// File a report against an existing listing. Duplicate reports from the
    /// same reporter are allowed.
    pub fn file_report(
        &self,
        listing_id: &ListingId,
        reporter: UserId,
        reporter_contact: Option<Recipient>,
        reason: ReportReason,
        description: String,
    ) -> Result<JobReport, JobBoardError> {
        if self.listings.fetch(listing_id)?.is_none() {
            return Err(ReportError::ListingNotFound(listing_id.clone()).into());
        }

        let report = JobReport::new(
            next_report_id(),
            listing_id.clone(),
            reporter,
            reporter_contact,
            reason,
            description,
            Utc::now(),
        );
        let report = self.reports.insert(report)?;
        info!(report = %report.id, listing = %report.listing_id, reason = report.reason.label(), "report filed");
        Ok(report)
    }

    pub fn report(&self, id: &ReportId) -> Result<JobReport, JobBoardError> {
        Ok(self.reports.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Reports still awaiting an admin verdict.
    pub fn open_reports(&self, limit: usize) -> Result<Vec<JobReport>, JobBoardError> {
        Ok(self.reports.open(limit)?)
    }

    /// Mark a pending report as opened by an admin.
    pub fn begin_review(
        &self,
        report_id: &ReportId,
        reviewer: UserId,
    ) -> Result<JobReport, JobBoardError> {
        let mut report = self.report(report_id)?;
        reports::begin_review(&mut report, reviewer, Utc::now())?;
        self.reports.update(report.clone())?;
        Ok(report)
    }

    /// Close a report with a terminal decision.
    ///
    /// A listing action only ever applies when the decision is `Resolved`;
    /// dismissals leave the listing untouched no matter what the caller
    /// passed. The action is applied before the report is persisted so a
    /// storage failure surfaces before the report looks closed.
    pub fn resolve_report(
        &self,
        report_id: &ReportId,
        decision: ResolutionDecision,
        admin_notes: Option<String>,
        listing_action: Option<ListingAction>,
        reviewer: UserId,
    ) -> Result<JobReport, JobBoardError> {
        let now = Utc::now();
        let mut report = self.report(report_id)?;
        reports::apply_resolution(
            &mut report,
            decision,
            admin_notes.clone(),
            reviewer.clone(),
            now,
        )?;

        if decision == ResolutionDecision::Resolved {
            if let Some(action) = listing_action {
                self.apply_listing_action(&report.listing_id, action, admin_notes, reviewer, now)?;
            }
        }

        self.reports.update(report.clone())?;
        info!(report = %report.id, status = %report.status, "report closed");

        self.notify_report_outcome(&report);
        Ok(report)
    }

    fn apply_listing_action(
        &self,
        listing_id: &ListingId,
        action: ListingAction,
        notes: Option<String>,
        reviewer: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), JobBoardError> {
        match action {
            // Explicit keep-as-is.
            ListingAction::Approve => Ok(()),
            ListingAction::Suspend => {
                self.close_listing(listing_id)?;
                Ok(())
            }
            ListingAction::Reject => {
                let mut listing = self.listing(listing_id)?;
                listing.moderation_status = ModerationStatus::Rejected;
                listing.moderation_notes = notes;
                listing.moderated_at = Some(at);
                listing.moderator = Some(reviewer);
                self.listings.update(listing)?;
                Ok(())
            }
        }
    }

    fn notify_moderation_outcome(&self, listing: &JobListing, decision: ModerationDecision) {
        let company = match self.companies.fetch(&listing.company_id) {
            Ok(Some(company)) => company,
            Ok(None) => return,
            Err(err) => {
                warn!(company = %listing.company_id, error = %err, "skipping moderation notification");
                return;
            }
        };

        let mut variables = BTreeMap::new();
        variables.insert("company_name".to_string(), company.name.clone());
        variables.insert("job_title".to_string(), listing.title.clone());
        let slug = match decision {
            ModerationDecision::Approved => "job_approved",
            ModerationDecision::Rejected => {
                variables.insert(
                    "notes".to_string(),
                    listing
                        .moderation_notes
                        .clone()
                        .unwrap_or_else(|| "none".to_string()),
                );
                "job_rejected"
            }
        };
        self.queue_notification(slug, variables, &company);
    }

    fn notify_report_outcome(&self, report: &JobReport) {
        let Some(recipient) = report.reporter_contact.clone() else {
            return;
        };

        let job_title = match self.listings.fetch(&report.listing_id) {
            Ok(Some(listing)) => listing.title,
            _ => report.listing_id.0.clone(),
        };

        let mut variables = BTreeMap::new();
        variables.insert("job_title".to_string(), job_title);
        variables.insert("outcome".to_string(), report.status.label().to_string());
        self.enqueue_rendered("report_resolved", variables, recipient);
    }

    /// Render for the template's channel and enqueue to the company contact.
    fn queue_notification(
        &self,
        slug: &str,
        variables: BTreeMap<String, String>,
        company: &Company,
    ) {
        let channel = match self.templates.get(slug) {
            Some(template) => template.channel,
            None => {
                warn!(%slug, "skipping notification: no such template");
                return;
            }
        };
        let recipient = match channel {
            NotificationChannel::WhatsApp => company
                .whatsapp_number
                .clone()
                .map(Recipient::WhatsApp)
                .unwrap_or_else(|| Recipient::Email(company.contact_email.clone())),
            NotificationChannel::Email => Recipient::Email(company.contact_email.clone()),
        };
        self.enqueue_rendered(slug, variables, recipient);
    }

    /// Dispatch is fire-and-forget: render or enqueue failures are logged and
    /// never unwind the state transition that triggered them.
    fn enqueue_rendered(
        &self,
        slug: &str,
        variables: BTreeMap<String, String>,
        recipient: Recipient,
    ) {
        let rendered = match self.templates.render(slug, &variables) {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(%slug, error = %err, "skipping notification: template did not render");
                return;
            }
        };

        let notification = OutboundNotification {
            template: slug.to_string(),
            recipient,
            subject: rendered.subject,
            body: rendered.body,
            variables,
        };
        if let Err(err) = self.notifications.enqueue(notification) {
            warn!(%slug, error = %err, "notification enqueue failed; state transition stands");
        }
    }
}

/// Error raised by the job board service.
#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Quota(#[from] QuotaDenial),
    #[error(transparent)]
    Moderation(#[from] ModerationError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unknown point package '{0}'")]
    UnknownPackage(String),
}

impl JobBoardError {
    /// HTTP status the error maps to at the API surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Ledger(_) | Self::Quota(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Moderation(_) => StatusCode::CONFLICT,
            Self::Report(ReportError::AlreadyResolved { .. }) => StatusCode::CONFLICT,
            Self::Report(ReportError::ListingNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UnknownPackage(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Stable machine-readable code so clients can offer the right remedy:
    /// "buy more points" reads differently from "close a listing first".
    pub fn code(&self) -> &'static str {
        match self {
            Self::Quota(denial) => denial.code(),
            Self::Ledger(LedgerError::InsufficientPoints { .. }) => "insufficient_points",
            Self::Ledger(LedgerError::InvalidAmount) => "invalid_amount",
            Self::Moderation(_) => "invalid_transition",
            Self::Report(ReportError::AlreadyResolved { .. }) => "already_resolved",
            Self::Report(ReportError::ListingNotFound(_)) => "not_found",
            Self::Repository(RepositoryError::NotFound) => "not_found",
            Self::Repository(RepositoryError::Conflict) => "conflict",
            Self::Repository(RepositoryError::Unavailable(_)) => "unavailable",
            Self::UnknownPackage(_) => "unknown_package",
        }
    }
}
