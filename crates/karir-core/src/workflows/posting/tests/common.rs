use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::posting::domain::{
    Company, CompanyId, EmploymentType, ExperienceLevel, JobDraft, JobListing, ListingId,
    ModerationStatus, PublicationStatus, ReportId, SalaryRange, UserId, WorkArrangement,
};
use crate::workflows::posting::gate::PostingPolicy;
use crate::workflows::posting::reports::JobReport;
use crate::workflows::posting::repository::{
    CompanyRepository, ListingRepository, NotificationError, NotificationQueue,
    OutboundNotification, ReportRepository, RepositoryError,
};
use crate::workflows::posting::service::JobBoardService;

pub(super) const COMPANY: &str = "nusantara";

pub(super) fn company_id() -> CompanyId {
    CompanyId(COMPANY.to_string())
}

pub(super) fn admin() -> UserId {
    UserId("admin-1".to_string())
}

pub(super) fn company(points: u32, max_active_jobs: Option<u32>) -> Company {
    Company {
        id: company_id(),
        name: "Nusantara Teknologi".to_string(),
        contact_email: "talent@nusantara.example".to_string(),
        whatsapp_number: Some("+628111234567".to_string()),
        plan_code: "professional".to_string(),
        job_posting_points: points,
        total_job_posts: 0,
        active_job_posts: 0,
        max_active_jobs,
        points_last_updated: None,
    }
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        category: "engineering".to_string(),
        created_by: UserId("recruiter-1".to_string()),
        title: "Backend Engineer".to_string(),
        description: "Own the listing and billing services.".to_string(),
        requirements: vec!["3+ years with Rust or Go".to_string()],
        benefits: vec!["Health coverage".to_string(), "Remote budget".to_string()],
        employment_type: EmploymentType::FullTime,
        work_arrangement: WorkArrangement::Hybrid,
        experience_level: ExperienceLevel::Mid,
        salary: Some(SalaryRange {
            min: 15_000_000,
            max: 25_000_000,
            currency: "IDR".to_string(),
            negotiable: true,
        }),
        location: "Jakarta".to_string(),
        positions_available: 2,
        application_deadline: NaiveDate::from_ymd_opt(2026, 9, 30).expect("valid date"),
    }
}

pub(super) type MemoryService =
    JobBoardService<MemoryCompanies, MemoryListings, MemoryReports, MemoryNotifications>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryCompanies>,
    Arc<MemoryListings>,
    Arc<MemoryReports>,
    Arc<MemoryNotifications>,
) {
    let companies = Arc::new(MemoryCompanies::default());
    let listings = Arc::new(MemoryListings::default());
    let reports = Arc::new(MemoryReports::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = JobBoardService::new(
        companies.clone(),
        listings.clone(),
        reports.clone(),
        notifications.clone(),
        PostingPolicy::default(),
    );
    (service, companies, listings, reports, notifications)
}

/// Service with one registered company, the common starting point.
pub(super) fn seeded_service(
    points: u32,
    max_active_jobs: Option<u32>,
) -> (
    MemoryService,
    Arc<MemoryCompanies>,
    Arc<MemoryListings>,
    Arc<MemoryReports>,
    Arc<MemoryNotifications>,
) {
    let (service, companies, listings, reports, notifications) = build_service();
    service
        .register_company(company(points, max_active_jobs))
        .expect("company registers");
    (service, companies, listings, reports, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryCompanies {
    records: Arc<Mutex<HashMap<CompanyId, Company>>>,
}

impl CompanyRepository for MemoryCompanies {
    fn insert(&self, company: Company) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("company mutex poisoned");
        if guard.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(company.id.clone(), company);
        Ok(())
    }

    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let guard = self.records.lock().expect("company mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn mutate<T, E, F>(&self, id: &CompanyId, apply: F) -> Result<Result<T, E>, RepositoryError>
    where
        F: FnOnce(&mut Company) -> Result<T, E>,
    {
        let mut guard = self.records.lock().expect("company mutex poisoned");
        let Some(stored) = guard.get_mut(id) else {
            return Err(RepositoryError::NotFound);
        };
        let mut scratch = stored.clone();
        match apply(&mut scratch) {
            Ok(value) => {
                *stored = scratch;
                Ok(Ok(value))
            }
            Err(err) => Ok(Err(err)),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryListings {
    records: Arc<Mutex<HashMap<ListingId, JobListing>>>,
}

impl MemoryListings {
    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("listing mutex poisoned").len()
    }
}

impl ListingRepository for MemoryListings {
    fn insert(&self, listing: JobListing) -> Result<JobListing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: JobListing) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if !guard.contains_key(&listing.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(listing.id.clone(), listing);
        Ok(())
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<JobListing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending_moderation(&self, limit: usize) -> Result<Vec<JobListing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        let mut pending: Vec<JobListing> = guard
            .values()
            .filter(|listing| listing.moderation_status == ModerationStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending.truncate(limit);
        Ok(pending)
    }

    fn due_for_expiry(&self, on: NaiveDate) -> Result<Vec<JobListing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard
            .values()
            .filter(|listing| {
                listing.status != PublicationStatus::Closed && listing.application_deadline < on
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReports {
    records: Arc<Mutex<HashMap<ReportId, JobReport>>>,
}

impl ReportRepository for MemoryReports {
    fn insert(&self, report: JobReport) -> Result<JobReport, RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn update(&self, report: JobReport) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        if !guard.contains_key(&report.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(report.id.clone(), report);
        Ok(())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<JobReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open(&self, limit: usize) -> Result<Vec<JobReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        let mut open: Vec<JobReport> = guard
            .values()
            .filter(|report| !report.status.is_terminal())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        open.truncate(limit);
        Ok(open)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<OutboundNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<OutboundNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationQueue for MemoryNotifications {
    fn enqueue(&self, notification: OutboundNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Queue double that always fails, for fire-and-forget coverage.
pub(super) struct OfflineNotifications;

impl NotificationQueue for OfflineNotifications {
    fn enqueue(&self, _notification: OutboundNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("gateway offline".to_string()))
    }
}
