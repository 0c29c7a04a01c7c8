use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;

use karir_core::workflows::posting::{
    Company, CompanyId, CompanyRepository, JobListing, JobReport, ListingId, ListingRepository,
    ModerationStatus, NotificationError, NotificationQueue, OutboundNotification,
    PublicationStatus, ReportId, ReportRepository, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCompanyRepository {
    records: Arc<Mutex<HashMap<CompanyId, Company>>>,
}

impl CompanyRepository for InMemoryCompanyRepository {
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
pub(crate) struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, JobListing>>>,
}

impl ListingRepository for InMemoryListingRepository {
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
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, JobReport>>>,
}

impl ReportRepository for InMemoryReportRepository {
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

/// Queue adapter that records outbound notifications in memory. A production
/// deployment would swap in SMTP / WhatsApp gateway adapters here.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationQueue {
    events: Arc<Mutex<Vec<OutboundNotification>>>,
}

impl InMemoryNotificationQueue {
    pub(crate) fn events(&self) -> Vec<OutboundNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationQueue for InMemoryNotificationQueue {
    fn enqueue(&self, notification: OutboundNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}
