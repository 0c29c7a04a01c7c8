use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CompanyId, JobDraft, ListingId, ReportId, UserId};
use super::moderation::ModerationDecision;
use super::reports::{ListingAction, ReportReason, ResolutionDecision};
use super::repository::{
    CompanyRepository, ListingRepository, NotificationQueue, Recipient, ReportRepository,
};
use super::service::{JobBoardError, JobBoardService};

/// Router builder exposing the posting, moderation, and report endpoints.
/// Moderator and reviewer identity arrives in the request body, already
/// authenticated by the surrounding stack.
pub fn board_router<C, L, R, N>(service: Arc<JobBoardService<C, L, R, N>>) -> Router
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies/:company_id/jobs",
            post(post_job_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/companies/:company_id/points",
            get(balance_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/companies/:company_id/purchases",
            post(purchase_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/admin/listings/pending",
            get(moderation_queue_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id/moderate",
            post(moderate_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/admin/listings/moderate",
            post(bulk_moderate_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/listings/:listing_id/reports",
            post(file_report_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/admin/reports/open",
            get(open_reports_handler::<C, L, R, N>),
        )
        .route(
            "/api/v1/admin/reports/:report_id/resolve",
            post(resolve_report_handler::<C, L, R, N>),
        )
        .with_state(service)
}

fn error_response(error: JobBoardError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "code": error.code(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct PurchaseRequest {
    pub(crate) package: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModerateRequest {
    pub(crate) decision: ModerationDecision,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    pub(crate) moderator: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkModerateRequest {
    pub(crate) listing_ids: Vec<String>,
    pub(crate) decision: ModerationDecision,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    pub(crate) moderator: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileReportRequest {
    pub(crate) reporter: String,
    #[serde(default)]
    pub(crate) reporter_contact: Option<Recipient>,
    pub(crate) reason: ReportReason,
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveReportRequest {
    pub(crate) decision: ResolutionDecision,
    #[serde(default)]
    pub(crate) admin_notes: Option<String>,
    #[serde(default)]
    pub(crate) job_action: Option<ListingAction>,
    pub(crate) reviewer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueueParams {
    #[serde(default = "default_queue_limit")]
    pub(crate) limit: usize,
}

fn default_queue_limit() -> usize {
    50
}

pub(crate) async fn post_job_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(company_id): Path<String>,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.post_job(&CompanyId(company_id), draft) {
        Ok(listing) => (StatusCode::CREATED, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn balance_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(company_id): Path<String>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    let company_id = CompanyId(company_id);
    match service.point_balance(&company_id) {
        Ok(points) => (
            StatusCode::OK,
            axum::Json(json!({ "company_id": company_id.0, "points": points })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn purchase_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(company_id): Path<String>,
    axum::Json(request): axum::Json<PurchaseRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    let company_id = CompanyId(company_id);
    match service.purchase_package(&company_id, &request.package) {
        Ok(points) => (
            StatusCode::OK,
            axum::Json(json!({
                "company_id": company_id.0,
                "package": request.package,
                "points": points,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn moderation_queue_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.moderation_queue(params.limit) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn moderate_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(request): axum::Json<ModerateRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.moderate(
        &ListingId(listing_id),
        request.decision,
        request.notes,
        UserId(request.moderator),
    ) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bulk_moderate_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    axum::Json(request): axum::Json<BulkModerateRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    let listing_ids: Vec<ListingId> = request.listing_ids.into_iter().map(ListingId).collect();
    let outcome = service.bulk_moderate(
        &listing_ids,
        request.decision,
        request.notes,
        UserId(request.moderator),
    );
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

pub(crate) async fn file_report_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(listing_id): Path<String>,
    axum::Json(request): axum::Json<FileReportRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.file_report(
        &ListingId(listing_id),
        UserId(request.reporter),
        request.reporter_contact,
        request.reason,
        request.description,
    ) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_reports_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.open_reports(params.limit) {
        Ok(reports) => (StatusCode::OK, axum::Json(reports)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_report_handler<C, L, R, N>(
    State(service): State<Arc<JobBoardService<C, L, R, N>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<ResolveReportRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    match service.resolve_report(
        &ReportId(report_id),
        request.decision,
        request.admin_notes,
        request.job_action,
        UserId(request.reviewer),
    ) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}
