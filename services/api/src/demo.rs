use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use karir_core::error::AppError;
use karir_core::workflows::posting::{
    Company, CompanyId, CompanyRepository, EmploymentType, ExperienceLevel, JobBoardService,
    JobDraft, ListingAction, ListingRepository, ModerationDecision, NotificationQueue,
    PostingPolicy, Recipient, ReportReason, ReportRepository, ResolutionDecision, SalaryRange,
    SubscriptionPlanCatalog, UserId, WorkArrangement,
};

use crate::infra::{
    InMemoryCompanyRepository, InMemoryListingRepository, InMemoryNotificationQueue,
    InMemoryReportRepository,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Point package the demo company purchases before posting
    #[arg(long, default_value = "growth")]
    pub(crate) package: String,
    /// Skip the report-handling portion of the demo
    #[arg(long)]
    pub(crate) skip_report: bool,
}

pub(crate) const DEMO_COMPANY: &str = "nusantara-teknologi";

/// Sample company used by the demo command and the development server seed.
pub(crate) fn demo_company() -> Company {
    let plans = SubscriptionPlanCatalog::standard();
    let plan = plans.find("professional").expect("professional plan is in the catalog");

    Company {
        id: CompanyId(DEMO_COMPANY.to_string()),
        name: "Nusantara Teknologi".to_string(),
        contact_email: "talent@nusantara.example".to_string(),
        whatsapp_number: Some("+628111234567".to_string()),
        plan_code: plan.code.to_string(),
        job_posting_points: 0,
        total_job_posts: 0,
        active_job_posts: 0,
        max_active_jobs: plan.max_active_jobs(),
        points_last_updated: None,
    }
}

pub(crate) fn seed_demo_company<C, L, R, N>(
    service: &JobBoardService<C, L, R, N>,
) -> Result<(), AppError>
where
    C: CompanyRepository + 'static,
    L: ListingRepository + 'static,
    R: ReportRepository + 'static,
    N: NotificationQueue + 'static,
{
    service.register_company(demo_company())?;
    Ok(())
}

fn deadline_in_days(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

fn backend_draft() -> JobDraft {
    JobDraft {
        category: "engineering".to_string(),
        created_by: UserId("recruiter-demo".to_string()),
        title: "Backend Engineer".to_string(),
        description: "Own the listing and billing services end to end.".to_string(),
        requirements: vec![
            "3+ years building production services".to_string(),
            "Comfortable with PostgreSQL".to_string(),
        ],
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
        application_deadline: deadline_in_days(30),
    }
}

fn designer_draft() -> JobDraft {
    JobDraft {
        category: "design".to_string(),
        created_by: UserId("recruiter-demo".to_string()),
        title: "Product Designer".to_string(),
        description: "Design the seeker-facing application flows.".to_string(),
        requirements: vec!["Portfolio of shipped mobile work".to_string()],
        benefits: vec!["Health coverage".to_string()],
        employment_type: EmploymentType::Contract,
        work_arrangement: WorkArrangement::Remote,
        experience_level: ExperienceLevel::Senior,
        salary: None,
        location: "Remote".to_string(),
        positions_available: 1,
        application_deadline: deadline_in_days(21),
    }
}

/// Walk the full workflow against in-memory adapters and print each station.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let notifications = Arc::new(InMemoryNotificationQueue::default());
    let service = JobBoardService::new(
        Arc::new(InMemoryCompanyRepository::default()),
        Arc::new(InMemoryListingRepository::default()),
        Arc::new(InMemoryReportRepository::default()),
        notifications.clone(),
        PostingPolicy::default(),
    );
    seed_demo_company(&service)?;

    let company_id = CompanyId(DEMO_COMPANY.to_string());
    let admin = UserId("admin-demo".to_string());

    println!("KarirConnect posting workflow demo");
    let company = service.company(&company_id)?;
    match company.max_active_jobs {
        Some(limit) => println!(
            "Company: {} (plan {}, up to {limit} active jobs)",
            company.name, company.plan_code
        ),
        None => println!(
            "Company: {} (plan {}, unlimited active jobs)",
            company.name, company.plan_code
        ),
    }

    println!("\nPoint packages on sale");
    for package in service.packages().packages() {
        println!(
            "- {}: {} points (+{} bonus) | Rp{} | valid {} days",
            package.code, package.points, package.bonus_points, package.price_idr,
            package.validity_days
        );
    }

    let balance = service.purchase_package(&company_id, &args.package)?;
    println!("\nPurchased '{}' package; balance is now {balance} points", args.package);

    let backend = service.post_job(&company_id, backend_draft())?;
    let designer = service.post_job(&company_id, designer_draft())?;
    println!("\nSubmitted listings");
    for listing in [&backend, &designer] {
        println!(
            "- {} | {} | {} / {}",
            listing.id,
            listing.title,
            listing.moderation_status.label(),
            listing.status.label()
        );
    }

    let approved = service.moderate(
        &backend.id,
        ModerationDecision::Approved,
        Some("meets the content guidelines".to_string()),
        admin.clone(),
    )?;
    let rejected = service.moderate(
        &designer.id,
        ModerationDecision::Rejected,
        Some("salary range missing".to_string()),
        admin.clone(),
    )?;
    println!("\nModeration");
    println!(
        "- {} {} -> {}",
        approved.id,
        approved.moderation_status.label(),
        approved.status.label()
    );
    println!(
        "- {} {} ({})",
        rejected.id,
        rejected.moderation_status.label(),
        rejected.moderation_notes.as_deref().unwrap_or("no notes")
    );

    if !args.skip_report {
        let report = service.file_report(
            &approved.id,
            UserId("seeker-demo".to_string()),
            Some(Recipient::Email("seeker@mail.example".to_string())),
            ReportReason::Misleading,
            "Advertised salary differs from the interview offer.".to_string(),
        )?;
        let resolved = service.resolve_report(
            &report.id,
            ResolutionDecision::Resolved,
            Some("company asked to correct the range".to_string()),
            Some(ListingAction::Suspend),
            admin,
        )?;
        println!("\nReport desk");
        println!(
            "- {} {} on {} -> {} (listing suspended)",
            resolved.id,
            resolved.reason.label(),
            resolved.listing_id,
            resolved.status.label()
        );
    }

    let company = service.company(&company_id)?;
    println!(
        "\nCompany after the run: {} points, {} total posts, {} active",
        company.job_posting_points, company.total_job_posts, company.active_job_posts
    );

    println!("\nQueued notifications");
    for event in notifications.events() {
        let recipient = match &event.recipient {
            Recipient::Email(address) => format!("email {address}"),
            Recipient::WhatsApp(number) => format!("whatsapp {number}"),
        };
        println!("- {} -> {}", event.template, recipient);
    }

    Ok(())
}
