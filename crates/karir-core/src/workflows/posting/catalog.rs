use serde::Serialize;

/// Purchasable posting-credit bundle. Catalog entries are immutable once a
/// purchase has been recorded against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointPackage {
    pub code: &'static str,
    pub name: &'static str,
    pub points: u32,
    pub bonus_points: u32,
    pub price_idr: u64,
    pub validity_days: u32,
    pub features: Vec<&'static str>,
}

impl PointPackage {
    /// Points credited on purchase, base plus bonus.
    pub const fn total_points(&self) -> u32 {
        self.points + self.bonus_points
    }
}

/// Read-only catalog of the packages on sale.
#[derive(Debug, Clone)]
pub struct PointPackageCatalog {
    packages: Vec<PointPackage>,
}

impl PointPackageCatalog {
    pub fn standard() -> Self {
        Self {
            packages: vec![
                PointPackage {
                    code: "starter",
                    name: "Starter",
                    points: 1,
                    bonus_points: 0,
                    price_idr: 150_000,
                    validity_days: 30,
                    features: vec!["1 job posting"],
                },
                PointPackage {
                    code: "growth",
                    name: "Growth",
                    points: 5,
                    bonus_points: 1,
                    price_idr: 650_000,
                    validity_days: 90,
                    features: vec!["5 job postings", "1 bonus posting", "Priority email support"],
                },
                PointPackage {
                    code: "scale",
                    name: "Scale",
                    points: 15,
                    bonus_points: 5,
                    price_idr: 1_750_000,
                    validity_days: 180,
                    features: vec![
                        "15 job postings",
                        "5 bonus postings",
                        "Priority email support",
                        "Dedicated account contact",
                    ],
                },
            ],
        }
    }

    pub fn find(&self, code: &str) -> Option<&PointPackage> {
        self.packages.iter().find(|package| package.code == code)
    }

    pub fn packages(&self) -> &[PointPackage] {
        &self.packages
    }
}

/// Subscription tier a company sits on. Limits of `None` mean unlimited.
/// Read-only input to entitlement checks; the posting workflow consumes
/// `job_posting_limit` as the company's active-job cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPlan {
    pub code: &'static str,
    pub name: &'static str,
    pub job_posting_limit: Option<u32>,
    pub featured_job_limit: Option<u32>,
    pub job_invitation_limit: Option<u32>,
    pub auto_promote: bool,
    pub premium_badge: bool,
    pub analytics_access: bool,
    pub priority_support: bool,
    pub talent_database_access: bool,
}

impl SubscriptionPlan {
    /// Active-listing cap this plan grants.
    pub const fn max_active_jobs(&self) -> Option<u32> {
        self.job_posting_limit
    }
}

/// Read-only catalog of subscription tiers.
#[derive(Debug, Clone)]
pub struct SubscriptionPlanCatalog {
    plans: Vec<SubscriptionPlan>,
}

impl SubscriptionPlanCatalog {
    pub fn standard() -> Self {
        Self {
            plans: vec![
                SubscriptionPlan {
                    code: "free",
                    name: "Free",
                    job_posting_limit: Some(2),
                    featured_job_limit: Some(0),
                    job_invitation_limit: Some(5),
                    auto_promote: false,
                    premium_badge: false,
                    analytics_access: false,
                    priority_support: false,
                    talent_database_access: false,
                },
                SubscriptionPlan {
                    code: "professional",
                    name: "Professional",
                    job_posting_limit: Some(10),
                    featured_job_limit: Some(3),
                    job_invitation_limit: Some(50),
                    auto_promote: false,
                    premium_badge: true,
                    analytics_access: true,
                    priority_support: true,
                    talent_database_access: false,
                },
                SubscriptionPlan {
                    code: "enterprise",
                    name: "Enterprise",
                    job_posting_limit: None,
                    featured_job_limit: None,
                    job_invitation_limit: None,
                    auto_promote: true,
                    premium_badge: true,
                    analytics_access: true,
                    priority_support: true,
                    talent_database_access: true,
                },
            ],
        }
    }

    pub fn find(&self, code: &str) -> Option<&SubscriptionPlan> {
        self.plans.iter().find(|plan| plan.code == code)
    }

    pub fn plans(&self) -> &[SubscriptionPlan] {
        &self.plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_lookup_by_code() {
        let catalog = PointPackageCatalog::standard();
        let growth = catalog.find("growth").expect("growth package exists");
        assert_eq!(growth.total_points(), 6);
        assert!(catalog.find("platinum").is_none());
    }

    #[test]
    fn enterprise_plan_is_unlimited() {
        let catalog = SubscriptionPlanCatalog::standard();
        let enterprise = catalog.find("enterprise").expect("enterprise plan exists");
        assert_eq!(enterprise.max_active_jobs(), None);

        let free = catalog.find("free").expect("free plan exists");
        assert_eq!(free.max_active_jobs(), Some(2));
        assert!(!free.talent_database_access);
    }
}
