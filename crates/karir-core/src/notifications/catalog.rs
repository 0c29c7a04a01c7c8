use super::templates::{NotificationChannel, NotificationTemplate, TemplateRegistry};

fn email(slug: &str, subject: &str, body: &str, variables: &[&str]) -> NotificationTemplate {
    NotificationTemplate {
        slug: slug.to_string(),
        channel: NotificationChannel::Email,
        subject: Some(subject.to_string()),
        body: body.to_string(),
        variables: variables.iter().map(|name| name.to_string()).collect(),
    }
}

fn whatsapp(slug: &str, body: &str, variables: &[&str]) -> NotificationTemplate {
    NotificationTemplate {
        slug: slug.to_string(),
        channel: NotificationChannel::WhatsApp,
        subject: None,
        body: body.to_string(),
        variables: variables.iter().map(|name| name.to_string()).collect(),
    }
}

/// Built-in transactional templates for the platform. The set mirrors the
/// transitions the posting workflow can trigger plus the application-side
/// messages dispatched by the surrounding application layer.
pub fn standard_registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();

    let templates = [
        email(
            "application_received",
            "New application for {{job_title}}",
            "Hello {{company_name}},\n\n{{candidate_name}} just applied for your \
             '{{job_title}}' listing. Review the application from your dashboard.",
            &["company_name", "candidate_name", "job_title"],
        ),
        whatsapp(
            "invitation_accepted",
            "Good news! {{candidate_name}} accepted your interview invitation for \
             '{{job_title}}'.",
            &["candidate_name", "job_title"],
        ),
        email(
            "payment_completed",
            "Payment received: {{package_name}} package",
            "Hello {{company_name}},\n\nYour purchase of the {{package_name}} package is \
             complete. {{points_added}} posting points were added; your balance is now \
             {{balance}}.",
            &["company_name", "package_name", "points_added", "balance"],
        ),
        email(
            "job_approved",
            "Your listing '{{job_title}}' is live",
            "Hello {{company_name}},\n\nYour listing '{{job_title}}' passed review and is \
             now visible to job seekers.",
            &["company_name", "job_title"],
        ),
        email(
            "job_rejected",
            "Your listing '{{job_title}}' was not approved",
            "Hello {{company_name}},\n\nYour listing '{{job_title}}' did not pass review. \
             Reviewer notes: {{notes}}",
            &["company_name", "job_title", "notes"],
        ),
        email(
            "report_resolved",
            "Update on your report",
            "Thank you for helping keep KarirConnect safe. Your report on \
             '{{job_title}}' has been {{outcome}}.",
            &["job_title", "outcome"],
        ),
    ];

    for template in templates {
        registry
            .register(template)
            .expect("built-in template declares all of its placeholders");
    }

    registry
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn standard_registry_builds() {
        let registry = standard_registry();
        assert!(registry.get("payment_completed").is_some());
        assert!(registry.get("report_resolved").is_some());
        assert_eq!(registry.slugs().count(), 6);
    }

    #[test]
    fn every_standard_template_renders_with_declared_variables() {
        let registry = standard_registry();
        for slug in registry.slugs().map(str::to_string).collect::<Vec<_>>() {
            let template = registry.get(&slug).expect("slug came from the registry");
            let variables: BTreeMap<String, String> = template
                .variables
                .iter()
                .map(|name| (name.clone(), format!("<{name}>")))
                .collect();

            let rendered = registry
                .render(&slug, &variables)
                .expect("declared variables are sufficient to render");
            assert!(!rendered.body.contains("{{"), "unrendered placeholder in {slug}");
            if let Some(subject) = rendered.subject {
                assert!(!subject.contains("{{"), "unrendered placeholder in {slug} subject");
            }
        }
    }
}
