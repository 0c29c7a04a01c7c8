use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Transport channel a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationChannel {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl NotificationChannel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::WhatsApp => "whatsapp",
        }
    }
}

/// Slug-keyed message template. Placeholders use `{{name}}` syntax and every
/// placeholder appearing in the subject or body must be declared in
/// `variables`; registration enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub slug: String,
    pub channel: NotificationChannel,
    pub subject: Option<String>,
    pub body: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("no template registered for slug '{0}'")]
    UnknownTemplate(String),
    #[error("template '{slug}' uses placeholder '{placeholder}' that is not declared")]
    UndeclaredPlaceholder { slug: String, placeholder: String },
    #[error("template '{slug}' requires variable '{variable}' which was not supplied")]
    MissingVariable { slug: String, variable: String },
    #[error("template slug '{0}' is already registered")]
    DuplicateSlug(String),
}

/// A template with its variables substituted, ready for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub slug: String,
    pub channel: NotificationChannel,
    pub subject: Option<String>,
    pub body: String,
}

/// Registry of notification templates, validated on the way in so rendering
/// can only fail on caller mistakes (unknown slug, missing variable).
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, NotificationTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, rejecting duplicate slugs and any placeholder not
    /// covered by the declared variable list.
    pub fn register(&mut self, template: NotificationTemplate) -> Result<(), TemplateError> {
        if self.templates.contains_key(&template.slug) {
            return Err(TemplateError::DuplicateSlug(template.slug));
        }

        let mut used = placeholders(&template.body);
        if let Some(subject) = &template.subject {
            used.extend(placeholders(subject));
        }

        for placeholder in used {
            if !template.variables.iter().any(|name| *name == placeholder) {
                return Err(TemplateError::UndeclaredPlaceholder {
                    slug: template.slug,
                    placeholder,
                });
            }
        }

        self.templates.insert(template.slug.clone(), template);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&NotificationTemplate> {
        self.templates.get(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Render a template. Every declared variable must be supplied; extras in
    /// the map are ignored.
    pub fn render(
        &self,
        slug: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<RenderedMessage, TemplateError> {
        let template = self
            .templates
            .get(slug)
            .ok_or_else(|| TemplateError::UnknownTemplate(slug.to_string()))?;

        for declared in &template.variables {
            if !variables.contains_key(declared) {
                return Err(TemplateError::MissingVariable {
                    slug: template.slug.clone(),
                    variable: declared.clone(),
                });
            }
        }

        Ok(RenderedMessage {
            slug: template.slug.clone(),
            channel: template.channel,
            subject: template
                .subject
                .as_deref()
                .map(|subject| substitute(subject, variables)),
            body: substitute(&template.body, variables),
        })
    }
}

/// Collect the placeholder names appearing in `text`.
fn placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let name = after[..end].trim();
        if !name.is_empty() {
            found.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    found
}

/// Replace `{{name}}` occurrences with their values. Unmatched placeholders
/// are left verbatim; `render` pre-validates so they only survive here when a
/// template is used outside the registry.
fn substitute(text: &str, variables: &BTreeMap<String, String>) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match variables.get(name) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(slug: &str, body: &str, variables: &[&str]) -> NotificationTemplate {
        NotificationTemplate {
            slug: slug.to_string(),
            channel: NotificationChannel::Email,
            subject: None,
            body: body.to_string(),
            variables: variables.iter().map(|name| name.to_string()).collect(),
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn register_rejects_undeclared_placeholder() {
        let mut registry = TemplateRegistry::new();
        let result = registry.register(template(
            "greeting",
            "Hello {{name}}, welcome to {{platform}}",
            &["name"],
        ));

        match result {
            Err(TemplateError::UndeclaredPlaceholder { slug, placeholder }) => {
                assert_eq!(slug, "greeting");
                assert_eq!(placeholder, "platform");
            }
            other => panic!("expected undeclared placeholder error, got {other:?}"),
        }
    }

    #[test]
    fn register_checks_subject_placeholders_too() {
        let mut registry = TemplateRegistry::new();
        let mut bad = template("subject-check", "plain body", &[]);
        bad.subject = Some("About {{job_title}}".to_string());

        assert!(matches!(
            registry.register(bad),
            Err(TemplateError::UndeclaredPlaceholder { .. })
        ));
    }

    #[test]
    fn register_rejects_duplicate_slug() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(template("dup", "body", &[]))
            .expect("first registration succeeds");

        assert!(matches!(
            registry.register(template("dup", "other body", &[])),
            Err(TemplateError::DuplicateSlug(slug)) if slug == "dup"
        ));
    }

    #[test]
    fn render_substitutes_declared_variables() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(template(
                "greeting",
                "Hello {{name}}, your listing '{{job_title}}' is live",
                &["name", "job_title"],
            ))
            .expect("template registers");

        let rendered = registry
            .render(
                "greeting",
                &vars(&[("name", "Sari"), ("job_title", "Data Engineer")]),
            )
            .expect("render succeeds");

        assert_eq!(
            rendered.body,
            "Hello Sari, your listing 'Data Engineer' is live"
        );
    }

    #[test]
    fn render_fails_on_missing_variable() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(template("greeting", "Hello {{name}}", &["name"]))
            .expect("template registers");

        match registry.render("greeting", &vars(&[])) {
            Err(TemplateError::MissingVariable { variable, .. }) => {
                assert_eq!(variable, "name");
            }
            other => panic!("expected missing variable error, got {other:?}"),
        }
    }

    #[test]
    fn render_unknown_slug_fails() {
        let registry = TemplateRegistry::new();
        assert!(matches!(
            registry.render("ghost", &vars(&[])),
            Err(TemplateError::UnknownTemplate(slug)) if slug == "ghost"
        ));
    }

    #[test]
    fn whitespace_inside_placeholder_braces_is_tolerated() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(template("spaced", "Hi {{ name }}", &["name"]))
            .expect("template registers");

        let rendered = registry
            .render("spaced", &vars(&[("name", "Budi")]))
            .expect("render succeeds");
        assert_eq!(rendered.body, "Hi Budi");
    }
}
