//! Template-driven transactional notification content.
//!
//! The workflow renders messages through a registry validated at
//! registration time; delivery itself lives behind the
//! [`NotificationQueue`](crate::workflows::posting::NotificationQueue) trait.

mod catalog;
mod templates;

pub use catalog::standard_registry;
pub use templates::{
    NotificationChannel, NotificationTemplate, RenderedMessage, TemplateError, TemplateRegistry,
};
