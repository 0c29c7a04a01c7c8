//! Domain core for the KarirConnect job board.
//!
//! Companies hold a balance of posting credits, every new listing passes a
//! quota gate and an admin moderation queue, and published listings can be
//! reported by job seekers. The crate exposes the workflow as plain library
//! calls plus an axum router; persistence and notification transport stay
//! behind traits so deployments can bring their own adapters.

pub mod config;
pub mod error;
pub mod notifications;
pub mod telemetry;
pub mod workflows;
