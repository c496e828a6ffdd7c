//! HTTP handlers for the inbox service.

pub mod analysis;
pub mod health;
pub mod metrics;
pub mod rewrite;

pub use analysis::analyze_message;
pub use health::{health_check, readiness_check};
pub use metrics::metrics;
pub use rewrite::rewrite_reply;
