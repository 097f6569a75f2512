//! HTTP handlers for the completion service.

pub mod completion;
pub mod health;
pub mod metrics;
