//! Core domain logic: record model, reconciliation, extraction, pricing.

pub mod batch;
pub mod extract;
pub mod logging;
pub mod pricing;
pub mod reconcile;
