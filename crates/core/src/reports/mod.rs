//! Financial report generation.
//!
//! This module provides pure business logic for the balance sheet: posted
//! totals are attached to the chart hierarchy and grouped by account type.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
