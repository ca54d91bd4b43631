//! Weekly, monthly and enforcement report generators (spec.md §4.3).
//!
//! Each generator queries the store for its window, calls into
//! `ci-scoring` for derived analytics, assembles a [`ci_types::Report`]
//! document and upserts it by natural key — regenerating the same period
//! overwrites the previous document rather than appending (spec.md §5).

mod enforcement;
mod error;
mod monthly;
mod weekly;

pub use enforcement::generate_enforcement_report;
pub use error::{ReportError, ReportResult};
pub use monthly::generate_monthly_report;
pub use weekly::generate_weekly_report;
