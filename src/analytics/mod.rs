//! Aggregations over a user's transactions for the dashboard: summary totals,
//! a per-category expense breakdown and a monthly income and expense trend.
//!
//! The computations only read through a [TransactionStore](crate::TransactionStore)
//! and are recomputed on every request.

mod category;
mod dashboard;
mod handlers;
mod summary;
#[cfg(test)]
mod test_utils;
mod trend;

pub use category::{CategoryBreakdownEntry, compute_category_breakdown};
pub use dashboard::{Dashboard, compute_dashboard};
pub use handlers::{
    get_category_breakdown_endpoint, get_dashboard_endpoint, get_monthly_trend_endpoint,
    get_summary_endpoint,
};
pub use summary::{Summary, compute_summary};
pub use trend::{MonthlyTrendEntry, TREND_MONTHS, compute_monthly_trend};
