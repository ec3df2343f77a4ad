use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    analytics::{CategoryBreakdownEntry, compute_category_breakdown, compute_summary},
    database_id::UserId,
    transaction::TransactionStore,
};

/// The headline numbers and expense breakdown shown on a user's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net_savings: Decimal,
    /// Net savings as a percentage of income.
    pub savings_rate: Decimal,
    /// The user's expenses by category.
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
}

/// Compute the summary and category breakdown for a user in one go.
///
/// # Errors
/// Returns any error from reading `store`.
pub fn compute_dashboard(
    store: &impl TransactionStore,
    user_id: UserId,
) -> Result<Dashboard, Error> {
    let summary = compute_summary(store, user_id)?;
    let category_breakdown = compute_category_breakdown(store, user_id)?;

    Ok(Dashboard {
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        net_savings: summary.net_balance,
        savings_rate: summary.savings_rate,
        category_breakdown,
    })
}
