use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::UserId,
    money::percentage_of,
    transaction::{TransactionStore, TransactionType},
};

/// A user's income and expenses over all time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses, negative if the user spent more than they earned.
    pub net_balance: Decimal,
    /// The net balance as a percentage of income, zero if there is no income.
    pub savings_rate: Decimal,
}

impl Summary {
    /// Derive the net balance and savings rate from the income and expense totals.
    pub fn from_totals(total_income: Decimal, total_expenses: Decimal) -> Self {
        let net_balance = total_income - total_expenses;

        Self {
            total_income,
            total_expenses,
            net_balance,
            savings_rate: percentage_of(net_balance, total_income),
        }
    }
}

/// Total a user's income and expenses.
///
/// # Errors
/// Returns any error from reading `store`.
pub fn compute_summary(store: &impl TransactionStore, user_id: UserId) -> Result<Summary, Error> {
    let total_income = store.sum_by_user_and_type(user_id, TransactionType::Income)?;
    let total_expenses = store.sum_by_user_and_type(user_id, TransactionType::Expense)?;

    Ok(Summary::from_totals(total_income, total_expenses))
}
