use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::UserId,
    money::percentage_of,
    transaction::{TransactionStore, TransactionType},
};

/// The colour used for categories that do not have one of their own.
const FALLBACK_CATEGORY_COLOR: &str = "#87d068";

/// A user's spending in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownEntry {
    /// The display name of the category, e.g. "Other Expense".
    pub name: String,
    /// The total spent in the category.
    pub amount: Decimal,
    /// The share of all expenses spent in the category, from 0 to 100.
    pub percentage: Decimal,
    /// The hex colour used to draw the category in charts.
    pub color: String,
}

/// Break down a user's expenses by category.
///
/// Entries are in the order given by the store. Income is ignored, even when
/// it uses an expense category.
///
/// # Errors
/// Returns any error from reading `store`.
pub fn compute_category_breakdown(
    store: &impl TransactionStore,
    user_id: UserId,
) -> Result<Vec<CategoryBreakdownEntry>, Error> {
    let total_expenses = store.sum_by_user_and_type(user_id, TransactionType::Expense)?;

    let breakdown = store
        .group_expense_amounts_by_category(user_id)?
        .into_iter()
        .map(|(category, amount)| CategoryBreakdownEntry {
            name: format_category_name(category.as_str()),
            amount,
            percentage: percentage_of(amount, total_expenses),
            color: category_color(category.as_str()).to_owned(),
        })
        .collect();

    Ok(breakdown)
}

/// Turn a category label into a display name, e.g. "OTHER_EXPENSE" into "Other Expense".
fn format_category_name(label: &str) -> String {
    label
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let word = word.to_lowercase();
            let mut chars = word.chars();

            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn category_color(label: &str) -> &'static str {
    match label.to_uppercase().as_str() {
        "GROCERIES" => "#8884d8",
        "DINING" => "#82ca9d",
        "TRANSPORTATION" => "#ffc658",
        "UTILITIES" => "#ff7300",
        "ENTERTAINMENT" => "#0088fe",
        "SHOPPING" => "#00c49f",
        "HEALTHCARE" => "#ffb347",
        "EDUCATION" => "#d084d0",
        _ => FALLBACK_CATEGORY_COLOR,
    }
}
