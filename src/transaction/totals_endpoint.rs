//! Route handlers for a user's income and expense totals.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::extract::{FromRef, State};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::UserId,
    extract::{Json, Path},
    transaction::{SQLiteTransactionStore, TransactionStore, TransactionType},
};

/// The state needed to total a user's transactions.
#[derive(Debug, Clone)]
pub struct TotalsState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TotalsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A user's total income and expenses over all time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net_balance: Decimal,
}

/// A route handler that responds with a user's total income, expenses and balance.
pub async fn get_totals_endpoint(
    State(state): State<TotalsState>,
    Path(user_id): Path<i64>,
) -> Result<Json<TransactionTotals>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;
    let store = SQLiteTransactionStore::new(&connection);

    let total_income = store.sum_by_user_and_type(user_id, TransactionType::Income)?;
    let total_expenses = store.sum_by_user_and_type(user_id, TransactionType::Expense)?;

    Ok(Json(TransactionTotals {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
    }))
}

/// A route handler that responds with a user's expense total for each category,
/// keyed by the category label.
pub async fn get_category_expenses_endpoint(
    State(state): State<TotalsState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BTreeMap<String, Decimal>>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;

    let totals = SQLiteTransactionStore::new(&connection)
        .group_expense_amounts_by_category(user_id)?
        .into_iter()
        .map(|(category, total)| (category.as_str().to_owned(), total))
        .collect();

    Ok(Json(totals))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, UserId,
        extract::{Json, Path},
        initialize_db,
        transaction::{
            Category, Transaction, TransactionType, create_transaction,
            totals_endpoint::{
                TotalsState, TransactionTotals, get_category_expenses_endpoint,
                get_totals_endpoint,
            },
        },
    };

    fn get_test_state() -> TotalsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        let day = date!(2025 - 02 - 10);
        for (amount, transaction_type, category) in [
            (dec!(5000), TransactionType::Income, Category::Salary),
            (dec!(1200), TransactionType::Expense, Category::Rent),
            (dec!(300.50), TransactionType::Expense, Category::Groceries),
            (dec!(100), TransactionType::Expense, Category::Groceries),
        ] {
            create_transaction(
                Transaction::build(
                    UserId::new(1).unwrap(),
                    amount,
                    transaction_type,
                    category,
                    day,
                    "test",
                ),
                &connection,
            )
            .unwrap();
        }

        TotalsState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn totals_income_and_expenses() {
        let state = get_test_state();

        let Json(totals) = get_totals_endpoint(State(state), Path(1)).await.unwrap();

        assert_eq!(
            totals,
            TransactionTotals {
                total_income: dec!(5000),
                total_expenses: dec!(1600.50),
                net_balance: dec!(3399.50),
            }
        );
    }

    #[tokio::test]
    async fn unknown_user_has_zero_totals() {
        let state = get_test_state();

        let Json(totals) = get_totals_endpoint(State(state), Path(99)).await.unwrap();

        assert_eq!(totals.total_income, Decimal::ZERO);
        assert_eq!(totals.net_balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn groups_expenses_by_category_label() {
        let state = get_test_state();

        let Json(totals) = get_category_expenses_endpoint(State(state), Path(1))
            .await
            .unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("RENT"), Some(&dec!(1200)));
        assert_eq!(totals.get("GROCERIES"), Some(&dec!(400.50)));
    }

    #[tokio::test]
    async fn rejects_invalid_user() {
        let state = get_test_state();

        let result = get_category_expenses_endpoint(State(state), Path(0)).await;

        assert_eq!(result.map(|_| ()), Err(Error::InvalidUserId(0)));
    }
}
