//! Route handlers for the analytics API.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    analytics::{
        CategoryBreakdownEntry, Dashboard, MonthlyTrendEntry, Summary, compute_category_breakdown,
        compute_dashboard, compute_monthly_trend, compute_summary,
    },
    app_state::lock_connection,
    database_id::UserId,
    extract::{Json, Path, Query},
    timezone::today_in_timezone,
    transaction::SQLiteTransactionStore,
};

/// The state needed to compute analytics.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the monthly trend.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// A date in the last month of the trend. Defaults to today.
    pub as_of: Option<Date>,
}

/// A route handler that responds with a user's dashboard.
pub async fn get_dashboard_endpoint(
    State(state): State<AnalyticsState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Dashboard>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;

    compute_dashboard(&SQLiteTransactionStore::new(&connection), user_id).map(Json)
}

/// A route handler that responds with a user's income and expense summary.
pub async fn get_summary_endpoint(
    State(state): State<AnalyticsState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Summary>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;

    compute_summary(&SQLiteTransactionStore::new(&connection), user_id).map(Json)
}

/// A route handler that responds with a user's expenses broken down by category.
pub async fn get_category_breakdown_endpoint(
    State(state): State<AnalyticsState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CategoryBreakdownEntry>>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;

    compute_category_breakdown(&SQLiteTransactionStore::new(&connection), user_id).map(Json)
}

/// A route handler that responds with a user's income and expenses over the
/// last six months.
pub async fn get_monthly_trend_endpoint(
    State(state): State<AnalyticsState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<MonthlyTrendEntry>>, Error> {
    let user_id = UserId::new(user_id)?;
    let as_of = match query.as_of {
        Some(date) => date,
        None => today_in_timezone(&state.local_timezone)?,
    };
    let connection = lock_connection(&state.db_connection)?;

    compute_monthly_trend(&SQLiteTransactionStore::new(&connection), user_id, as_of).map(Json)
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
        analytics::{
            TREND_MONTHS,
            handlers::{
                AnalyticsState, TrendQuery, get_category_breakdown_endpoint,
                get_dashboard_endpoint, get_monthly_trend_endpoint, get_summary_endpoint,
            },
        },
        extract::{Json, Path, Query},
        initialize_db,
        transaction::{Category, Transaction, TransactionType, create_transaction},
    };

    fn get_test_state() -> AnalyticsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        for (amount, transaction_type, category, date) in [
            (dec!(5000), TransactionType::Income, Category::Salary, date!(2025 - 02 - 01)),
            (dec!(800), TransactionType::Expense, Category::Groceries, date!(2025 - 02 - 03)),
            (dec!(200), TransactionType::Expense, Category::Dining, date!(2025 - 03 - 14)),
        ] {
            create_transaction(
                Transaction::build(
                    UserId::new(1).unwrap(),
                    amount,
                    transaction_type,
                    category,
                    date,
                    "test",
                ),
                &connection,
            )
            .unwrap();
        }

        AnalyticsState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn summary_reads_from_database() {
        let Json(summary) = get_summary_endpoint(State(get_test_state()), Path(1))
            .await
            .unwrap();

        assert_eq!(summary.total_income, dec!(5000));
        assert_eq!(summary.total_expenses, dec!(1000));
        assert_eq!(summary.net_balance, dec!(4000));
        assert_eq!(summary.savings_rate, dec!(80));
    }

    #[tokio::test]
    async fn breakdown_reads_from_database() {
        let Json(breakdown) = get_category_breakdown_endpoint(State(get_test_state()), Path(1))
            .await
            .unwrap();

        let names: Vec<_> = breakdown.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Dining"]);
        assert_eq!(breakdown[0].percentage, dec!(80));
        assert_eq!(breakdown[1].percentage, dec!(20));
    }

    #[tokio::test]
    async fn dashboard_reads_from_database() {
        let Json(dashboard) = get_dashboard_endpoint(State(get_test_state()), Path(1))
            .await
            .unwrap();

        assert_eq!(dashboard.net_savings, dec!(4000));
        assert_eq!(dashboard.category_breakdown.len(), 2);
    }

    #[tokio::test]
    async fn trend_uses_as_of_date() {
        let query = TrendQuery {
            as_of: Some(date!(2025 - 03 - 20)),
        };

        let Json(trend) =
            get_monthly_trend_endpoint(State(get_test_state()), Path(1), Query(query))
                .await
                .unwrap();

        assert_eq!(trend.len(), TREND_MONTHS);
        assert_eq!(trend[4].month, "Feb");
        assert_eq!(trend[4].savings, dec!(4200));
        assert_eq!(trend[5].month, "Mar");
        assert_eq!(trend[5].expenses, dec!(200));
        assert_eq!(trend[0].income, Decimal::ZERO);
    }

    #[tokio::test]
    async fn trend_defaults_to_today() {
        let Json(trend) = get_monthly_trend_endpoint(
            State(get_test_state()),
            Path(1),
            Query(TrendQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(trend.len(), TREND_MONTHS);
    }

    #[tokio::test]
    async fn rejects_invalid_user() {
        let result = get_summary_endpoint(State(get_test_state()), Path(-3)).await;

        assert_eq!(result.map(|_| ()), Err(Error::InvalidUserId(-3)));
    }
}
