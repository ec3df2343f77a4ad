//! Route handlers for listing a user's transactions, either a page at a time
//! or within a date range.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::UserId,
    extract::{Json, Path, Query},
    pagination::{Page, PageQuery, PageRequest, PaginationConfig},
    transaction::{
        SQLiteTransactionStore, Transaction, TransactionStore,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to page transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for listing transactions in a date range.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// The first date to include.
    pub start: Date,
    /// The last date to include.
    pub end: Date,
}

/// A route handler that responds with a page of a user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Transaction>>, Error> {
    let user_id = UserId::new(user_id)?;
    let request = PageRequest::new(&query, &state.pagination_config);
    let connection = lock_connection(&state.db_connection)?;

    let total_items = count_user_transactions(user_id, &connection)?;
    let items = get_transaction_page(user_id, request, &connection)?;

    Ok(Json(Page::new(items, request, total_items)))
}

/// A route handler that responds with a user's transactions between `start`
/// and `end` inclusive, oldest first.
pub async fn list_transactions_in_range_endpoint(
    State(state): State<ListTransactionsState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let user_id = UserId::new(user_id)?;
    let connection = lock_connection(&state.db_connection)?;

    SQLiteTransactionStore::new(&connection)
        .list_by_user_in_date_range(user_id, query.start, query.end)
        .map(Json)
}

fn count_user_transactions(user_id: UserId, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;

    // COUNT is never negative.
    Ok(u64::try_from(count).unwrap_or_default())
}

fn get_transaction_page(
    user_id: UserId,
    request: PageRequest,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // SQLite integers are signed, so clamp the paging values before binding them.
    let limit = i64::try_from(request.page_size).unwrap_or(i64::MAX);
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY transaction_date DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?
        .query_map((user_id, limit, offset), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}
