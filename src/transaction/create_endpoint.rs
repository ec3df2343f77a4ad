use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::UserId,
    extract::Json,
    timezone::today_in_timezone,
    transaction::{Category, Transaction, TransactionType, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// The user the transaction belongs to.
    pub user_id: i64,
    /// What the transaction was for.
    pub description: String,
    /// The positive amount, as a decimal string or number.
    pub amount: Decimal,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened. Defaults to today in the server's timezone.
    pub transaction_date: Option<Date>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Where the transaction happened.
    pub location: Option<String>,
    /// Who the money was paid to or received from.
    pub merchant: Option<String>,
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let user_id = UserId::new(request.user_id)?;
    let date = match request.transaction_date {
        Some(date) => date,
        None => today_in_timezone(&state.local_timezone)?,
    };

    let builder = Transaction::build(
        user_id,
        request.amount,
        request.transaction_type,
        request.category,
        date,
        &request.description,
    )
    .notes(request.notes)
    .location(request.location)
    .merchant(request.merchant);

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(builder, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
