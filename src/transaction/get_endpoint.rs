use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::TransactionId,
    extract::{Json, Path},
    transaction::{Transaction, get_transaction},
};

/// The state needed to fetch a single transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the transaction `transaction_id`.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection).map(Json)
}
