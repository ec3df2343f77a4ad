use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, app_state::lock_connection, database_id::TransactionId, extract::Path,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_transaction(transaction_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => {
            tracing::debug!("deleted transaction {transaction_id}");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, UserId,
        extract::Path,
        initialize_db,
        transaction::{
            Category, Transaction, TransactionType, create_transaction,
            delete_endpoint::{DeleteTransactionState, delete_transaction_endpoint},
            get_transaction,
        },
    };

    fn get_test_state() -> DeleteTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    UserId::new(1).unwrap(),
                    dec!(1.23),
                    TransactionType::Expense,
                    Category::Dining,
                    date!(2025 - 10 - 26),
                    "Test",
                ),
                &connection,
            )
            .unwrap()
        };

        let status = delete_transaction_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_eq!(status, Ok(StatusCode::NO_CONTENT));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_transaction_is_not_found() {
        let state = get_test_state();

        let status = delete_transaction_endpoint(State(state), Path(999)).await;

        assert_eq!(status, Err(Error::NotFound));
    }
}
