use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::TransactionId,
    extract::{Json, Path},
    transaction::{
        Category, Transaction, TransactionBuilder, TransactionType,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
        get_transaction,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for editing a transaction.
///
/// Fields that are left out keep their current value. The owner of a
/// transaction cannot be changed.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    /// The new description.
    pub description: Option<String>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// The new category.
    pub category: Option<Category>,
    /// The new date.
    pub transaction_date: Option<Date>,
    /// The new notes.
    pub notes: Option<String>,
    /// The new location.
    pub location: Option<String>,
    /// The new merchant.
    pub merchant: Option<String>,
}

impl UpdateTransactionRequest {
    /// Overlay the fields of this request on `existing`.
    fn merge(self, existing: Transaction) -> TransactionBuilder {
        TransactionBuilder {
            user_id: existing.user_id,
            amount: self.amount.unwrap_or(existing.amount),
            transaction_type: self.transaction_type.unwrap_or(existing.transaction_type),
            category: self.category.unwrap_or(existing.category),
            date: self.transaction_date.unwrap_or(existing.transaction_date),
            description: self.description.unwrap_or(existing.description),
            notes: self.notes.or(existing.notes),
            location: self.location.or(existing.location),
            merchant: self.merchant.or(existing.merchant),
        }
    }
}

/// A route handler for editing a transaction, responds with the updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(transaction_id, request, &connection).map(Json)
}

/// Apply `request` to the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction,
/// - validation error from [TransactionBuilder::validate] if the merged transaction is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
fn update_transaction(
    id: TransactionId,
    request: UpdateTransactionRequest,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(id, connection)?;
    let builder = request.merge(existing);
    let amount_cents = builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET description = ?1, amount_cents = ?2, type = ?3, category = ?4, \
                transaction_date = ?5, notes = ?6, location = ?7, merchant = ?8, updated_at = ?9
             WHERE id = ?10
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.description.trim(),
                amount_cents,
                builder.transaction_type,
                builder.category,
                builder.date,
                builder.notes,
                builder.location,
                builder.merchant,
                OffsetDateTime::now_utc(),
                id,
            ],
            map_transaction_row,
        )?;

    tracing::debug!("updated transaction {id}");

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, UserId,
        extract::{Json, Path},
        initialize_db,
        transaction::{
            Category, Transaction, TransactionType, create_transaction,
            edit_endpoint::{
                EditTransactionState, UpdateTransactionRequest, edit_transaction_endpoint,
            },
            get_transaction,
        },
    };

    fn get_test_state_with_transaction() -> (EditTransactionState, Transaction) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let transaction = create_transaction(
            Transaction::build(
                UserId::new(1).unwrap(),
                dec!(45.99),
                TransactionType::Expense,
                Category::Groceries,
                date!(2025 - 01 - 15),
                "Weekly shop",
            )
            .merchant(Some("Fresh Market".to_owned())),
            &connection,
        )
        .unwrap();

        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, transaction)
    }

    #[tokio::test]
    async fn updates_only_given_fields() {
        let (state, original) = get_test_state_with_transaction();
        let request = UpdateTransactionRequest {
            amount: Some(dec!(50)),
            category: Some(Category::Dining),
            ..Default::default()
        };

        let Json(updated) =
            edit_transaction_endpoint(State(state.clone()), Path(original.id), Json(request))
                .await
                .expect("could not update transaction");

        assert_eq!(updated.amount, dec!(50));
        assert_eq!(updated.category, Category::Dining);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.transaction_date, original.transaction_date);
        assert_eq!(updated.merchant, original.merchant);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(original.id, &connection), Ok(updated));
    }

    #[tokio::test]
    async fn invalid_update_leaves_transaction_unchanged() {
        let (state, original) = get_test_state_with_transaction();
        let request = UpdateTransactionRequest {
            description: Some(" ".to_owned()),
            ..Default::default()
        };

        let result =
            edit_transaction_endpoint(State(state.clone()), Path(original.id), Json(request))
                .await;

        assert_eq!(result.map(|_| ()), Err(Error::EmptyDescription));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(original.id, &connection), Ok(original));
    }

    #[tokio::test]
    async fn updating_missing_transaction_is_not_found() {
        let (state, _) = get_test_state_with_transaction();

        let result = edit_transaction_endpoint(
            State(state),
            Path(1234),
            Json(UpdateTransactionRequest::default()),
        )
        .await;

        assert_eq!(result.map(|_| ()), Err(Error::NotFound));
    }
}
