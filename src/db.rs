//! Sets up the application database.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create all of the database tables and indexes for the application.
///
/// This function is idempotent, so it is safe to call on a database that has
/// already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        UserId,
        transaction::{Category, Transaction, TransactionType, create_transaction},
    };

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialization failed");
        initialize(&connection).expect("second initialization failed");
        initialize(&connection).expect("third initialization failed");

        let object_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE tbl_name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        // The table and its two indexes.
        assert_eq!(object_count, 3);

        let sequence_rows: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_sequence WHERE name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(sequence_rows, 0);
    }

    #[test]
    fn ids_start_at_one_after_repeated_initialization() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let transaction = create_transaction(
            Transaction::build(
                UserId::new(1).unwrap(),
                dec!(10),
                TransactionType::Expense,
                Category::Dining,
                date!(2025 - 01 - 01),
                "Lunch",
            ),
            &connection,
        )
        .unwrap();

        assert_eq!(transaction.id, 1);

        let sequence_rows: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_sequence WHERE name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(sequence_rows, 1);
    }

    #[test]
    fn creates_transaction_table() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 1);
    }
}
