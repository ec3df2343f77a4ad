//! Defines the read interface used for aggregating a user's transactions and
//! its SQLite implementation.

use std::collections::HashMap;

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    database_id::UserId,
    money::from_minor_units_total,
    transaction::{
        Category, Transaction, TransactionType,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
    },
};

/// Read access to a user's transactions.
///
/// Unknown user IDs are not an error: they have no transactions, so sums are
/// zero and lists are empty.
pub trait TransactionStore {
    /// The sum of the amounts of a user's transactions of `transaction_type`.
    ///
    /// Returns zero if the user has no transactions of that type.
    fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, Error>;

    /// A user's transactions dated between `start` and `end` (inclusive).
    fn list_by_user_in_date_range(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Transaction>, Error>;

    /// The total amount of a user's expenses in each category.
    ///
    /// Categories without any expenses are omitted. The order of the returned
    /// entries is up to the implementation but must be deterministic.
    fn group_expense_amounts_by_category(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(Category, Decimal)>, Error>;
}

/// Reads transactions from a SQLite database.
///
/// The store borrows a connection so that all the queries for one request
/// run against the connection held by that request.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteTransactionStore<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteTransactionStore<'a> {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore<'_> {
    /// # Errors
    /// This function will return a:
    /// - [Error::TotalOverflow] if the sum cannot be represented,
    /// - or [Error::SqlError] if there is a SQL error.
    fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, Error> {
        // SQLite's integer SUM fails on overflow, so add the amounts up here.
        let mut total_cents: i128 = 0;
        let mut statement = self.connection.prepare(
            "SELECT amount_cents FROM \"transaction\"
             WHERE user_id = ?1 AND type = ?2",
        )?;
        let mut rows = statement.query((user_id, transaction_type))?;
        while let Some(row) = rows.next()? {
            let amount_cents: i64 = row.get(0)?;
            total_cents += i128::from(amount_cents);
        }

        from_minor_units_total(total_cents)
    }

    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidDateRange] if `start` is after `end`,
    /// - or [Error::SqlError] if there is a SQL error.
    fn list_by_user_in_date_range(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Transaction>, Error> {
        if start > end {
            return Err(Error::InvalidDateRange(start, end));
        }

        self.connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE user_id = ?1 AND transaction_date BETWEEN ?2 AND ?3
                 ORDER BY transaction_date ASC, id ASC"
            ))?
            .query_map((user_id, start, end), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Entries are ordered by total descending, ties broken by category label.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::TotalOverflow] if a category total cannot be represented,
    /// - or [Error::SqlError] if there is a SQL error.
    fn group_expense_amounts_by_category(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(Category, Decimal)>, Error> {
        let mut totals: HashMap<Category, i128> = HashMap::new();
        let mut statement = self.connection.prepare(
            "SELECT category, amount_cents FROM \"transaction\"
             WHERE user_id = ?1 AND type = ?2",
        )?;
        let mut rows = statement.query((user_id, TransactionType::Expense))?;
        while let Some(row) = rows.next()? {
            let category: Category = row.get(0)?;
            let amount_cents: i64 = row.get(1)?;
            *totals.entry(category).or_default() += i128::from(amount_cents);
        }

        let mut totals: Vec<(Category, i128)> = totals.into_iter().collect();
        totals.sort_by(|(category_a, total_a), (category_b, total_b)| {
            total_b
                .cmp(total_a)
                .then_with(|| category_a.as_str().cmp(category_b.as_str()))
        });

        totals
            .into_iter()
            .map(|(category, total_cents)| Ok((category, from_minor_units_total(total_cents)?)))
            .collect()
    }
}
