//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{TransactionId, UserId},
    money::{from_minor_units, to_minor_units},
};

/// The maximum number of characters in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
/// The maximum number of characters in the notes of a transaction.
pub const MAX_NOTES_LENGTH: usize = 500;
/// The maximum number of characters in the location or merchant of a transaction.
pub const MAX_PLACE_LENGTH: usize = 100;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The label used for the type in the database and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

/// The label used to group transactions, e.g. "GROCERIES" or "SALARY".
///
/// The category is independent of the [TransactionType]: nothing stops an
/// income transaction from using an expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Category {
    Salary,
    Bonus,
    Investment,
    Business,
    OtherIncome,
    Groceries,
    Dining,
    Transportation,
    Utilities,
    Rent,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Travel,
    Insurance,
    Charity,
    OtherExpense,
}

impl Category {
    /// Every category, income categories first.
    pub const ALL: [Category; 18] = [
        Self::Salary,
        Self::Bonus,
        Self::Investment,
        Self::Business,
        Self::OtherIncome,
        Self::Groceries,
        Self::Dining,
        Self::Transportation,
        Self::Utilities,
        Self::Rent,
        Self::Entertainment,
        Self::Healthcare,
        Self::Shopping,
        Self::Education,
        Self::Travel,
        Self::Insurance,
        Self::Charity,
        Self::OtherExpense,
    ];

    /// The label used for the category in the database and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "SALARY",
            Self::Bonus => "BONUS",
            Self::Investment => "INVESTMENT",
            Self::Business => "BUSINESS",
            Self::OtherIncome => "OTHER_INCOME",
            Self::Groceries => "GROCERIES",
            Self::Dining => "DINING",
            Self::Transportation => "TRANSPORTATION",
            Self::Utilities => "UTILITIES",
            Self::Rent => "RENT",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Healthcare => "HEALTHCARE",
            Self::Shopping => "SHOPPING",
            Self::Education => "EDUCATION",
            Self::Travel => "TRAVEL",
            Self::Insurance => "INSURANCE",
            Self::Charity => "CHARITY",
            Self::OtherExpense => "OTHER_EXPENSE",
        }
    }
}

/// The error returned when a label does not name a [Category] or [TransactionType].
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unknown label \"{0}\"")]
pub struct UnknownLabelError(String);

impl FromStr for TransactionType {
    type Err = UnknownLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(UnknownLabelError(other.to_owned())),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownLabelError(s.to_owned()))
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned. Always positive.
    pub amount: Decimal,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    pub transaction_date: Date,
    /// Free-form notes about the transaction.
    pub notes: Option<String>,
    /// Where the transaction happened.
    pub location: Option<String>,
    /// Who the money was paid to or received from.
    pub merchant: Option<String>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserId,
        amount: Decimal,
        transaction_type: TransactionType,
        category: Category,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            amount,
            transaction_type,
            category,
            date,
            description: description.to_owned(),
            notes: None,
            location: None,
            merchant: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder is checked by [TransactionBuilder::validate] when the
/// transaction is inserted with [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that owns the transaction.
    pub user_id: UserId,

    /// The monetary amount of the transaction.
    ///
    /// Must be positive with at most two decimal places. Whether money was
    /// earned or spent is given by `transaction_type`, not the sign.
    pub amount: Decimal,

    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// What the money was earned or spent on.
    pub category: Category,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    ///
    /// # Examples
    /// - `"Salary - January 2025"`
    /// - `"Weekly shop"`
    pub description: String,

    /// Free-form notes about the transaction.
    pub notes: Option<String>,

    /// Where the transaction happened.
    pub location: Option<String>,

    /// Who the money was paid to or received from.
    pub merchant: Option<String>,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the location for the transaction.
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Set the merchant for the transaction.
    pub fn merchant(mut self, merchant: Option<String>) -> Self {
        self.merchant = merchant;
        self
    }

    /// Check that the transaction can be stored, returning the amount in minor units.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if the description is blank,
    /// - [Error::FieldTooLong] if a text field exceeds its maximum length,
    /// - or [Error::InvalidAmount] if the amount is not positive or has too many decimal places.
    pub fn validate(&self) -> Result<i64, Error> {
        validate_description(&self.description)?;
        validate_optional_text("notes", self.notes.as_deref(), MAX_NOTES_LENGTH)?;
        validate_optional_text("location", self.location.as_deref(), MAX_PLACE_LENGTH)?;
        validate_optional_text("merchant", self.merchant.as_deref(), MAX_PLACE_LENGTH)?;

        to_minor_units(self.amount)
    }
}

/// Check that a description is not blank and is not too long.
pub(crate) fn validate_description(description: &str) -> Result<(), Error> {
    if description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    validate_optional_text("description", Some(description), MAX_DESCRIPTION_LENGTH)
}

/// Check that an optional text field is no longer than `max_length` characters.
pub(crate) fn validate_optional_text(
    field: &'static str,
    text: Option<&str>,
    max_length: usize,
) -> Result<(), Error> {
    match text {
        Some(text) if text.chars().count() > max_length => {
            Err(Error::FieldTooLong { field, max_length })
        }
        _ => Ok(()),
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the transaction table in the order expected by [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str = "id, user_id, description, amount_cents, type, \
    category, transaction_date, notes, location, merchant, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - validation error from [TransactionBuilder::validate] if the builder is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount_cents = builder.validate()?;
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, description, amount_cents, type, category, \
                transaction_date, notes, location, merchant, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                builder.user_id,
                builder.description.trim(),
                amount_cents,
                builder.transaction_type,
                builder.category,
                builder.date,
                builder.notes,
                builder.location,
                builder.merchant,
                now,
            ],
            map_transaction_row,
        )?;

    tracing::debug!(
        "created transaction {} for user {}",
        transaction.id,
        transaction.user_id
    );

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
                type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
                category TEXT NOT NULL,
                transaction_date TEXT NOT NULL,
                notes TEXT,
                location TEXT,
                merchant TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Used by the paginated list, date range queries and the monthly trend.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
            ON \"transaction\"(user_id, transaction_date);",
        (),
    )?;

    // Used by the totals by type and category.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_type_category
            ON \"transaction\"(user_id, type, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns listed in [TRANSACTION_COLUMNS], in order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let amount_cents: i64 = row.get(3)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: from_minor_units(amount_cents),
        transaction_type: row.get(4)?,
        category: row.get(5)?,
        transaction_date: row.get(6)?,
        notes: row.get(7)?,
        location: row.get(8)?,
        merchant: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, UserId,
        transaction::{
            Category, Transaction, TransactionType,
            core::{MAX_DESCRIPTION_LENGTH, MAX_NOTES_LENGTH, UnknownLabelError},
        },
    };

    fn user() -> UserId {
        UserId::new(1).unwrap()
    }

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn category_label_matches_serde() {
        let json = serde_json::to_string(&Category::OtherExpense).unwrap();

        assert_eq!(json, "\"OTHER_EXPENSE\"");
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        assert_eq!(
            "PETS".parse::<Category>(),
            Err(UnknownLabelError("PETS".to_owned()))
        );
    }

    #[test]
    fn transaction_type_parses() {
        assert_eq!("INCOME".parse(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse(), Ok(TransactionType::Expense));
        assert!("income".parse::<TransactionType>().is_err());
    }

    #[test]
    fn validate_accepts_valid_builder() {
        let builder = Transaction::build(
            user(),
            dec!(12.50),
            TransactionType::Expense,
            Category::Dining,
            date!(2025 - 01 - 01),
            "Lunch",
        );

        assert_eq!(builder.validate(), Ok(1250));
    }

    #[test]
    fn validate_rejects_blank_description() {
        let builder = Transaction::build(
            user(),
            dec!(1),
            TransactionType::Expense,
            Category::Dining,
            date!(2025 - 01 - 01),
            "   ",
        );

        assert_eq!(builder.validate(), Err(Error::EmptyDescription));
    }

    #[test]
    fn validate_rejects_long_description() {
        let description = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let builder = Transaction::build(
            user(),
            dec!(1),
            TransactionType::Expense,
            Category::Dining,
            date!(2025 - 01 - 01),
            &description,
        );

        assert_eq!(
            builder.validate(),
            Err(Error::FieldTooLong {
                field: "description",
                max_length: MAX_DESCRIPTION_LENGTH
            })
        );
    }

    #[test]
    fn validate_rejects_long_notes() {
        let builder = Transaction::build(
            user(),
            dec!(1),
            TransactionType::Expense,
            Category::Dining,
            date!(2025 - 01 - 01),
            "Lunch",
        )
        .notes(Some("n".repeat(MAX_NOTES_LENGTH + 1)));

        assert_eq!(
            builder.validate(),
            Err(Error::FieldTooLong {
                field: "notes",
                max_length: MAX_NOTES_LENGTH
            })
        );
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let builder = Transaction::build(
            user(),
            dec!(-5),
            TransactionType::Expense,
            Category::Dining,
            date!(2025 - 01 - 01),
            "Refund?",
        );

        assert_eq!(
            builder.validate(),
            Err(Error::InvalidAmount("-5".to_owned()))
        );
    }
}
