//! An in-memory [TransactionStore] for testing the analytics without a database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::UserId,
    transaction::{Category, Transaction, TransactionStore, TransactionType},
};

#[derive(Debug, Default)]
pub struct FakeStore {
    transactions: Vec<Transaction>,
    fail: bool,
}

impl FakeStore {
    /// A store where every read fails with [Error::DatabaseLockError].
    pub fn failing() -> Self {
        Self {
            transactions: Vec::new(),
            fail: true,
        }
    }

    pub fn with(
        mut self,
        user_id: i64,
        amount: Decimal,
        transaction_type: TransactionType,
        category: Category,
        date: Date,
    ) -> Self {
        let now = OffsetDateTime::now_utc();

        self.transactions.push(Transaction {
            id: self.transactions.len() as i64 + 1,
            user_id: UserId::new(user_id).expect("invalid test user ID"),
            description: "test".to_owned(),
            amount,
            transaction_type,
            category,
            transaction_date: date,
            notes: None,
            location: None,
            merchant: None,
            created_at: now,
            updated_at: now,
        });

        self
    }

    fn check(&self) -> Result<(), Error> {
        if self.fail {
            Err(Error::DatabaseLockError)
        } else {
            Ok(())
        }
    }

    fn user_transactions(&self, user_id: UserId) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |transaction| transaction.user_id == user_id)
    }
}

impl TransactionStore for FakeStore {
    fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, Error> {
        self.check()?;

        Ok(self
            .user_transactions(user_id)
            .filter(|transaction| transaction.transaction_type == transaction_type)
            .map(|transaction| transaction.amount)
            .sum())
    }

    fn list_by_user_in_date_range(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Transaction>, Error> {
        self.check()?;

        if start > end {
            return Err(Error::InvalidDateRange(start, end));
        }

        Ok(self
            .user_transactions(user_id)
            .filter(|transaction| (start..=end).contains(&transaction.transaction_date))
            .cloned()
            .collect())
    }

    fn group_expense_amounts_by_category(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(Category, Decimal)>, Error> {
        self.check()?;

        let mut totals: HashMap<Category, Decimal> = HashMap::new();
        self.user_transactions(user_id)
            .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
            .for_each(|transaction| {
                *totals.entry(transaction.category).or_default() += transaction.amount;
            });

        let mut totals: Vec<_> = totals.into_iter().collect();
        totals.sort_by(|(a_category, a_total), (b_category, b_total)| {
            b_total
                .cmp(a_total)
                .then_with(|| a_category.as_str().cmp(b_category.as_str()))
        });

        Ok(totals)
    }
}
