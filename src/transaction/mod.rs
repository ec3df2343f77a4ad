//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The `TransactionStore` read interface used by the analytics
//! - Route handlers for the transaction REST API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod store;
mod totals_endpoint;

pub use core::{
    Category, Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, get_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{list_transactions_endpoint, list_transactions_in_range_endpoint};
pub use store::{SQLiteTransactionStore, TransactionStore};
pub use totals_endpoint::{get_category_expenses_endpoint, get_totals_endpoint};

#[cfg(test)]
pub use core::count_transactions;
